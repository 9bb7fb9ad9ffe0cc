pub mod account;
pub mod booking;
pub mod prices;
pub mod questions;
pub mod schedule;
pub mod survey;
pub mod time_slots;

use anyhow::{bail, Result};

use auth_cell::{Session, SessionManager};
use shared_config::AppConfig;

use crate::cli::Command;
use crate::prompt::Prompt;

/// Everything a screen needs from the running console.
pub struct Context {
    pub config: AppConfig,
    pub sessions: SessionManager,
    pub prompt: Prompt,
}

impl Context {
    /// Signed-in admin session, cloned so the screen can keep prompting.
    pub fn require_admin(&self, action: &str) -> Result<Session> {
        let session = self.sessions.require(action)?;
        if !session.is_admin() {
            bail!("{} needs an admin account", action);
        }
        Ok(session.clone())
    }
}

pub async fn run(ctx: &mut Context, command: Command) -> Result<()> {
    match command {
        Command::Login { username } => account::login(ctx, username).await,
        Command::Logout => account::logout(ctx),
        Command::Whoami => account::whoami(ctx),
        Command::Book { doctor_id } => booking::book(ctx, doctor_id).await,
        Command::Schedule { doctor_id } => schedule::show(ctx, doctor_id).await,
        Command::Survey => survey::take(ctx).await,
        Command::Timeslots { action } => time_slots::run(ctx, action).await,
        Command::Prices { action } => prices::run(ctx, action).await,
        Command::Questions { action } => questions::run(ctx, action).await,
    }
}
