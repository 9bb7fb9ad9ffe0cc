use anyhow::Result;

use auth_cell::SignInService;

use super::Context;

pub async fn login(ctx: &mut Context, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => ctx.prompt.ask("Username").await?,
    };
    let password = ctx.prompt.ask("Password").await?;

    let session = SignInService::new(&ctx.config).sign_in(&username, &password).await?;
    let session = ctx.sessions.establish(session)?;

    println!(
        "Signed in as {} ({}), session valid until {}",
        session.user.username,
        if session.is_admin() { "admin" } else { "patient" },
        session.expires_at.format("%d/%m/%Y %H:%M UTC")
    );
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.sessions.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.sessions.current() {
        Some(session) => println!(
            "{} <{}> {}",
            session.user.full_name,
            session.user.email,
            session.user.role.as_deref().unwrap_or("")
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}
