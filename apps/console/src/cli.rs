use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Clinic booking and self-assessment console.
#[derive(Parser, Debug)]
#[command(name = "clinic-console", author, version, about, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        username: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Book an appointment with a doctor
    Book {
        doctor_id: i64,
    },
    /// Booked appointments this week (admin)
    Schedule {
        doctor_id: i64,
    },
    /// Take the Beck depression self-assessment
    Survey,
    /// Maintain clinic time slots (admin)
    Timeslots {
        #[command(subcommand)]
        action: TimeSlotAction,
    },
    /// Maintain per-doctor slot prices (admin)
    Prices {
        #[command(subcommand)]
        action: PriceAction,
    },
    /// Inspect or import the survey question bank (admin)
    Questions {
        #[command(subcommand)]
        action: QuestionAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotAction {
    List,
    /// Times as HH:MM
    Add {
        from: String,
        to: String,
    },
    Update {
        id: i64,
        from: String,
        to: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PriceAction {
    List,
    Add {
        doctor_id: i64,
        booking_time_id: i64,
        price: f64,
    },
    Update {
        id: i64,
        doctor_id: i64,
        booking_time_id: i64,
        price: f64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum QuestionAction {
    List,
    /// Upload a JSON question bank
    Import {
        file: PathBuf,
    },
}
