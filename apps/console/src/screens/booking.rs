use anyhow::Result;
use chrono::NaiveDate;

use appointment_cell::{BookingForm, BookingWorkflow, Gender};
use doctor_cell::{today, DoctorService};
use shared_models::auth::User;

use super::Context;

/// Next step after the backend refused a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterFailure {
    Resubmit,
    EditForm,
    OtherSlot,
}

impl AfterFailure {
    fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "" | "r" => Some(AfterFailure::Resubmit),
            "e" => Some(AfterFailure::EditForm),
            "o" => Some(AfterFailure::OtherSlot),
            _ => None,
        }
    }
}

fn print_dates(dates: &[NaiveDate]) {
    for (i, date) in dates.iter().enumerate() {
        println!("  {}. {}", i + 1, date.format("%a %d/%m"));
    }
}

/// Reads the booking dialog. `previous` answers become the defaults when
/// the dialog is opened again.
async fn read_form(ctx: &mut Context, user: &User, previous: Option<&BookingForm>) -> Result<BookingForm> {
    let name_default = previous.map_or(user.full_name.as_str(), |form| form.patient_name.as_str());
    let email_default = previous.map_or(user.email.as_str(), |form| form.email.as_str());
    let gender_default = previous.map(|form| form.gender.to_string()).unwrap_or_default();

    let patient_name = ctx.prompt.ask_or("Patient name", name_default).await?;
    let phone = ctx.prompt.ask_or("Phone", previous.map_or("", |form| form.phone.as_str())).await?;
    let email = ctx.prompt.ask_or("Email", email_default).await?;

    let gender = loop {
        match ctx.prompt.ask_or("Gender (MALE/FEMALE)", &gender_default).await?.parse::<Gender>() {
            Ok(gender) => break gender,
            Err(e) => println!("{}", e),
        }
    };

    let address = ctx.prompt.ask_or("Address", previous.map_or("", |form| form.address.as_str())).await?;
    let reason = ctx.prompt.ask_or("Reason for visit", previous.map_or("", |form| form.reason.as_str())).await?;

    Ok(BookingForm { patient_name, phone, email, gender, address, reason })
}

async fn ask_after_failure(ctx: &mut Context) -> Result<AfterFailure> {
    loop {
        let answer = ctx.prompt.ask("r to retry, e to edit the form, o to pick another slot").await?;
        match AfterFailure::parse(&answer) {
            Some(choice) => return Ok(choice),
            None => println!("Answer r, e or o"),
        }
    }
}

pub async fn book(ctx: &mut Context, doctor_id: i64) -> Result<()> {
    let session = ctx.sessions.require("book an appointment")?.clone();

    let doctor = DoctorService::new(&ctx.config).get_doctor(doctor_id, Some(session.bearer())).await?;
    println!("{}", doctor.display_name());
    if !doctor.major.is_empty() {
        println!("{}", doctor.major);
    }

    let mut workflow = BookingWorkflow::new(&ctx.config, doctor, today()).with_session(&session);

    loop {
        print_dates(workflow.dates());
        let answer = ctx.prompt.ask("Date (1-7, q to quit)").await?;
        if answer.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let Some(date) = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| workflow.dates().get(i).copied())
        else {
            println!("Pick a number between 1 and 7");
            continue;
        };

        workflow.select_date(date).await;
        if let Some(notice) = workflow.take_notice() {
            println!("{}", notice);
        }

        let slots = workflow.selection().slots().to_vec();
        if slots.is_empty() {
            println!("No open time slots on {}", date.format("%d/%m/%Y"));
            continue;
        }
        for slot in &slots {
            println!("  [{}] {}  {}  (Còn trống)", slot.id, slot.time_range(), slot.price_label());
        }

        let answer = ctx.prompt.ask("Time slot id (b to pick another date)").await?;
        if answer.eq_ignore_ascii_case("b") {
            continue;
        }
        let Ok(slot_id) = answer.parse::<i64>() else {
            println!("'{}' is not a time slot id", answer);
            continue;
        };
        match workflow.choose_slot(slot_id) {
            Ok(slot) => println!("Booking {} on {}", slot.time_range(), date.format("%d/%m/%Y")),
            Err(e) => {
                println!("{}", e);
                continue;
            }
        }

        let mut form = read_form(ctx, &session.user, None).await?;
        loop {
            let result = workflow.confirm(&form, &session).await;
            if let Some(notice) = workflow.take_notice() {
                println!("{}", notice);
            }
            if result.is_ok() {
                return Ok(());
            }

            // The slot stays chosen until the patient lets go of it.
            match ask_after_failure(ctx).await? {
                AfterFailure::Resubmit => {}
                AfterFailure::EditForm => form = read_form(ctx, &session.user, Some(&form)).await?,
                AfterFailure::OtherSlot => {
                    workflow.cancel_slot();
                    break;
                }
            }
        }
    }
}
