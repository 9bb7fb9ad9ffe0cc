use anyhow::Result;

use appointment_cell::{group_by_doctor, BookingPriceService, PriceDraft};
use doctor_cell::format_vnd;

use crate::cli::PriceAction;
use super::Context;

pub async fn run(ctx: &mut Context, action: PriceAction) -> Result<()> {
    let session = ctx.require_admin("managing booking prices")?;
    let token = session.bearer();
    let service = BookingPriceService::new(&ctx.config);

    match action {
        PriceAction::List => {
            let prices = service.list(token).await?;
            if prices.is_empty() {
                println!("No booking prices configured");
            }
            for (doctor, entries) in group_by_doctor(prices) {
                println!("{}", doctor.display_name());
                for entry in entries {
                    println!(
                        "  [{}] {} - {}  {} VNĐ",
                        entry.id,
                        entry.booking_time.from_time,
                        entry.booking_time.to_time,
                        format_vnd(entry.price)
                    );
                }
            }
        }
        PriceAction::Add { doctor_id, booking_time_id, price } => {
            service.create(&PriceDraft { doctor_id, booking_time_id, price }, token).await?;
            println!("Booking price added");
        }
        PriceAction::Update { id, doctor_id, booking_time_id, price } => {
            service.update(id, &PriceDraft { doctor_id, booking_time_id, price }, token).await?;
            println!("Booking price {} updated", id);
        }
        PriceAction::Delete { id } => {
            service.delete(id, token).await?;
            println!("Booking price {} deleted", id);
        }
    }
    Ok(())
}
