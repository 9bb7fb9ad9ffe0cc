use anyhow::Result;

use appointment_cell::{SystemTimeSlot, SystemTimeSlotService};

use crate::cli::TimeSlotAction;
use super::Context;

pub async fn run(ctx: &mut Context, action: TimeSlotAction) -> Result<()> {
    let session = ctx.require_admin("managing time slots")?;
    let token = session.bearer();
    let service = SystemTimeSlotService::new(&ctx.config);

    match action {
        TimeSlotAction::List => {
            let slots = service.list(token).await?;
            if slots.is_empty() {
                println!("No time slots configured");
            }
            for slot in slots {
                let id = slot.id.map(|id| id.to_string()).unwrap_or_default();
                println!("  [{}] {} - {}", id, slot.from_time, slot.to_time);
            }
        }
        TimeSlotAction::Add { from, to } => {
            service.create(&SystemTimeSlot::new(from, to), token).await?;
            println!("Time slot added");
        }
        TimeSlotAction::Update { id, from, to } => {
            service.update(id, &SystemTimeSlot::new(from, to), token).await?;
            println!("Time slot {} updated", id);
        }
        TimeSlotAction::Delete { id } => {
            service.delete(id, token).await?;
            println!("Time slot {} deleted", id);
        }
    }
    Ok(())
}
