use anyhow::Result;

use doctor_cell::{date_window, today, AvailabilityService, AvailabilityView, DoctorService, SlotBoard};
use shared_config::DateWindowMode;

use super::Context;

/// Booked appointments of one doctor over the current week.
pub async fn show(ctx: &mut Context, doctor_id: i64) -> Result<()> {
    let session = ctx.require_admin("viewing the booked schedule")?;
    let token = Some(session.bearer());

    let doctor = DoctorService::new(&ctx.config).get_doctor(doctor_id, token).await?;
    println!("Booked schedule for {}", doctor.display_name());

    let service = AvailabilityService::new(&ctx.config);
    let mut board = SlotBoard::new(doctor_id, AvailabilityView::Booked);

    for date in date_window(today(), DateWindowMode::Week) {
        board.show_date(date, &service, token).await;

        println!("{}", date.format("%a %d/%m/%Y"));
        if let Some(error) = board.error() {
            println!("  could not load: {}", error);
        } else if board.slots().is_empty() {
            println!("  no appointments");
        }
        for slot in board.slots() {
            println!("  [{}] {}  {}  (Đã đặt)", slot.id, slot.time_range(), slot.price_label());
        }
    }
    Ok(())
}
