//! Text rendering of slot lists.

use slotbook_core::models::slot::{Slot, SlotStatus};

use crate::board::SlotBoard;

pub const NO_SLOTS_MESSAGE: &str = "No slots available for this date";

/// `8:00 AM - 9:00 AM`, in UTC.
pub fn format_slot_time(slot: &Slot) -> String {
    format!(
        "{} - {}",
        slot.start_time.format("%-I:%M %p"),
        slot.end_time.format("%-I:%M %p")
    )
}

/// One line per slot: id, time range, and state.
pub fn render_slot_list(board: &SlotBoard, slots: &[&Slot]) -> String {
    if slots.is_empty() {
        return format!("{}\n", NO_SLOTS_MESSAGE);
    }

    slots
        .iter()
        .map(|slot| {
            let state = if board.is_pending(slot.id) {
                "Reserving...".to_string()
            } else {
                match slot.status {
                    SlotStatus::Available => "Available".to_string(),
                    SlotStatus::Reserved => match &slot.nurse_id {
                        Some(nurse_id) => format!("Reserved by {}", nurse_id),
                        None => "Reserved".to_string(),
                    },
                }
            };
            format!(
                "#{:<5} {} {:<19} {}\n",
                slot.id,
                slot.start_time.format("%a %d %b"),
                format_slot_time(slot),
                state
            )
        })
        .collect()
}
