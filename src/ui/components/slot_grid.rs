use dioxus::prelude::*;

use crate::domain::{normalize_plate, Slot};
use crate::ui::theme;

#[derive(Clone, PartialEq)]
struct SlotTile {
    slot_id: u32,
    class: String,
    status: &'static str,
    plate: Option<String>,
}

/// One tile per slot; clicking hands the id back to the page.
#[component]
pub fn SlotGrid(slots: Vec<Slot>, my_plate: Option<String>, on_select: EventHandler<u32>) -> Element {
    let mine = my_plate.as_deref().map(normalize_plate).filter(|plate| !plate.is_empty());
    let tiles = slots
        .iter()
        .map(|slot| {
            let is_mine = match (&mine, slot.parked_vehicle_plate.as_deref()) {
                (Some(own), Some(held)) => normalize_plate(held) == *own,
                _ => false,
            };
            SlotTile {
                slot_id: slot.slot_id,
                class: theme::slot_tile(slot, is_mine),
                status: slot.status.label(),
                plate: slot.parked_vehicle_plate.clone(),
            }
        })
        .collect::<Vec<_>>();

    if tiles.is_empty() {
        return rsx! {
            p { class: "muted", "No slots in this range." }
        };
    }

    rsx! {
        div {
            class: "slot-grid",
            for tile in tiles {
                button {
                    key: "{tile.slot_id}",
                    class: "{tile.class}",
                    onclick: move |_| on_select.call(tile.slot_id),
                    span { class: "id", "{tile.slot_id}" }
                    span { class: "status", "{tile.status}" }
                    if let Some(plate) = tile.plate {
                        span { class: "plate", "{plate}" }
                    }
                }
            }
        }
    }
}
