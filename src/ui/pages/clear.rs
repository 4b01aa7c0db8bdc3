use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::warn;

use crate::{
    app::{current_client, refresh_slots, ClientHandle, Route},
    domain::{estimate_fee, format_duration, AppState, ClearReceipt, Slot, SlotAction},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        format::{money, optional_timestamp},
        theme,
    },
};

/// Detail view for one slot: park a booking, clear with a fee preview.
#[component]
pub fn ClearPage(slot_id: u32) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();
    let nav = use_navigator();

    let mut busy = use_signal(|| false);
    let mut receipt = use_signal(|| None::<ClearReceipt>);
    let _loader = use_resource(move || async move { refresh_slots(state, client, toasts).await });

    let (slot, category, rate, own_plate) = state.with(|st| {
        (
            st.slot(slot_id).cloned().unwrap_or_else(|| Slot::free(slot_id)),
            st.table.classify(slot_id).ok(),
            st.rate_per_hour,
            st.session.as_ref().map(|user| user.vehicle_plate.clone()),
        )
    });

    let preview = slot
        .parked_time
        .map(|since| estimate_fee(since, OffsetDateTime::now_utc(), rate));
    let category_label = category
        .map(|category| format!("{} {}", category.emoji(), category.label()))
        .unwrap_or_else(|| "outside the lot layout".to_string());
    let holder = slot
        .parked_vehicle_plate
        .clone()
        .unwrap_or_else(|| "nobody".to_string());
    let park_plate = slot.parked_vehicle_plate.clone().or(own_plate);
    let actions = SlotAction::available_for(slot.status);

    let run_action = use_callback(move |action: SlotAction| {
        if action == SlotAction::Book {
            nav.push(Route::Book { slot_id });
            return;
        }
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        let plate = park_plate.clone().unwrap_or_default();
        busy.set(true);
        spawn(async move {
            let outcome = if action == SlotAction::Park {
                api.park_slot(slot_id, &plate)
                    .await
                    .map(|_| format!("Slot {slot_id} marked as parked."))
            } else {
                api.clear_slot(slot_id, rate).await.map(|cleared| {
                    let message = format!("Slot {slot_id} cleared. Fee {}.", money(cleared.fee));
                    receipt.set(Some(cleared));
                    message
                })
            };
            match outcome {
                Ok(message) => {
                    push_toast(toasts, ToastKind::Success, message);
                    refresh_slots(state, client, toasts).await;
                }
                Err(err) => {
                    warn!(slot_id, ?action, "slot action failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("{} failed: {err}", action.label()));
                }
            }
            busy.set(false);
        });
    });

    rsx! {
        div { class: "card",
            h2 { "Slot {slot_id}" }
            table { class: "table",
                tbody {
                    tr { th { "Category" } td { "{category_label}" } }
                    tr {
                        th { "Status" }
                        td { span { class: "{theme::status_badge(slot.status)}", "{slot.status.label()}" } }
                    }
                    tr { th { "Vehicle" } td { "{holder}" } }
                    tr { th { "Parked since" } td { "{optional_timestamp(slot.parked_time)}" } }
                    if let Some(estimate) = preview {
                        tr {
                            th { "Fee so far" }
                            td { "{money(estimate.fee)} ({format_duration(estimate.duration_hours)} at {money(rate)}/h)" }
                        }
                    }
                }
            }
            div { class: "actions",
                for action in actions.iter().copied() {
                    button {
                        key: "{action.label()}",
                        class: "{theme::action_button(action)}",
                        disabled: busy(),
                        onclick: move |_| run_action.call(action),
                        "{action.label()}"
                    }
                }
                button {
                    class: "btn",
                    onclick: move |_| { nav.push(Route::Slots {}); },
                    "Back"
                }
            }
        }

        if let Some(done) = receipt() {
            div { class: "card",
                h2 { "Receipt" }
                table { class: "table",
                    tbody {
                        tr { th { "Slot" } td { "{done.slot_id}" } }
                        tr { th { "Parked" } td { "{optional_timestamp(done.parked_time)}" } }
                        tr { th { "Cleared" } td { "{optional_timestamp(done.cleared_time)}" } }
                        tr { th { "Duration" } td { "{format_duration(done.duration_hours)}" } }
                        tr { th { "Fee" } td { "{money(done.fee)}" } }
                    }
                }
            }
        }
    }
}
