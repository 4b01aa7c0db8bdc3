use dioxus::prelude::*;
use tracing::warn;

use crate::{
    app::{current_client, refresh_slots, ClientHandle, Route},
    domain::{check_eligibility, ensure_slot_free, AppState, SlotStatus},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

#[component]
pub fn BookingPage(slot_id: u32) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();
    let nav = use_navigator();

    let mut busy = use_signal(|| false);
    let _loader = use_resource(move || async move { refresh_slots(state, client, toasts).await });

    let (slot_category, status, user_category, plate, verdict) = state.with(|st| {
        let slot_category = st.table.classify(slot_id);
        let status = st.slot(slot_id).map(|slot| slot.status).unwrap_or_default();
        let user_category = st.user_category();
        let plate = st
            .session
            .as_ref()
            .map(|user| user.vehicle_plate.clone())
            .unwrap_or_default();
        let verdict = match user_category {
            Some(category) => check_eligibility(&st.table, category, slot_id, &st.slots, &plate)
                .and_then(|()| ensure_slot_free(&st.slots, slot_id))
                .map_err(|err| err.to_string()),
            None => Err("Set your vehicle type in Settings before booking.".to_string()),
        };
        (slot_category, status, user_category, plate, verdict)
    });

    let category_label = match &slot_category {
        Ok(category) => format!("{} {}", category.emoji(), category.label()),
        Err(err) => err.to_string(),
    };
    let user_label = user_category
        .map(|category| format!("{} {}", category.emoji(), category.label()))
        .unwrap_or_else(|| "unknown".to_string());
    let eligible = verdict.is_ok();

    let on_book = move |_| {
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        let plate = plate.clone();
        busy.set(true);
        spawn(async move {
            match api.book_slot(slot_id, &plate).await {
                Ok(slot) => {
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        format!("Slot {} booked for {plate}.", slot.slot_id),
                    );
                    refresh_slots(state, client, toasts).await;
                    nav.replace(Route::Slots {});
                }
                Err(err) => {
                    warn!(slot_id, "booking failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Booking failed: {err}"));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "card",
            h2 { "Book slot {slot_id}" }
            table { class: "table",
                tbody {
                    tr { th { "Slot category" } td { "{category_label}" } }
                    tr { th { "Your vehicle" } td { "{user_label}" } }
                    tr {
                        th { "Status" }
                        td { span { class: "{theme::status_badge(status)}", "{status.label()}" } }
                    }
                }
            }
            match &verdict {
                Ok(()) => rsx! { p { class: "{theme::message(true)}", "You can book this slot." } },
                Err(reason) => rsx! { p { class: "{theme::message(false)}", "{reason}" } },
            }
            div { class: "actions",
                button {
                    class: "btn btn-primary",
                    disabled: !eligible || busy(),
                    onclick: on_book,
                    if busy() { "Booking…" } else { "Book slot" }
                }
                if status != SlotStatus::Free {
                    button {
                        class: "btn",
                        onclick: move |_| { nav.push(Route::Clear { slot_id }); },
                        "View slot"
                    }
                }
                button {
                    class: "btn",
                    onclick: move |_| { nav.push(Route::Slots {}); },
                    "Back"
                }
            }
        }
    }
}
