use std::path::PathBuf;

use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    app::{current_client, refresh_slots, ClientHandle},
    domain::{normalize_plate, suggest_slot, AppState, SlotAction, SlotStatus},
    infra::{ApiError, ParkingClient},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

#[component]
pub fn DetectPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();

    let mut image_path = use_signal(String::new);
    let mut plate_input = use_signal(String::new);
    let mut slot_input = use_signal(String::new);
    let mut analysing = use_signal(|| false);
    let mut parking = use_signal(|| false);
    let mut outcome = use_signal(|| None::<Result<String, String>>);
    let _loader = use_resource(move || async move { refresh_slots(state, client, toasts).await });

    let detection = state.with(|st| st.last_detection.clone());

    let on_analyse = move |_| {
        let raw = image_path().trim().to_string();
        if raw.is_empty() {
            outcome.set(Some(Err("Enter the path of an image to analyse.".to_string())));
            return;
        }
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        analysing.set(true);
        outcome.set(None);
        spawn(async move {
            let path = PathBuf::from(&raw);
            match api.predict_ocr_file(&path).await {
                Ok(found) => {
                    let suggestion = state.with(|st| {
                        found.suggested_slot.or_else(|| {
                            found
                                .primary_category()
                                .and_then(|category| suggest_slot(&st.table, category, &st.slots))
                        })
                    });
                    plate_input.set(found.primary_plate().unwrap_or_default().to_string());
                    slot_input.set(suggestion.map(|id| id.to_string()).unwrap_or_default());
                    info!(
                        plates = found.recognized_plates.len(),
                        auto_parked = found.auto_parked,
                        "frame analysed"
                    );
                    if found.auto_parked {
                        let message = found
                            .message
                            .clone()
                            .unwrap_or_else(|| "Vehicle parked automatically.".to_string());
                        outcome.set(Some(Ok(message)));
                        refresh_slots(state, client, toasts).await;
                    }
                    state.with_mut(|st| st.last_detection = Some(found));
                }
                Err(err) => {
                    warn!(path = %raw, "recognition failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Recognition failed: {err}"));
                }
            }
            analysing.set(false);
        });
    };

    let on_park = move |_| {
        let plate = plate_input().trim().to_string();
        if normalize_plate(&plate).is_empty() {
            outcome.set(Some(Err("Enter the vehicle plate.".to_string())));
            return;
        }
        let Ok(slot_id) = slot_input().trim().parse::<u32>() else {
            outcome.set(Some(Err("Enter a numeric slot id.".to_string())));
            return;
        };
        let status = state.with(|st| {
            st.table
                .classify(slot_id)
                .map(|_| st.slot(slot_id).map(|slot| slot.status).unwrap_or_default())
        });
        let status = match status {
            Ok(status) => status,
            Err(err) => {
                outcome.set(Some(Err(err.to_string())));
                return;
            }
        };
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        parking.set(true);
        spawn(async move {
            let result = park_vehicle(&api, slot_id, status, &plate).await;
            match result {
                Ok(()) => {
                    outcome.set(Some(Ok(format!("{plate} parked in slot {slot_id}."))));
                    refresh_slots(state, client, toasts).await;
                }
                Err(message) => {
                    warn!(slot_id, "parking failed: {message}");
                    outcome.set(Some(Err(message)));
                }
            }
            parking.set(false);
        });
    };

    rsx! {
        div { class: "card",
            h2 { "Vehicle detection" }
            p { class: "muted", "Upload a camera frame to read the plate and vehicle type." }
            div { class: "field",
                label { "Image file" }
                input {
                    class: "input",
                    value: "{image_path}",
                    placeholder: "/path/to/frame.jpg",
                    oninput: move |evt| image_path.set(evt.value()),
                }
            }
            button {
                class: "btn btn-primary",
                disabled: analysing(),
                onclick: on_analyse,
                if analysing() { "Analysing…" } else { "Analyse" }
            }
        }

        if let Some(found) = detection {
            div { class: "card",
                h2 { "Result" }
                div { class: "row",
                    div {
                        if let Some(uri) = found.annotated_data_uri() {
                            img { class: "detect-image", src: "{uri}", alt: "annotated frame" }
                        } else {
                            p { class: "muted", "No annotated image returned." }
                        }
                    }
                    div {
                        p { "Vehicle types: {join_or_none(&found.vehicle_types)}" }
                        p { "Plates: {join_or_none(&found.recognized_plates)}" }
                        if let Some(category) = found.primary_category() {
                            p { "Category: {category.emoji()} {category.label()}" }
                        }
                        if let Some(message) = found.message.clone() {
                            p { class: "muted", "{message}" }
                        }
                    }
                }
            }
        }

        div { class: "card",
            h2 { "Park vehicle" }
            div { class: "row",
                div { class: "field",
                    label { "Plate" }
                    input {
                        class: "input",
                        value: "{plate_input}",
                        oninput: move |evt| plate_input.set(evt.value()),
                    }
                }
                div { class: "field",
                    label { "Slot" }
                    input {
                        class: "input",
                        value: "{slot_input}",
                        oninput: move |evt| slot_input.set(evt.value()),
                    }
                }
            }
            if let Some(result) = outcome() {
                match result {
                    Ok(message) => rsx! { p { class: "{theme::message(true)}", "{message}" } },
                    Err(message) => rsx! { p { class: "{theme::message(false)}", "{message}" } },
                }
            }
            button {
                class: "btn btn-primary",
                disabled: parking(),
                onclick: on_park,
                if parking() { "Parking…" } else { "Park" }
            }
        }
    }
}

/// Free slots are booked first so the service sees the usual lifecycle.
async fn park_vehicle(
    api: &ParkingClient,
    slot_id: u32,
    status: SlotStatus,
    plate: &str,
) -> Result<(), String> {
    let describe = |err: ApiError| err.to_string();
    match SlotAction::Park.apply(status) {
        Ok(_) => {}
        Err(_) if status == SlotStatus::Free => {
            api.book_slot(slot_id, plate).await.map_err(describe)?;
        }
        Err(invalid) => return Err(invalid.to_string()),
    }
    api.park_slot(slot_id, plate).await.map_err(describe)?;
    Ok(())
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
