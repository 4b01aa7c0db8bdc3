use dioxus::prelude::*;
use tracing::warn;

use crate::{
    app::{current_client, ClientHandle},
    domain::{normalize_plate, AppState, ParkedVehicle, VehicleCategory},
    ui::{
        components::{
            category_select::CategorySelect,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        format::optional_timestamp,
        theme,
    },
};

#[component]
pub fn VehiclesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();

    let mut query = use_signal(String::new);
    let mut new_plate = use_signal(String::new);
    let mut new_category = use_signal(|| None::<VehicleCategory>);
    let mut busy = use_signal(|| false);

    let mut vehicles = use_resource(move || async move {
        let api = current_client(client, toasts)?;
        match api.parked_vehicles().await {
            Ok(list) => {
                state.with_mut(|st| st.parked_vehicles = list);
                Some(())
            }
            Err(err) => {
                warn!("failed to load parked vehicles: {err}");
                push_toast(toasts, ToastKind::Error, format!("Failed to load vehicles: {err}"));
                None
            }
        }
    });

    let mut employees = use_resource(move || async move {
        let api = current_client(client, toasts)?;
        match api.parked_employee_slots().await {
            Ok(slots) => Some(slots),
            Err(err) => {
                warn!("failed to load employee slots: {err}");
                None
            }
        }
    });

    let loading = vehicles.read().is_none();
    let all = state.with(|st| st.parked_vehicles.clone());
    let total = all.len();
    let shown = filter_vehicles(&all, &query());
    let employee_slots = employees.read().clone().flatten().unwrap_or_default();

    let on_refresh = move |_| {
        vehicles.restart();
        employees.restart();
    };

    let remove = use_callback(move |plate: String| {
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        busy.set(true);
        spawn(async move {
            match api.remove_vehicle(&plate).await {
                Ok(message) => {
                    let text = message.unwrap_or_else(|| format!("{plate} removed."));
                    push_toast(toasts, ToastKind::Success, text);
                    vehicles.restart();
                    employees.restart();
                }
                Err(err) => {
                    warn!(plate = %plate, "remove failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Remove failed: {err}"));
                }
            }
            busy.set(false);
        });
    });

    let on_add = move |evt: FormEvent| {
        evt.prevent_default();
        let plate = new_plate().trim().to_string();
        if normalize_plate(&plate).is_empty() {
            push_toast(toasts, ToastKind::Warning, "Enter a plate to add.");
            return;
        }
        let Some(category) = new_category() else {
            push_toast(toasts, ToastKind::Warning, "Choose a vehicle type.");
            return;
        };
        let Some(api) = current_client(client, toasts) else {
            return;
        };
        busy.set(true);
        spawn(async move {
            match api.add_vehicle(&plate, category).await {
                Ok(message) => {
                    let text = message.unwrap_or_else(|| format!("{plate} added."));
                    push_toast(toasts, ToastKind::Success, text);
                    new_plate.set(String::new());
                    vehicles.restart();
                }
                Err(err) => {
                    warn!(plate = %plate, "add failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Add failed: {err}"));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "toolbar",
            div {
                h1 { "Vehicles" }
                p { class: "muted", "{shown.len()} of {total} shown" }
            }
            button { class: "btn", onclick: on_refresh, "Refresh" }
        }

        div { class: "card",
            h2 { "Parked and booked vehicles" }
            input {
                class: "input",
                value: "{query}",
                placeholder: "Search by plate",
                oninput: move |evt| query.set(evt.value()),
            }
            if loading {
                div { class: "spinner", "Loading vehicles…" }
            } else if shown.is_empty() {
                p { class: "muted", "No vehicles match." }
            } else {
                table { class: "table",
                    thead {
                        tr {
                            th { "Plate" }
                            th { "Type" }
                            th { "State" }
                            th { "Time in" }
                            th {}
                        }
                    }
                    tbody {
                        for vehicle in shown {
                            tr { key: "{vehicle.id}",
                                td { "{vehicle.license_plate}" }
                                td { {vehicle.vehicle_type.clone().unwrap_or_default()} }
                                td {
                                    span {
                                        class: "{theme::vehicle_badge(vehicle.is_parked())}",
                                        "{vehicle.state_label()}"
                                    }
                                }
                                td { "{optional_timestamp(vehicle.time_in)}" }
                                td {
                                    button {
                                        class: "btn btn-danger",
                                        disabled: busy(),
                                        onclick: {
                                            let plate = vehicle.license_plate.clone();
                                            move |_| remove.call(plate.clone())
                                        },
                                        "Remove"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        div { class: "card",
            h2 { "Add vehicle" }
            form {
                onsubmit: on_add,
                div { class: "row",
                    div { class: "field",
                        label { "Plate" }
                        input {
                            class: "input",
                            value: "{new_plate}",
                            oninput: move |evt| new_plate.set(evt.value()),
                        }
                    }
                    div { class: "field",
                        label { "Vehicle type" }
                        CategorySelect {
                            value: new_category(),
                            on_change: move |value| new_category.set(value),
                        }
                    }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Add" }
            }
        }

        div { class: "card",
            h2 { "Employees on site" }
            if employee_slots.is_empty() {
                p { class: "muted", "No employee vehicles parked." }
            } else {
                table { class: "table",
                    thead {
                        tr { th { "Slot" } th { "Plate" } th { "Since" } }
                    }
                    tbody {
                        for slot in employee_slots {
                            tr { key: "{slot.slot_id}",
                                td { "{slot.slot_id}" }
                                td { {slot.parked_vehicle_plate.clone().unwrap_or_default()} }
                                td { "{optional_timestamp(slot.parked_time)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Plate search that ignores case, spaces and dashes.
pub fn filter_vehicles(vehicles: &[ParkedVehicle], query: &str) -> Vec<ParkedVehicle> {
    let needle = normalize_plate(query);
    vehicles
        .iter()
        .filter(|vehicle| needle.is_empty() || normalize_plate(&vehicle.license_plate).contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(plate: &str) -> ParkedVehicle {
        ParkedVehicle {
            id: plate.to_string(),
            license_plate: plate.to_string(),
            vehicle_type: Some("car".to_string()),
            parking_state: Some("parked".to_string()),
            time_in: None,
        }
    }

    #[test]
    fn search_ignores_formatting() {
        let list = vec![vehicle("CAB-1234"), vehicle("WP KA 9981"), vehicle("LA-2231")];
        let found = filter_vehicles(&list, "ka99");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].license_plate, "WP KA 9981");
        assert_eq!(filter_vehicles(&list, "  ").len(), 3);
        assert!(filter_vehicles(&list, "zz").is_empty());
    }
}
