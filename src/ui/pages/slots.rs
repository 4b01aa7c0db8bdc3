use std::{collections::HashSet, time::Duration};

use dioxus::prelude::*;

use crate::{
    app::{refresh_slots, ClientHandle, Route},
    config::ClientConfig,
    domain::{active_booking, slots_in_category, AppState, VehicleCategory},
    infra::CacheStatus,
    ui::{
        components::{
            category_bar::CategoryBar, kpi_card::KpiCard, slot_grid::SlotGrid,
            toast::ToastMessage,
        },
        format::humanize_age,
    },
};

#[component]
pub fn SlotsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();
    let nav = use_navigator();

    let mut selected = use_signal(|| None::<VehicleCategory>);
    let mut loader = use_resource(move || async move { refresh_slots(state, client, toasts).await });

    // Keep the overview current while it stays open.
    let ttl = use_context::<ClientConfig>().slot_cache_ttl;
    let _poller = use_future(move || async move {
        loop {
            tokio::time::sleep(ttl.max(Duration::from_secs(1))).await;
            if state.peek().slots_stale(ttl) {
                loader.restart();
            }
        }
    });

    let on_refresh = move |_| {
        spawn(async move {
            if let Some(api) = client.peek().clone() {
                api.invalidate_slots().await;
            }
            loader.restart();
        });
    };

    let (table, slots, fetched_at, report, my_plate, user_category) = state.with(|st| {
        (
            st.table.clone(),
            st.slots.clone(),
            st.slots_fetched_at,
            st.occupancy(),
            st.session.as_ref().map(|user| user.vehicle_plate.clone()),
            st.user_category(),
        )
    });

    let loading = loader.read().is_none() && fetched_at.is_none();
    let stale = matches!(*loader.read(), Some(Some(CacheStatus::Stale)));
    let active_category = selected().or(user_category).unwrap_or(VehicleCategory::Cars);
    let my_booking = my_plate
        .as_deref()
        .and_then(|plate| active_booking(&slots, plate))
        .map(|slot| slot.slot_id);
    let grid = slots_in_category(&table, active_category, &slots);
    let occupied: HashSet<u32> = grid
        .iter()
        .filter(|slot| slot.is_occupied())
        .map(|slot| slot.slot_id)
        .collect();
    let range_label = table
        .range_for(active_category)
        .map(|range| format!("slots {} to {}", range.start, range.end))
        .unwrap_or_default();
    let updated = fetched_at
        .map(|time| format!("Updated {}", humanize_age(time)))
        .unwrap_or_else(|| "Not loaded yet".to_string());
    let reported_note = (report.unmapped > 0)
        .then(|| format!("{} ids outside the lot layout ignored", report.unmapped));
    let categories = table
        .ranges()
        .iter()
        .map(|range| (range.category, report.category(range.category)))
        .collect::<Vec<_>>();

    rsx! {
        div {
            div { class: "toolbar",
                div {
                    h1 { "Parking overview" }
                    p {
                        class: "muted",
                        "{updated}"
                        if stale { " · server unreachable, showing last known state" }
                    }
                }
                button { class: "btn", onclick: on_refresh, "Refresh" }
            }

            if loading {
                div { class: "spinner", "Loading slots…" }
            } else {
                div { class: "kpis",
                    KpiCard { title: "Capacity".to_string(), value: report.capacity.to_string(), description: None }
                    KpiCard { title: "Occupied".to_string(), value: report.occupied_overall.to_string(), description: None }
                    KpiCard { title: "Available".to_string(), value: report.available_overall.to_string(), description: None }
                    KpiCard { title: "Reported".to_string(), value: report.total.to_string(), description: reported_note }
                }

                if let Some(slot_id) = my_booking {
                    div { class: "card",
                        h2 { "Your booking" }
                        p { "You hold slot {slot_id}." }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| { nav.push(Route::Clear { slot_id }); },
                            "Manage booking"
                        }
                    }
                }

                div { class: "card",
                    h2 { "Categories" }
                    for (category, occupancy) in categories {
                        CategoryBar {
                            key: "{category.key()}",
                            category,
                            occupancy,
                            selected: category == active_category,
                            on_select: move |picked| selected.set(Some(picked)),
                        }
                    }
                }

                div { class: "card",
                    h2 { "{active_category.emoji()} {active_category.label()} · {range_label}" }
                    SlotGrid {
                        slots: grid,
                        my_plate,
                        on_select: move |slot_id: u32| {
                            if occupied.contains(&slot_id) {
                                nav.push(Route::Clear { slot_id });
                            } else {
                                nav.push(Route::Book { slot_id });
                            }
                        },
                    }
                }
            }
        }
    }
}
