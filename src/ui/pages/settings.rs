use dioxus::prelude::*;
use tracing::info;

use crate::{
    app::{build_client, persist_user_state, ClientHandle, Route},
    config::{parse_base_url, ClientConfig},
    domain::{fee::DEFAULT_RATE_PER_HOUR, AppState, VehicleCategory},
    ui::{
        components::{
            category_select::CategorySelect,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        format::{humanize_age, money},
    },
    util::version::version_label,
};

#[component]
pub fn SettingsPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut client = use_context::<ClientHandle>();
    let config = use_context::<ClientConfig>();
    let nav = use_navigator();

    let (saved_url, saved_rate, vehicle_type, fetched_at) = state.with(|st| {
        (
            st.api_base_url.clone(),
            st.rate_per_hour,
            st.session.as_ref().and_then(|user| user.vehicle_type),
            st.slots_fetched_at,
        )
    });
    let active_url = client
        .read()
        .as_ref()
        .map(|api| api.base_url().to_string())
        .unwrap_or_else(|| "unavailable".to_string());

    let mut url_input = use_signal(|| saved_url.clone().unwrap_or_default());
    let mut rate_input = use_signal(|| format!("{saved_rate:.2}"));

    let on_apply = {
        let config = config.clone();
        move |_| match parse_settings(&url_input(), &rate_input()) {
            Ok((url, rate)) => {
                state.with_mut(|st| {
                    st.api_base_url = url.clone();
                    st.rate_per_hour = rate;
                });
                client.set(build_client(&config, url.as_deref()));
                persist_user_state(&state);
                info!(api = ?url, rate, "settings updated");
                push_toast(toasts, ToastKind::Success, "Settings saved.");
            }
            Err(message) => push_toast(toasts, ToastKind::Error, message),
        }
    };

    let on_reset = {
        let config = config.clone();
        move |_| {
            url_input.set(String::new());
            rate_input.set(format!("{:.2}", config.rate_per_hour));
            state.with_mut(|st| {
                st.api_base_url = None;
                st.rate_per_hour = config.rate_per_hour;
            });
            client.set(build_client(&config, None));
            persist_user_state(&state);
            push_toast(toasts, ToastKind::Info, "Restored default settings.");
        }
    };

    let on_vehicle_type = move |value: Option<VehicleCategory>| {
        state.with_mut(|st| st.set_vehicle_type(value));
        persist_user_state(&state);
    };

    let on_drop_cache = move |_| {
        let Some(api) = client.peek().clone() else {
            return;
        };
        spawn(async move {
            api.invalidate_slots().await;
            push_toast(
                toasts,
                ToastKind::Info,
                "Cached slot list dropped. The next screen reloads it.",
            );
        });
    };

    let on_logout = move |_| {
        state.with_mut(|st| st.sign_out());
        persist_user_state(&state);
        nav.replace(Route::Login {});
    };

    let ranges = state.with(|st| st.table.ranges().to_vec());
    let cache_age = fetched_at
        .map(humanize_age)
        .unwrap_or_else(|| "never".to_string());

    rsx! {
        div { class: "card",
            h2 { "Server" }
            p { class: "muted", "Active: {active_url}" }
            div { class: "row",
                div { class: "field",
                    label { "API base URL (blank uses the environment default)" }
                    input {
                        class: "input",
                        value: "{url_input}",
                        placeholder: "http://127.0.0.1:8000/",
                        oninput: move |evt| url_input.set(evt.value()),
                    }
                }
                div { class: "field",
                    label { "Clearing rate per hour" }
                    input {
                        class: "input",
                        value: "{rate_input}",
                        oninput: move |evt| rate_input.set(evt.value()),
                    }
                }
            }
            div { class: "actions",
                button { class: "btn btn-primary", onclick: on_apply, "Apply" }
                button { class: "btn", onclick: on_reset, "Reset defaults" }
            }
        }

        div { class: "card",
            h2 { "Profile" }
            div { class: "field",
                label { "Vehicle type" }
                CategorySelect { value: vehicle_type, on_change: on_vehicle_type }
            }
            button { class: "btn btn-danger", onclick: on_logout, "Log out" }
        }

        div { class: "card",
            h2 { "Lot layout" }
            table { class: "table",
                thead { tr { th { "Category" } th { "Slots" } th { "Capacity" } } }
                tbody {
                    for range in ranges {
                        tr { key: "{range.category.key()}",
                            td { "{range.category.emoji()} {range.category.label()}" }
                            td { "{range.start}–{range.end}" }
                            td { "{range.capacity()}" }
                        }
                    }
                }
            }
        }

        div { class: "card",
            h2 { "Cache" }
            p { class: "muted", "Slot list fetched {cache_age}." }
            button { class: "btn", onclick: on_drop_cache, "Drop cached slots" }
        }

        p { class: "muted", "{version_label()} · default rate {money(DEFAULT_RATE_PER_HOUR)}/h" }
    }
}

/// Validates the settings form. A blank URL clears the override.
pub fn parse_settings(url_raw: &str, rate_raw: &str) -> Result<(Option<String>, f64), String> {
    let url = match url_raw.trim() {
        "" => None,
        raw => Some(
            parse_base_url(raw)
                .map_err(|err| format!("Invalid server address: {err}"))?
                .to_string(),
        ),
    };
    let rate: f64 = rate_raw
        .trim()
        .parse()
        .map_err(|_| "Rate must be a number.".to_string())?;
    if !rate.is_finite() || rate < 0.0 {
        return Err("Rate must be zero or more.".to_string());
    }
    Ok((url, rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_clears_the_override() {
        assert_eq!(parse_settings("  ", "12.5"), Ok((None, 12.5)));
    }

    #[test]
    fn url_is_normalised_with_trailing_slash() {
        let (url, _) = parse_settings("http://10.0.2.2:8000", "10").unwrap();
        assert_eq!(url.as_deref(), Some("http://10.0.2.2:8000/"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse_settings("not a url", "10").is_err());
        assert!(parse_settings("", "ten").is_err());
        assert!(parse_settings("", "-1").is_err());
    }
}
