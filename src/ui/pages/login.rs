use dioxus::prelude::*;
use tracing::warn;

use crate::{
    app::{current_client, persist_user_state, ClientHandle, Route},
    domain::{normalize_plate, AppState},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::{assets, version::APP_NAME},
};

#[component]
pub fn LoginPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut plate = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let name = username().trim().to_string();
        let vehicle_plate = plate().trim().to_string();
        if let Err(message) = validate_credentials(&name, &vehicle_plate) {
            error.set(Some(message));
            return;
        }
        let Some(api) = current_client(client, toasts) else {
            return;
        };

        busy.set(true);
        error.set(None);
        spawn(async move {
            match api.login(&name, &vehicle_plate).await {
                Ok(user) => {
                    state.with_mut(|st| st.sign_in(user));
                    persist_user_state(&state);
                    push_toast(toasts, ToastKind::Success, format!("Welcome back, {name}."));
                    nav.replace(Route::Slots {});
                }
                Err(err) => {
                    warn!(username = %name, "login failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "auth card",
            img { src: assets::logo_data_uri(), alt: "logo", width: "56" }
            h1 { "{APP_NAME}" }
            p { class: "muted", "Sign in with your username and vehicle plate." }
            form {
                onsubmit: on_submit,
                div { class: "field",
                    label { "Username" }
                    input {
                        class: "input",
                        value: "{username}",
                        autofocus: true,
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                div { class: "field",
                    label { "Vehicle plate" }
                    input {
                        class: "input",
                        value: "{plate}",
                        placeholder: "e.g. CAB-1234",
                        oninput: move |evt| plate.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "{theme::message(false)}", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in…" } else { "Sign in" }
                }
            }
            button {
                class: "btn btn-link",
                onclick: move |_| { nav.push(Route::Register {}); },
                "No account yet? Register"
            }
        }
    }
}

/// Checks the form locally before anything is sent.
pub fn validate_credentials(username: &str, vehicle_plate: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Enter a username.".to_string());
    }
    if normalize_plate(vehicle_plate).is_empty() {
        return Err("Enter your vehicle plate.".to_string());
    }
    Ok(())
}
