use dioxus::prelude::*;
use tracing::warn;

use crate::{
    app::{current_client, persist_user_state, ClientHandle, Route},
    domain::{AppState, VehicleCategory},
    ui::{
        components::{
            category_select::CategorySelect,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        pages::login::validate_credentials,
        theme,
    },
};

#[component]
pub fn RegisterPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ClientHandle>();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut plate = use_signal(String::new);
    let mut category = use_signal(|| None::<VehicleCategory>);
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
        let Some(vehicle_type) = category() else {
            error.set(Some("Choose your vehicle type.".to_string()));
            return;
        };
        let Some(api) = current_client(client, toasts) else {
            return;
        };

        busy.set(true);
        error.set(None);
        spawn(async move {
            match api.register(&name, &vehicle_plate, Some(vehicle_type)).await {
                Ok(user) => {
                    state.with_mut(|st| st.sign_in(user));
                    persist_user_state(&state);
                    push_toast(toasts, ToastKind::Success, "Account created.");
                    nav.replace(Route::Slots {});
                }
                Err(err) => {
                    warn!(username = %name, "registration failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "auth card",
            h1 { "Create account" }
            p { class: "muted", "Your vehicle type decides which slots you can book." }
            form {
                onsubmit: on_submit,
                div { class: "field",
                    label { "Username" }
                    input {
                        class: "input",
                        value: "{username}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                div { class: "field",
                    label { "Vehicle plate" }
                    input {
                        class: "input",
                        value: "{plate}",
                        oninput: move |evt| plate.set(evt.value()),
                    }
                }
                div { class: "field",
                    label { "Vehicle type" }
                    CategorySelect {
                        value: category(),
                        on_change: move |value| category.set(value),
                    }
                }
                if let Some(message) = error() {
                    p { class: "{theme::message(false)}", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Registering…" } else { "Register" }
                }
            }
            button {
                class: "btn btn-link",
                onclick: move |_| { nav.push(Route::Login {}); },
                "Already registered? Sign in"
            }
        }
    }
}
