use dioxus::{prelude::*, signals::Signal};
use tracing::{error, warn};

use crate::{
    config::ClientConfig,
    domain::AppState,
    infra::{CacheStatus, ParkingClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{
            BookingPage, ClearPage, DetectPage, LoginPage, RegisterPage, SettingsPage, SlotsPage,
            VehiclesPage,
        },
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// Shared handle to the API client; `None` when it could not be built.
pub type ClientHandle = Signal<Option<ParkingClient>>;

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/slots")]
    Slots {},
    #[route("/book/:slot_id")]
    Book { slot_id: u32 },
    #[route("/clear/:slot_id")]
    Clear { slot_id: u32 },
    #[route("/detect")]
    Detect {},
    #[route("/vehicles")]
    Vehicles {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let config = use_context::<ClientConfig>();

    let state = use_signal({
        let config = config.clone();
        move || {
            let mut initial = AppState {
                rate_per_hour: config.rate_per_hour,
                ..AppState::default()
            };
            if let Some(saved) = load_persisted_state() {
                initial.apply_persisted(saved);
            }
            initial
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let client: ClientHandle = use_signal({
        let config = config.clone();
        move || build_client(&config, state.peek().api_base_url.as_deref())
    });
    use_context_provider(|| client);

    rsx! {
        document::Link { rel: "icon", href: assets::logo_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Builds a client for the configured service, honouring a URL saved in settings.
pub fn build_client(config: &ClientConfig, saved_url: Option<&str>) -> Option<ParkingClient> {
    let config = config.clone().with_base_url_override(saved_url);
    match ParkingClient::new(&config) {
        Ok(client) => Some(client),
        Err(err) => {
            error!("failed to initialise API client: {err}");
            None
        }
    }
}

pub fn current_client(client: ClientHandle, toasts: Signal<Vec<ToastMessage>>) -> Option<ParkingClient> {
    let current = client();
    if current.is_none() {
        push_toast(
            toasts,
            ToastKind::Error,
            "API client unavailable. Check the server address in Settings.",
        );
    }
    current
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!("failed to persist user state: {err}");
    }
}

/// Pulls the slot list into app state and reports how fresh it was.
pub async fn refresh_slots(
    mut state: Signal<AppState>,
    client: ClientHandle,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<CacheStatus> {
    let api = current_client(client, toasts)?;
    match api.list_slots().await {
        Ok(payload) => {
            state.with_mut(|st| st.record_slots(payload.data, payload.fetched_at));
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "Server unreachable; showing the last known slot list.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            error!("failed to load slots: {err}");
            push_toast(toasts, ToastKind::Error, format!("Failed to load slots: {err}"));
            None
        }
    }
}

#[component]
pub fn Login() -> Element {
    rsx! { LoginPage {} }
}

#[component]
pub fn Register() -> Element {
    rsx! { RegisterPage {} }
}

#[component]
pub fn Slots() -> Element {
    rsx! { Shell { SlotsPage {} } }
}

#[component]
pub fn Book(slot_id: u32) -> Element {
    rsx! { Shell { BookingPage { slot_id } } }
}

#[component]
pub fn Clear(slot_id: u32) -> Element {
    rsx! { Shell { ClearPage { slot_id } } }
}

#[component]
pub fn Detect() -> Element {
    rsx! { Shell { DetectPage {} } }
}

#[component]
pub fn Vehicles() -> Element {
    rsx! { Shell { VehiclesPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
