use dioxus::prelude::*;
use tracing::info;

use crate::app::{persist_user_state, Route};
use crate::domain::AppState;
use crate::ui::pages::LoginPage;
use crate::ui::theme;
use crate::util::{assets, version::APP_NAME};

/// Header and navigation for signed-in screens. Without a session the login
/// form is shown in place of the requested page.
#[component]
pub fn Shell(children: Element) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let Some(user) = state.with(|s| s.session.clone()) else {
        return rsx! {
            div { class: "app", LoginPage {} }
        };
    };

    let vehicle = user
        .vehicle_type
        .map(|category| format!("{} {}", category.emoji(), category.label()))
        .unwrap_or_else(|| "Vehicle type not set".to_string());

    let on_logout = move |_| {
        info!("signing out");
        state.with_mut(|st| st.sign_out());
        persist_user_state(&state);
        nav.replace(Route::Login {});
    };

    rsx! {
        div { class: "app",
            header {
                class: "header",
                div { class: "brand",
                    img { src: assets::logo_data_uri(), alt: "logo" }
                    div {
                        h1 { "{APP_NAME}" }
                        p { "{user.username} · {user.vehicle_plate} · {vehicle}" }
                    }
                }
                nav {
                    NavButton { active: matches!(current_route, Route::Slots {} | Route::Book { .. } | Route::Clear { .. }), onclick: move |_| { nav.push(Route::Slots {}); }, label: "🅿️ Slots" }
                    NavButton { active: matches!(current_route, Route::Detect {}), onclick: move |_| { nav.push(Route::Detect {}); }, label: "📷 Detect" }
                    NavButton { active: matches!(current_route, Route::Vehicles {}), onclick: move |_| { nav.push(Route::Vehicles {}); }, label: "🚗 Vehicles" }
                    NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "⚙️" }
                    button { class: "btn btn-danger", onclick: on_logout, "Log out" }
                }
            }
            main { class: "main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
