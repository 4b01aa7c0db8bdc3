use dioxus::prelude::*;

#[component]
pub fn KpiCard(title: String, value: String, description: Option<String>) -> Element {
    rsx! {
        div {
            class: "kpi",
            h3 { class: "muted", "{title}" }
            p { class: "value", "{value}" }
            if let Some(desc) = description {
                p { class: "desc", "{desc}" }
            }
        }
    }
}
