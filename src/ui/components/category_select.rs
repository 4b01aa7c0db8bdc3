use dioxus::prelude::*;

use crate::domain::VehicleCategory;

#[component]
pub fn CategorySelect(
    value: Option<VehicleCategory>,
    on_change: EventHandler<Option<VehicleCategory>>,
) -> Element {
    rsx! {
        select {
            class: "input",
            onchange: move |evt| on_change.call(evt.value().parse().ok()),
            option { value: "", selected: value.is_none(), "Select a vehicle type" }
            for category in VehicleCategory::ALL {
                option {
                    value: "{category.key()}",
                    selected: value == Some(category),
                    "{category.emoji()} {category.label()}"
                }
            }
        }
    }
}
