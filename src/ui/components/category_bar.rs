use dioxus::prelude::*;

use crate::domain::{CategoryOccupancy, VehicleCategory};
use crate::ui::theme;

#[component]
pub fn CategoryBar(
    category: VehicleCategory,
    occupancy: CategoryOccupancy,
    selected: bool,
    on_select: EventHandler<VehicleCategory>,
) -> Element {
    let percent = (occupancy.utilisation() * 100.0).round();
    let bar_class = theme::occupancy_bar(occupancy.is_full());
    let row_class = if selected { "category selected" } else { "category" };

    rsx! {
        div {
            class: "{row_class}",
            onclick: move |_| on_select.call(category),
            span { "{category.emoji()} {category.label()}" }
            div {
                class: "{bar_class}",
                span { style: "width: {percent}%" }
            }
            span {
                class: "muted",
                "{occupancy.available} free of {occupancy.total}"
            }
        }
    }
}
