pub mod category_bar;
pub mod category_select;
pub mod kpi_card;
pub mod slot_grid;
pub mod toast;
