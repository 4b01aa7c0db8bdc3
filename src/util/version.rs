pub const APP_NAME: &str = "Park Vision";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_SLUG: &str = "park-vision";

pub fn version_label() -> String {
    format!("v{APP_VERSION}")
}

/// `User-Agent` sent with every request to the parking service.
pub fn user_agent() -> String {
    format!("{APP_SLUG}/{APP_VERSION}")
}
