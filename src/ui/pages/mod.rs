pub mod booking;
pub mod clear;
pub mod detect;
pub mod login;
pub mod register;
pub mod settings;
pub mod slots;
pub mod vehicles;

pub use booking::BookingPage;
pub use clear::ClearPage;
pub use detect::DetectPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use settings::SettingsPage;
pub use slots::SlotsPage;
pub use vehicles::VehiclesPage;
