pub mod app_core;
pub mod controller;
pub mod status;
pub mod ui;

pub use app_core::DashboardApp;
pub use controller::SessionController;
