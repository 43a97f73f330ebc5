pub mod app;
pub mod data;
pub mod download;
pub mod install;
pub mod ui;
pub mod utils;

pub const APP_NAME: &str = "Core Music";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
