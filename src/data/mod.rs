pub mod install_config;
pub mod paths;
pub mod settings;
