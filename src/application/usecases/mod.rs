pub mod get_config;
pub mod inspect_settings;
pub mod show_config;
