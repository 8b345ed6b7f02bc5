//! The app's settings: the balance figures and the girls' allowances.

mod balance_endpoint;
mod core;

pub use balance_endpoint::update_balance_endpoint;
pub use core::{
    SettingKey, Settings, create_settings_table, get_setting, get_settings,
    insert_default_settings, set_setting,
};
