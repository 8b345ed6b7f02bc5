//! The recurring template of income and expense items.

mod core;
mod template_page;

pub use core::{
    TemplateItem, create_template_table, get_template_items, seed_template,
};
pub use template_page::{get_template_page, update_template_endpoint};
