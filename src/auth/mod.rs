//! Passphrase log-in, the auth cookie and the middleware guarding protected routes.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod passphrase;
mod redirect;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use passphrase::Passphrase;
pub use redirect::normalize_redirect_url;
pub(super) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
