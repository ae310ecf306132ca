//! Password auth for the app: a single password set at registration, a
//! private session cookie, and middleware that guards the record-keeping
//! pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_register_page, register_user};
pub use user::{User, count_users, create_user, create_user_table, get_user, set_password};
