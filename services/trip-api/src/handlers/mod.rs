//! HTTP handlers

mod health;
mod me;
mod telegram;

pub use health::{health, ready};
pub use me::me;
pub use telegram::validate_init_data;
