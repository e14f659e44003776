//! Domain layer: core entities and business rules.

pub mod composer;
pub mod events;
pub mod message;
pub mod outbox;
pub mod shell_state;
pub mod toast;
pub mod transcript;
pub mod unread;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
