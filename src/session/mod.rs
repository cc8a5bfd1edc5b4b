//! Session state: the single current identity, its cache mirror, the
//! readiness flag, and the controller that reconciles them.

pub mod controller;
pub mod readiness;
pub mod store;

pub use controller::{SessionController, SessionView};
pub use readiness::Readiness;
pub use store::{SessionStore, SESSION_CACHE_KEY};
