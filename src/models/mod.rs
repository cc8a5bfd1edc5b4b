pub mod identity;
pub mod lead;

pub use identity::Identity;
pub use lead::{LeadRequest, Platform, PlatformLink};
