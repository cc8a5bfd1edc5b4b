//! Library exports for knowleadge, shared between the binary and tests.

pub mod bridge;
pub mod cache;
pub mod config;
pub mod errors;
pub mod leads;
pub mod models;
pub mod session;
pub mod startup;
pub mod state;
pub mod utils;
