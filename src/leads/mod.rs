pub mod form;
pub mod webhook;

pub use form::{LeadForm, SUBMITTED_MESSAGE};
pub use webhook::{LeadSubmitter, WebhookSubmitter};
