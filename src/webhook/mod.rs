//! Webhook receiver
//!
//! - [`events`]: closed enumerations over the GitHub event header and the
//!   organization-event `action` field
//! - [`routes`]: the axum router and handlers

pub mod events;
pub mod routes;

pub use events::{EventKind, OrgAction};
pub use routes::{webhook_router, WebhookState};
