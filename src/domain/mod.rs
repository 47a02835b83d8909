//! Core domain traits

pub mod ports;

pub use ports::{MembershipService, VolumeStore, WebhookRegistration};
