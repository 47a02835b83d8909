//! GitHub REST adapter
//!
//! Implements [`crate::domain::ports::MembershipService`] over the GitHub v3
//! REST API: organization lookup at startup, paged member listing for the
//! reconciliation pass, and organization webhook registration.

pub mod client;

pub use client::{GithubClient, GithubConfig, GithubCredentials};
