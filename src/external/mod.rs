//! Outbound HTTP integrations.

pub mod client;
