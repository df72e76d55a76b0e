// sitewatch-api: Async Rust client for the site device status endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::StatusClient;
pub use error::Error;
pub use models::{LooseValue, SiteStatusRecord};
