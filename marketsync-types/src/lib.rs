//! marketsync-specific error, configuration and report types.
#![warn(missing_docs)]

mod capability;
mod config;
mod connector;
mod error;
mod reports;
mod window;

pub use capability::Capability;
pub use config::{DedupPolicy, SyncConfig};
pub use connector::VenueKey;
pub use error::SyncError;
pub use reports::{CoverageGap, CoverageReport, GapReason};
pub use window::FetchWindow;
