//! Client for a remote scan server.
//!
//! Scans are built from [`Command`]s collected in a [`CommandSequence`],
//! rendered to the server's `<commands>` XML and submitted through a
//! [`ScanClient`]. Status and logged data come back as [`ScanInfo`] and
//! [`ScanData`].
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::scan_client::ScanClient;
pub use application::scan_server::{ScanAction, ScanResource, ScanServer};
pub use domain::command::{
    Command, Comment, Comparison, Delay, Generic, Include, Log, Loop, ScanValue, Script, Set, Wait,
};
pub use domain::patch::Patch;
pub use domain::scan_data::{DeviceSeries, ScanData};
pub use domain::scan_id::ScanId;
pub use domain::scan_info::{ScanInfo, ScanState};
pub use domain::sequence::{CommandSequence, ScanSource};
pub use error::{MalformedResponse, Result, ScanError};
pub use infrastructure::config::{load_client_config, ClientConfig};
pub use infrastructure::http_scan_server::HttpScanServer;
