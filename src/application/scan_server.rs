// Transport seam for the scan server's REST endpoints
use crate::domain::scan_id::ScanId;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Per-scan resources available through `GET /scan/{id}[/...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResource {
    Info,
    Commands,
    Data,
    LastSerial,
    Devices,
}

impl ScanResource {
    /// Path segment after `/scan/{id}`, `None` for the scan itself.
    pub fn path_segment(&self) -> Option<&'static str> {
        match self {
            ScanResource::Info => None,
            ScanResource::Commands => Some("commands"),
            ScanResource::Data => Some("data"),
            ScanResource::LastSerial => Some("last_serial"),
            ScanResource::Devices => Some("devices"),
        }
    }
}

/// State changes requested with `PUT /scan/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    Pause,
    Resume,
    Abort,
}

impl ScanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanAction::Pause => "pause",
            ScanAction::Resume => "resume",
            ScanAction::Abort => "abort",
        }
    }
}

impl fmt::Display for ScanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw access to the scan server. Bodies go out and come back as XML text.
#[async_trait]
pub trait ScanServer: Send + Sync {
    /// `POST /scan/{name}`; returns the `<id>` document
    async fn submit(&self, name: &str, xml: &str) -> Result<String>;

    /// `POST /simulate`
    async fn simulate(&self, xml: &str) -> Result<String>;

    /// `DELETE /scan/{id}`
    async fn delete(&self, id: ScanId) -> Result<()>;

    /// `DELETE /scans/completed`
    async fn clear_completed(&self) -> Result<()>;

    /// `GET /scan/{id}` and its sub-resources
    async fn fetch(&self, id: ScanId, resource: ScanResource) -> Result<String>;

    /// `GET /scans`
    async fn list_scans(&self) -> Result<String>;

    /// `GET /server/info`
    async fn server_info(&self) -> Result<String>;

    /// `PUT /scan/{id}/{pause|resume|abort}`
    async fn control(&self, id: ScanId, action: ScanAction) -> Result<()>;

    /// `PUT /scan/{id}/patch`
    async fn patch(&self, id: ScanId, xml: &str) -> Result<()>;
}
