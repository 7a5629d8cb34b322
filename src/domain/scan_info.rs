// Scan status snapshot as reported by the scan server
use crate::error::MalformedResponse;
use crate::infrastructure::xml::{parse_number, Element};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

const DOCUMENT: &str = "ScanInfo";
const ROOT_TAG: &str = "scan";
const LIST_ROOT_TAG: &str = "scans";
const ID_TAG: &str = "id";
const NAME_TAG: &str = "name";
const CREATED_TAG: &str = "created";
const STATE_TAG: &str = "state";
const RUNTIME_TAG: &str = "runtime";
const TOTAL_WORK_TAG: &str = "total_work_units";
const COMPLETED_WORK_TAG: &str = "performed_work_units";
const ADDRESS_TAG: &str = "address";
const COMMAND_TAG: &str = "command";

/// Server-side scan state. Strings the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ScanState {
    Idle,
    Running,
    Paused,
    Finished,
    Aborted,
    Failed,
    Unknown(String),
}

impl ScanState {
    pub fn from_wire(text: &str) -> Self {
        match text {
            "Idle" => ScanState::Idle,
            "Running" => ScanState::Running,
            "Paused" => ScanState::Paused,
            "Finished" => ScanState::Finished,
            "Aborted" => ScanState::Aborted,
            "Failed" => ScanState::Failed,
            other => ScanState::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScanState::Idle => "Idle",
            ScanState::Running => "Running",
            ScanState::Paused => "Paused",
            ScanState::Finished => "Finished",
            ScanState::Aborted => "Aborted",
            ScanState::Failed => "Failed",
            ScanState::Unknown(other) => other,
        }
    }

    /// Finished, aborted or failed: the scan will not change any more.
    pub fn is_done(&self) -> bool {
        matches!(self, ScanState::Finished | ScanState::Aborted | ScanState::Failed)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ScanState> for String {
    fn from(state: ScanState) -> Self {
        state.as_str().to_string()
    }
}

/// Details of one scan, built from a `<scan>` document like
///
/// ```xml
/// <scan>
///     <id>15</id>
///     <name>example1</name>
///     <created>1424465207911</created>
///     <state>Idle</state>
///     <runtime>0</runtime>
///     <total_work_units>22</total_work_units>
///     <performed_work_units>0</performed_work_units>
///     <address>-1</address>
///     <command/>
/// </scan>
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanInfo {
    pub id: u64,
    pub name: String,
    pub created: DateTime<Utc>,
    pub state: ScanState,
    pub runtime: String,
    pub total_work: u64,
    pub completed_work: u64,
    /// Address of the active command, -1 when none is active
    pub address: i64,
    pub command: String,
}

impl ScanInfo {
    pub fn parse(xml: &str) -> Result<Self, MalformedResponse> {
        let root = Element::parse(xml)?.expect_root(DOCUMENT, ROOT_TAG)?;
        Self::from_element(&root)
    }

    /// Parse the `<scans>` listing returned for all scans.
    pub fn parse_list(xml: &str) -> Result<Vec<Self>, MalformedResponse> {
        let root = Element::parse(xml)?.expect_root("ScanInfo list", LIST_ROOT_TAG)?;
        root.children_named(ROOT_TAG).map(Self::from_element).collect()
    }

    pub fn from_element(root: &Element) -> Result<Self, MalformedResponse> {
        Ok(Self {
            id: root.required_number(DOCUMENT, ID_TAG)?,
            name: root.required_text(DOCUMENT, NAME_TAG)?.trim().to_string(),
            created: parse_created(root.required_text(DOCUMENT, CREATED_TAG)?)?,
            state: ScanState::from_wire(root.required_text(DOCUMENT, STATE_TAG)?.trim()),
            runtime: root.required_text(DOCUMENT, RUNTIME_TAG)?.trim().to_string(),
            total_work: root.required_number(DOCUMENT, TOTAL_WORK_TAG)?,
            completed_work: root.required_number(DOCUMENT, COMPLETED_WORK_TAG)?,
            address: root.required_number(DOCUMENT, ADDRESS_TAG)?,
            command: root.required_text(DOCUMENT, COMMAND_TAG)?.trim().to_string(),
        })
    }

    pub fn is_idle(&self) -> bool {
        self.state == ScanState::Idle
    }

    pub fn is_running(&self) -> bool {
        self.state == ScanState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == ScanState::Paused
    }

    pub fn is_finished(&self) -> bool {
        self.state == ScanState::Finished
    }

    pub fn is_aborted(&self) -> bool {
        self.state == ScanState::Aborted
    }

    pub fn is_failed(&self) -> bool {
        self.state == ScanState::Failed
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Percent of work performed; `None` while the server reports no work units.
    pub fn progress(&self) -> Option<f64> {
        if self.total_work == 0 {
            return None;
        }
        Some(100.0 * self.completed_work as f64 / self.total_work as f64)
    }
}

impl fmt::Display for ScanInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanInfo{{ id={}, name='{}', state={} created='{}' }}",
            self.id, self.name, self.state, self.created
        )
    }
}

// The server reports epoch milliseconds.
fn parse_created(text: &str) -> Result<DateTime<Utc>, MalformedResponse> {
    let millis: i64 = parse_number(CREATED_TAG, text)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| MalformedResponse::InvalidTimestamp {
        field: CREATED_TAG,
        value: text.to_string(),
    })
}
