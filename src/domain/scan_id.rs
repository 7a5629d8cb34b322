// Identifier the server assigns to a submitted scan
use crate::error::{MalformedResponse, ScanError};
use crate::infrastructure::xml::{parse_number, Element};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ScanId(pub u64);

impl ScanId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse the `<id>n</id>` body returned by a submit.
    pub fn parse_response(xml: &str) -> Result<Self, MalformedResponse> {
        let root = Element::parse(xml)?.expect_root("submit response", "id")?;
        Ok(Self(parse_number("id", &root.text)?))
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ScanId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ScanId {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ScanId)
            .map_err(|_| ScanError::invalid(format!("scan id must be a non-negative integer, got '{s}'")))
    }
}
