// Per-device sample series logged by a scan
use crate::error::MalformedResponse;
use crate::infrastructure::xml::{parse_number, Element};
use serde::Serialize;

const DOCUMENT: &str = "ScanData";
const ROOT_TAG: &str = "data";
const DEVICE_TAG: &str = "device";
const NAME_TAG: &str = "name";
const SAMPLES_TAG: &str = "samples";
const SAMPLE_TAG: &str = "sample";
const SAMPLE_ID_ATT: &str = "id";
const TIME_TAG: &str = "time";
const VALUE_TAG: &str = "value";

/// Samples of one device, ordered by sample id. `times[i]` belongs to `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSeries {
    pub name: String,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl DeviceSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Data of a running or finished scan, built from a `<data>` document like
///
/// ```xml
/// <data>
///     <device>
///         <name>D_M:LS1_CA01:BPM_D1144:POSH_RD</name>
///         <samples>
///             <sample id="0">
///                 <time>1424466313887</time>
///                 <value>-0.0147678</value>
///             </sample>
///         </samples>
///     </device>
/// </data>
/// ```
///
/// Devices keep the order in which they first appear in the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScanData {
    series: Vec<DeviceSeries>,
}

impl ScanData {
    /// All-or-nothing: any bad sample fails the whole document.
    pub fn parse(xml: &str) -> Result<Self, MalformedResponse> {
        let root = Element::parse(xml)?.expect_root(DOCUMENT, ROOT_TAG)?;

        let mut data = ScanData::default();
        for device in root.children_named(DEVICE_TAG) {
            data.insert(parse_device(device)?);
        }

        tracing::debug!("Parsed scan data for {} devices", data.series.len());
        Ok(data)
    }

    // A repeated device replaces its earlier series but keeps the first-seen slot.
    fn insert(&mut self, series: DeviceSeries) {
        match self.series.iter_mut().find(|s| s.name == series.name) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn devices(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn series(&self, device: &str) -> Option<&DeviceSeries> {
        self.series.iter().find(|s| s.name == device)
    }

    pub fn times(&self, device: &str) -> Option<&[f64]> {
        self.series(device).map(|s| s.times.as_slice())
    }

    pub fn values(&self, device: &str) -> Option<&[f64]> {
        self.series(device).map(|s| s.values.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScanData {
    type Item = &'a DeviceSeries;
    type IntoIter = std::slice::Iter<'a, DeviceSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

fn parse_device(device: &Element) -> Result<DeviceSeries, MalformedResponse> {
    let name = device.required_text(DOCUMENT, NAME_TAG)?.trim().to_string();
    let samples = device.required_child(DOCUMENT, SAMPLES_TAG)?;

    let mut rows = Vec::new();
    for sample in samples.children_named(SAMPLE_TAG) {
        let id = sample
            .attribute(SAMPLE_ID_ATT)
            .ok_or(MalformedResponse::MissingAttribute {
                element: SAMPLE_TAG,
                attribute: SAMPLE_ID_ATT,
            })?;
        let id: i64 = parse_number(SAMPLE_ID_ATT, id)?;
        let time: f64 = sample.required_number(DOCUMENT, TIME_TAG)?;
        let value: f64 = sample.required_number(DOCUMENT, VALUE_TAG)?;
        rows.push((id, time, value));
    }

    // Stable sort on id only; document order and time are irrelevant.
    rows.sort_by_key(|(id, _, _)| *id);

    let (times, values) = rows.into_iter().map(|(_, time, value)| (time, value)).unzip();
    Ok(DeviceSeries {
        name,
        times,
        values,
    })
}
