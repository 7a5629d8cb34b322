// Small response documents: last sample serial and the devices used by a scan
use crate::error::MalformedResponse;
use crate::infrastructure::xml::{parse_number, Element};

/// `<serial>n</serial>`; -1 while nothing has been logged.
pub fn parse_last_serial(xml: &str) -> Result<i64, MalformedResponse> {
    let root = Element::parse(xml)?.expect_root("last serial", "serial")?;
    parse_number("serial", &root.text)
}

/// `<devices><device>name</device>...</devices>`, in document order.
pub fn parse_devices(xml: &str) -> Result<Vec<String>, MalformedResponse> {
    let root = Element::parse(xml)?.expect_root("device list", "devices")?;
    Ok(root
        .children_named("device")
        .map(|device| device.optional_text("name").unwrap_or(&device.text).trim().to_string())
        .collect())
}
