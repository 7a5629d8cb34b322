// Patch document that changes one property of an already submitted command
use crate::error::{Result, ScanError};
use crate::infrastructure::xml::XmlBuilder;

#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    address: u64,
    property: String,
    value: String,
}

impl Patch {
    pub fn new(address: u64, property: impl Into<String>, value: impl ToString) -> Result<Self> {
        let property = property.into();
        if property.trim().is_empty() {
            return Err(ScanError::invalid("patch property must not be empty"));
        }
        Ok(Self {
            address,
            property,
            value: value.to_string(),
        })
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn render(&self) -> String {
        let mut xml = XmlBuilder::new();
        xml.open("patch")
            .value("address", self.address)
            .text("property", &self.property)
            .text("value", &self.value)
            .close("patch");
        xml.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_patch() {
        let patch = Patch::new(10, "seconds", 3.5).unwrap();
        assert_eq!(
            patch.render(),
            "<patch><address>10</address><property>seconds</property><value>3.5</value></patch>"
        );
    }

    #[test]
    fn test_patch_requires_property() {
        assert!(Patch::new(0, "  ", "x").is_err());
    }
}
