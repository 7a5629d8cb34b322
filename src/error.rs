// Error types shared by the command model, the response parsers and the transport
use thiserror::Error;

pub type Result<T, E = ScanError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScanError {
    /// A command field or call argument is outside its domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error("scan server request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scan server returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ScanError::InvalidArgument(message.into())
    }
}

/// A server document that could not be turned into its typed form.
///
/// `Xml`, `EmptyDocument` and `ContentOutsideRoot` mean the body was not
/// usable XML at all. The remaining variants mean the XML was fine but did
/// not match the schema the caller asked for.
#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("response is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("response contains no root element")]
    EmptyDocument,

    #[error("response has content outside its root element: '{0}'")]
    ContentOutsideRoot(String),

    #[error("{document}: expecting root tag '{expected}' not '{actual}'")]
    UnexpectedRoot {
        document: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("{document}: missing required element '{field}'")]
    MissingField {
        document: &'static str,
        field: &'static str,
    },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("'{field}': cannot convert '{value}': {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("'{field}': '{value}' is not a representable timestamp")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("unknown command element <{0}>")]
    UnknownCommand(String),

    #[error("<{tag}> holds an invalid command: {reason}")]
    InvalidCommand { tag: &'static str, reason: String },
}

impl MalformedResponse {
    /// True when the document was well-formed XML but lacked what the parser needs.
    pub fn is_schema_mismatch(&self) -> bool {
        !matches!(
            self,
            MalformedResponse::Xml(_)
                | MalformedResponse::EmptyDocument
                | MalformedResponse::ContentOutsideRoot(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_mismatch_message() {
        let err = MalformedResponse::UnexpectedRoot {
            document: "ScanInfo",
            expected: "scan",
            actual: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "ScanInfo: expecting root tag 'scan' not 'foo'");
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_malformed_converts_into_scan_error() {
        let err: ScanError = MalformedResponse::EmptyDocument.into();
        assert!(matches!(err, ScanError::Malformed(MalformedResponse::EmptyDocument)));
    }
}
