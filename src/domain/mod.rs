// Domain layer - Scan commands and the documents exchanged with the scan server
pub mod command;
pub mod documents;
pub mod patch;
pub mod scan_data;
pub mod scan_id;
pub mod scan_info;
pub mod sequence;
