// Application layer - Scan server seam and the client service
pub mod scan_client;
pub mod scan_server;
