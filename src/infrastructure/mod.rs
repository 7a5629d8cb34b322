// Infrastructure layer - XML plumbing, configuration and the HTTP transport
pub mod config;
pub mod http_scan_server;
pub mod xml;
