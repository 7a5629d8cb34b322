// HTTP implementation of the scan server endpoints
use crate::application::scan_server::{ScanAction, ScanResource, ScanServer};
use crate::domain::scan_id::ScanId;
use crate::error::{Result, ScanError};
use crate::infrastructure::config::ServerSettings;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

const SERVER_RESOURCE: &str = "/server";
const SERVER_INFO_RESOURCE: &str = "/info";
const SIMULATE_RESOURCE: &str = "/simulate";
const SCANS_RESOURCE: &str = "/scans";
const SCANS_COMPLETED_RESOURCE: &str = "/completed";
const SCAN_RESOURCE: &str = "/scan";
const XML_CONTENT_TYPE: &str = "text/xml";

#[derive(Debug, Clone)]
pub struct HttpScanServer {
    base_url: String,
    client: Client,
}

impl HttpScanServer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ScanError::invalid("scan server URL must not be empty"));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &ServerSettings) -> Result<Self> {
        Self::new(settings.base_url(), settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scan_url(&self, id: ScanId, segment: Option<&str>) -> String {
        match segment {
            Some(segment) => format!("{}{}/{}/{}", self.base_url, SCAN_RESOURCE, id, segment),
            None => format!("{}{}/{}", self.base_url, SCAN_RESOURCE, id),
        }
    }

    fn with_xml(request: RequestBuilder, xml: &str) -> RequestBuilder {
        request
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(xml.to_string())
    }

    /// Send the request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<String> {
        tracing::debug!("Scan server request: {}", url);

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Scan server returned {} for {}", status, url);
            return Err(ScanError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ScanServer for HttpScanServer {
    async fn submit(&self, name: &str, xml: &str) -> Result<String> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            SCAN_RESOURCE,
            urlencoding::encode(name)
        );
        let request = Self::with_xml(self.client.post(&url), xml);
        self.execute(request, &url).await
    }

    async fn simulate(&self, xml: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, SIMULATE_RESOURCE);
        let request = Self::with_xml(self.client.post(&url), xml);
        self.execute(request, &url).await
    }

    async fn delete(&self, id: ScanId) -> Result<()> {
        let url = self.scan_url(id, None);
        self.execute(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn clear_completed(&self) -> Result<()> {
        let url = format!(
            "{}{}{}",
            self.base_url, SCANS_RESOURCE, SCANS_COMPLETED_RESOURCE
        );
        self.execute(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn fetch(&self, id: ScanId, resource: ScanResource) -> Result<String> {
        let url = self.scan_url(id, resource.path_segment());
        self.execute(self.client.get(&url), &url).await
    }

    async fn list_scans(&self) -> Result<String> {
        let url = format!("{}{}", self.base_url, SCANS_RESOURCE);
        self.execute(self.client.get(&url), &url).await
    }

    async fn server_info(&self) -> Result<String> {
        let url = format!(
            "{}{}{}",
            self.base_url, SERVER_RESOURCE, SERVER_INFO_RESOURCE
        );
        self.execute(self.client.get(&url), &url).await
    }

    async fn control(&self, id: ScanId, action: ScanAction) -> Result<()> {
        let url = self.scan_url(id, Some(action.as_str()));
        self.execute(self.client.put(&url), &url).await?;
        Ok(())
    }

    async fn patch(&self, id: ScanId, xml: &str) -> Result<()> {
        let url = self.scan_url(id, Some("patch"));
        let request = Self::with_xml(self.client.put(&url), xml);
        self.execute(request, &url).await?;
        Ok(())
    }
}
