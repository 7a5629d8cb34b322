// Scan client - Typed operations on top of a scan server transport
use crate::application::scan_server::{ScanAction, ScanResource, ScanServer};
use crate::domain::documents::{parse_devices, parse_last_serial};
use crate::domain::patch::Patch;
use crate::domain::scan_data::ScanData;
use crate::domain::scan_id::ScanId;
use crate::domain::scan_info::ScanInfo;
use crate::domain::sequence::{CommandSequence, ScanSource};
use crate::error::{Result, ScanError};
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::http_scan_server::HttpScanServer;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ScanClient {
    server: Arc<dyn ScanServer>,
}

impl ScanClient {
    pub fn new(server: Arc<dyn ScanServer>) -> Self {
        Self { server }
    }

    /// Build the HTTP transport from `config` and check that the server answers.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let server = HttpScanServer::from_settings(&config.server)?;
        server.list_scans().await?;
        tracing::info!("Connected to scan server at {}", server.base_url());
        Ok(Self::new(Arc::new(server)))
    }

    pub async fn submit(&self, name: &str, source: impl Into<ScanSource>) -> Result<ScanId> {
        if name.trim().is_empty() {
            return Err(ScanError::invalid("scan name must not be empty"));
        }
        let xml = non_empty_xml(source.into())?;
        let response = self.server.submit(name, &xml).await?;
        let id = ScanId::parse_response(&response)?;
        tracing::info!("Submitted scan '{}' as {}", name, id);
        Ok(id)
    }

    /// Returns the server's simulation report as XML.
    pub async fn simulate(&self, source: impl Into<ScanSource>) -> Result<String> {
        let xml = non_empty_xml(source.into())?;
        self.server.simulate(&xml).await
    }

    pub async fn delete(&self, id: ScanId) -> Result<()> {
        self.server.delete(id).await?;
        tracing::info!("Scan {} deleted", id);
        Ok(())
    }

    pub async fn clear_completed(&self) -> Result<()> {
        self.server.clear_completed().await?;
        tracing::info!("Completed scans removed");
        Ok(())
    }

    pub async fn pause(&self, id: ScanId) -> Result<()> {
        self.control(id, ScanAction::Pause).await
    }

    pub async fn resume(&self, id: ScanId) -> Result<()> {
        self.control(id, ScanAction::Resume).await
    }

    pub async fn abort(&self, id: ScanId) -> Result<()> {
        self.control(id, ScanAction::Abort).await
    }

    async fn control(&self, id: ScanId, action: ScanAction) -> Result<()> {
        self.server.control(id, action).await?;
        tracing::info!("Scan {}: {}", id, action);
        Ok(())
    }

    /// Change one property of the command at `patch.address()`.
    pub async fn patch(&self, id: ScanId, patch: &Patch) -> Result<()> {
        self.server.patch(id, &patch.render()).await
    }

    pub async fn scan_info(&self, id: ScanId) -> Result<ScanInfo> {
        let xml = self.server.fetch(id, ScanResource::Info).await?;
        Ok(ScanInfo::parse(&xml)?)
    }

    pub async fn scan_data(&self, id: ScanId) -> Result<ScanData> {
        let xml = self.server.fetch(id, ScanResource::Data).await?;
        Ok(ScanData::parse(&xml)?)
    }

    pub async fn scan_commands(&self, id: ScanId) -> Result<CommandSequence> {
        let xml = self.server.fetch(id, ScanResource::Commands).await?;
        Ok(CommandSequence::parse(&xml)?)
    }

    pub async fn last_serial(&self, id: ScanId) -> Result<i64> {
        let xml = self.server.fetch(id, ScanResource::LastSerial).await?;
        Ok(parse_last_serial(&xml)?)
    }

    pub async fn scan_devices(&self, id: ScanId) -> Result<Vec<String>> {
        let xml = self.server.fetch(id, ScanResource::Devices).await?;
        Ok(parse_devices(&xml)?)
    }

    pub async fn scans(&self) -> Result<Vec<ScanInfo>> {
        let xml = self.server.list_scans().await?;
        Ok(ScanInfo::parse_list(&xml)?)
    }

    pub async fn server_info(&self) -> Result<String> {
        self.server.server_info().await
    }

    /// Poll the scan every `interval`, yielding each snapshot. Ends after the
    /// first finished, aborted or failed snapshot, or on the first error.
    pub fn watch(
        &self,
        id: ScanId,
        interval: Duration,
    ) -> impl Stream<Item = Result<ScanInfo>> + Send + use<> {
        let client = self.clone();
        async_stream::try_stream! {
            loop {
                let info = client.scan_info(id).await?;
                let done = info.is_done();
                yield info;
                if done {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        }
    }

    pub async fn wait_until_done(&self, id: ScanId, interval: Duration) -> Result<ScanInfo> {
        loop {
            let info = self.scan_info(id).await?;
            if info.is_done() {
                return Ok(info);
            }
            tracing::debug!("Scan {} is {}, progress {:?}", id, info.state, info.progress());
            tokio::time::sleep(interval).await;
        }
    }
}

fn non_empty_xml(source: ScanSource) -> Result<String> {
    let xml = source.to_xml();
    if xml.trim().is_empty() {
        return Err(ScanError::invalid("scan XML must not be empty"));
    }
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::{Comment, Delay};
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockScanServer {
        requests: Mutex<Vec<String>>,
        infos: Mutex<VecDeque<String>>,
        data: String,
    }

    impl MockScanServer {
        fn record(&self, request: String) {
            self.requests.lock().unwrap().push(request);
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScanServer for MockScanServer {
        async fn submit(&self, name: &str, xml: &str) -> Result<String> {
            self.record(format!("submit {name} {xml}"));
            Ok("<id>153</id>".to_string())
        }

        async fn simulate(&self, xml: &str) -> Result<String> {
            self.record(format!("simulate {xml}"));
            Ok("<simulation/>".to_string())
        }

        async fn delete(&self, id: ScanId) -> Result<()> {
            self.record(format!("delete {id}"));
            Ok(())
        }

        async fn clear_completed(&self) -> Result<()> {
            self.record("clear".to_string());
            Ok(())
        }

        async fn fetch(&self, id: ScanId, resource: ScanResource) -> Result<String> {
            self.record(format!("fetch {id} {resource:?}"));
            match resource {
                ScanResource::Info => self
                    .infos
                    .lock()
                    .unwrap()
                    .pop_front()
                    .ok_or_else(|| ScanError::invalid("no more scan infos")),
                ScanResource::Data => Ok(self.data.clone()),
                ScanResource::Commands => Ok("<commands><delay><seconds>1.0</seconds></delay></commands>".to_string()),
                ScanResource::LastSerial => Ok("<serial>12</serial>".to_string()),
                ScanResource::Devices => Ok("<devices><device>xpos</device></devices>".to_string()),
            }
        }

        async fn list_scans(&self) -> Result<String> {
            Ok("<scans/>".to_string())
        }

        async fn server_info(&self) -> Result<String> {
            Ok("<server/>".to_string())
        }

        async fn control(&self, id: ScanId, action: ScanAction) -> Result<()> {
            self.record(format!("{action} {id}"));
            Ok(())
        }

        async fn patch(&self, id: ScanId, xml: &str) -> Result<()> {
            self.record(format!("patch {id} {xml}"));
            Ok(())
        }
    }

    fn info_xml(state: &str, performed: u64) -> String {
        format!(
            "<scan><id>153</id><name>t</name><created>0</created><state>{state}</state>\
             <runtime>0</runtime><total_work_units>4</total_work_units>\
             <performed_work_units>{performed}</performed_work_units>\
             <address>-1</address><command/></scan>"
        )
    }

    fn client_with(server: MockScanServer) -> (ScanClient, Arc<MockScanServer>) {
        let server = Arc::new(server);
        (ScanClient::new(server.clone()), server)
    }

    #[tokio::test]
    async fn test_submit_sequence() {
        let (client, server) = client_with(MockScanServer::default());
        let sequence = CommandSequence::new().with(Comment::new("hi"));

        let id = client.submit("1stScan", sequence).await.unwrap();

        assert_eq!(id, ScanId(153));
        assert_eq!(
            server.requests(),
            vec!["submit 1stScan <commands><comment><text>hi</text></comment></commands>"]
        );
    }

    #[tokio::test]
    async fn test_submit_validates_arguments() {
        let (client, server) = client_with(MockScanServer::default());
        assert!(matches!(
            client.submit("", "<commands/>").await,
            Err(ScanError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.submit("scan", " ").await,
            Err(ScanError::InvalidArgument(_))
        ));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_typed_fetches() {
        let server = MockScanServer {
            data: "<data><device><name>xpos</name><samples/></device></data>".to_string(),
            ..Default::default()
        };
        server.infos.lock().unwrap().push_back(info_xml("Running", 2));
        let (client, _) = client_with(server);
        let id = ScanId(153);

        assert_eq!(client.scan_info(id).await.unwrap().progress(), Some(50.0));
        assert_eq!(client.scan_data(id).await.unwrap().devices(), vec!["xpos"]);
        assert_eq!(
            client.scan_commands(id).await.unwrap(),
            CommandSequence::new().with(Delay::new(1.0).unwrap())
        );
        assert_eq!(client.last_serial(id).await.unwrap(), 12);
        assert_eq!(client.scan_devices(id).await.unwrap(), vec!["xpos"]);
        assert!(client.scans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_control_and_patch() {
        let (client, server) = client_with(MockScanServer::default());
        let id = ScanId(5);

        client.pause(id).await.unwrap();
        client.resume(id).await.unwrap();
        client.abort(id).await.unwrap();
        client.patch(id, &Patch::new(1, "seconds", 2).unwrap()).await.unwrap();
        client.delete(id).await.unwrap();
        client.clear_completed().await.unwrap();

        assert_eq!(
            server.requests(),
            vec![
                "pause 5",
                "resume 5",
                "abort 5",
                "patch 5 <patch><address>1</address><property>seconds</property><value>2</value></patch>",
                "delete 5",
                "clear",
            ]
        );
    }

    #[tokio::test]
    async fn test_watch_ends_after_done_state() {
        let server = MockScanServer::default();
        {
            let mut infos = server.infos.lock().unwrap();
            infos.push_back(info_xml("Idle", 0));
            infos.push_back(info_xml("Running", 2));
            infos.push_back(info_xml("Finished", 4));
            infos.push_back(info_xml("Finished", 4));
        }
        let (client, _) = client_with(server);

        let snapshots: Vec<ScanInfo> = client
            .watch(ScanId(153), Duration::from_millis(1))
            .try_collect()
            .await
            .unwrap();

        let states: Vec<String> = snapshots.iter().map(|s| s.state.to_string()).collect();
        assert_eq!(states, vec!["Idle", "Running", "Finished"]);
    }

    #[tokio::test]
    async fn test_wait_until_done() {
        let server = MockScanServer::default();
        {
            let mut infos = server.infos.lock().unwrap();
            infos.push_back(info_xml("Running", 1));
            infos.push_back(info_xml("Aborted", 3));
        }
        let (client, _) = client_with(server);

        let info = client
            .wait_until_done(ScanId(153), Duration::from_millis(1))
            .await
            .unwrap();
        assert!(info.is_aborted());
        assert_eq!(info.completed_work, 3);
    }

    #[tokio::test]
    async fn test_malformed_response_surfaces() {
        let server = MockScanServer::default();
        server.infos.lock().unwrap().push_back("<foo/>".to_string());
        let (client, _) = client_with(server);

        let err = client.scan_info(ScanId(1)).await.unwrap_err();
        assert!(matches!(err, ScanError::Malformed(_)));
    }
}
