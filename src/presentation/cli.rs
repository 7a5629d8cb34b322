// Command line front end mapping subcommands onto the scan client
use crate::application::scan_client::ScanClient;
use crate::domain::patch::Patch;
use crate::domain::scan_data::ScanData;
use crate::domain::scan_id::ScanId;
use crate::domain::scan_info::ScanInfo;
use crate::domain::sequence::ScanSource;
use crate::infrastructure::config::ClientConfig;
use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "scan-client", version, about = "Submit and monitor scans on a scan server")]
pub struct Cli {
    /// TOML configuration file (default: config/scan_client.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Print status, data and listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Submit a scan file (`<commands>` XML)
    Submit {
        file: PathBuf,
        #[arg(long, default_value = "UnNamed")]
        name: String,
    },
    /// Simulate a scan file without running it
    Simulate { file: PathBuf },
    /// Show the status of a scan
    Status { id: ScanId },
    /// Show the logged data of a scan
    Data { id: ScanId },
    /// Show the commands of a submitted scan
    Commands { id: ScanId },
    /// List devices used by a scan
    Devices { id: ScanId },
    /// Show the serial of the last logged sample
    Serial { id: ScanId },
    /// List all scans
    List,
    /// Show scan server information
    ServerInfo,
    Pause { id: ScanId },
    Resume { id: ScanId },
    Abort { id: ScanId },
    Delete { id: ScanId },
    /// Remove all completed scans
    Clear,
    /// Change one property of a submitted command
    Patch {
        id: ScanId,
        #[arg(long)]
        address: u64,
        #[arg(long)]
        property: String,
        #[arg(long)]
        value: String,
    },
    /// Follow a scan until it is finished, aborted or failed
    Wait {
        id: ScanId,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let client = ScanClient::connect(&config)
        .await
        .with_context(|| format!("Failed to create client to {}", config.server.base_url()))?;
    let json = cli.json;

    match cli.command {
        CliCommand::Submit { file, name } => {
            let id = client.submit(&name, read_scan_file(&file).await?).await?;
            println!("{id}");
        }
        CliCommand::Simulate { file } => {
            println!("{}", client.simulate(read_scan_file(&file).await?).await?);
        }
        CliCommand::Status { id } => {
            let info = client.scan_info(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_info(&info);
            }
        }
        CliCommand::Data { id } => {
            let data = client.scan_data(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_data(&data);
            }
        }
        CliCommand::Commands { id } => {
            println!("{}", client.scan_commands(id).await?.describe());
        }
        CliCommand::Devices { id } => {
            for device in client.scan_devices(id).await? {
                println!("{device}");
            }
        }
        CliCommand::Serial { id } => {
            println!("{}", client.last_serial(id).await?);
        }
        CliCommand::List => {
            let scans = client.scans().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scans)?);
            } else {
                for info in &scans {
                    println!("{info}");
                }
            }
        }
        CliCommand::ServerInfo => {
            println!("{}", client.server_info().await?);
        }
        CliCommand::Pause { id } => client.pause(id).await?,
        CliCommand::Resume { id } => client.resume(id).await?,
        CliCommand::Abort { id } => client.abort(id).await?,
        CliCommand::Delete { id } => client.delete(id).await?,
        CliCommand::Clear => client.clear_completed().await?,
        CliCommand::Patch {
            id,
            address,
            property,
            value,
        } => {
            client.patch(id, &Patch::new(address, property, value)?).await?;
        }
        CliCommand::Wait { id, interval_ms } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.polling.interval());
            let mut updates = Box::pin(client.watch(id, interval));
            while let Some(info) = updates.try_next().await? {
                print_info(&info);
            }
        }
    }

    Ok(())
}

async fn read_scan_file(path: &Path) -> anyhow::Result<ScanSource> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read scan file {}", path.display()))?;
    Ok(ScanSource::Xml(xml))
}

fn print_info(info: &ScanInfo) {
    let progress = info
        .progress()
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} {:<20} {:<9} {:>6} address={} {}",
        info.id, info.name, info.state, progress, info.address, info.command
    );
}

fn print_data(data: &ScanData) {
    for series in data {
        println!("# {} ({} samples)", series.name, series.len());
        for (time, value) in series.times.iter().zip(&series.values) {
            println!("{time}\t{value}");
        }
    }
}
