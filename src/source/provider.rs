use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::config::Config;
use crate::status::{Component, Snapshot, StatusColor, aggregate_color, aggregate_label, normalize_status};

use super::cloudfile::{CloudVendor, load_cloud_status};
use super::statuspage::{fetch_components, fetch_datadog_region};

const GITHUB_COMPONENTS_URL: &str = "https://www.githubstatus.com/api/v2/components.json";
const JIRA_COMPONENTS_URL: &str =
    "https://jira-software.status.atlassian.com/api/v2/components.json";
const JSM_COMPONENTS_URL: &str =
    "https://jira-service-management.status.atlassian.com/api/v2/components.json";
const PRISMA_COMPONENTS_URL: &str = "https://www.prisma-status.com/api/v2/components.json";
const GRAFANA_COMPONENTS_URL: &str = "https://status.grafana.com/api/v2/components.json";
const OKTA_COMPONENTS_URL: &str = "https://status.okta.com/api/v2/components.json";
const CLEVERBRIDGE_COMPONENTS_URL: &str =
    "https://status.cleverbridge.com/api/v2/components.json";

/// GitHub publishes far more components than the dashboard shows; only these
/// feed the aggregated status.
const GITHUB_COMPONENTS_TO_SHOW: [&str; 11] = [
    "Git Operations",
    "Webhooks",
    "API Requests",
    "Issues",
    "Pull Requests",
    "Actions",
    "Packages",
    "Pages",
    "Codespaces",
    "Copilot",
    "GitHub Mobile",
];

const DATADOG_REGIONS: [(&str, &str); 7] = [
    ("EU", "https://status.datadoghq.eu"),
    ("US1", "https://status.datadoghq.com"),
    ("US3", "https://status.us3.datadoghq.com"),
    ("US5", "https://status.us5.datadoghq.com"),
    ("AP1", "https://status.ap1.datadoghq.com"),
    ("AP2", "https://status.ap2.datadoghq.com"),
    ("GovCloud", "https://status.ddog-gov.com"),
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("unexpected payload in {path}: {message}")]
    Payload { path: String, message: String },
}

/// Produces one complete snapshot per polling cycle. Failures never surface
/// at this level: a source that cannot be read degrades only its own entry.
pub trait SnapshotSource {
    async fn fetch_snapshot(&mut self) -> Snapshot;
}

pub struct HttpSnapshotSource {
    client: reqwest::Client,
    attempts: u32,
    azure_status_path: PathBuf,
    aws_status_path: PathBuf,
}

type ServiceEntry = (&'static str, String, StatusColor, Vec<Component>);

impl HttpSnapshotSource {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            attempts: config.fetch.attempts,
            azure_status_path: PathBuf::from(&config.sources.azure_status_path),
            aws_status_path: PathBuf::from(&config.sources.aws_status_path),
        }
    }

    async fn statuspage_service(
        &self,
        service: &'static str,
        url: &'static str,
        name_filter: Option<&[&str]>,
    ) -> ServiceEntry {
        match fetch_components(&self.client, self.attempts, service, url, name_filter).await {
            Ok(components) => summarize_components(service, components),
            Err(error) => {
                log::error!("source_degraded service={} error={}", service, error);
                degraded_entry(service)
            }
        }
    }

    /// One component entry per Datadog region; a region that cannot be read
    /// shows up as an error component rather than failing the service.
    async fn datadog_service(&self) -> ServiceEntry {
        let mut components = Vec::with_capacity(DATADOG_REGIONS.len());
        for (region, base_url) in DATADOG_REGIONS {
            match fetch_datadog_region(&self.client, self.attempts, region, base_url).await {
                Ok(component) => components.push(component),
                Err(error) => {
                    log::error!("source_degraded service=datadog region={} error={}", region, error);
                    components.push(Component::new(region, "error"));
                }
            }
        }
        summarize_components("datadog", components)
    }

    fn cloud_service(&self, service: &'static str, vendor: CloudVendor) -> ServiceEntry {
        let path = match vendor {
            CloudVendor::Azure => &self.azure_status_path,
            CloudVendor::Aws => &self.aws_status_path,
        };

        match load_cloud_status(path, vendor) {
            Ok((label, color, components)) => (service, label, color, components),
            Err(error) => {
                log::error!("source_degraded service={} error={}", service, error);
                degraded_entry(service)
            }
        }
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&mut self) -> Snapshot {
        let mut snapshot = Snapshot::at(Utc::now());

        let (github, jira, jsm, prisma, grafana, okta, cleverbridge, datadog) = tokio::join!(
            self.statuspage_service(
                "github",
                GITHUB_COMPONENTS_URL,
                Some(GITHUB_COMPONENTS_TO_SHOW.as_slice())
            ),
            self.statuspage_service("jira", JIRA_COMPONENTS_URL, None),
            self.statuspage_service("jsm", JSM_COMPONENTS_URL, None),
            self.statuspage_service("prisma", PRISMA_COMPONENTS_URL, None),
            self.statuspage_service("grafana", GRAFANA_COMPONENTS_URL, None),
            self.statuspage_service("okta", OKTA_COMPONENTS_URL, None),
            self.statuspage_service("cleverbridge", CLEVERBRIDGE_COMPONENTS_URL, None),
            self.datadog_service(),
        );

        let azure = self.cloud_service("azure", CloudVendor::Azure);
        let aws = self.cloud_service("aws", CloudVendor::Aws);

        for (service, label, color, components) in
            [github, jira, jsm, prisma, grafana, okta, cleverbridge, datadog, azure, aws]
        {
            log::info!(
                "source_collected service={} status={} components={}",
                service,
                label,
                components.len()
            );
            snapshot.record_service(service, label, color, components);
        }

        snapshot
    }
}

fn summarize_components(service: &'static str, components: Vec<Component>) -> ServiceEntry {
    let non_operational = components
        .iter()
        .filter(|component| !normalize_status(&component.status).is_operational())
        .count();

    (
        service,
        aggregate_label(non_operational).to_string(),
        aggregate_color(non_operational),
        components,
    )
}

fn degraded_entry(service: &'static str) -> ServiceEntry {
    (
        service,
        "ERROR".to_string(),
        StatusColor::Red,
        vec![Component::new(
            format!("{} API", service.to_uppercase()),
            "error",
        )],
    )
}

#[cfg(test)]
pub struct MockSnapshotSource {
    sequence: Vec<Snapshot>,
}

#[cfg(test)]
impl MockSnapshotSource {
    pub fn new(sequence: Vec<Snapshot>) -> Self {
        Self { sequence }
    }
}

#[cfg(test)]
impl SnapshotSource for MockSnapshotSource {
    async fn fetch_snapshot(&mut self) -> Snapshot {
        if self.sequence.is_empty() {
            return Snapshot::at(Utc::now());
        }

        self.sequence.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::status::{Component, StatusColor};

    use super::super::cloudfile::{CloudVendor, load_cloud_status};
    use super::{degraded_entry, summarize_components};

    #[test]
    fn summarize_counts_non_operational_components() {
        let (_, label, color, _) = summarize_components(
            "github",
            vec![
                Component::new("API Requests", "operational"),
                Component::new("Webhooks", "degraded_performance"),
            ],
        );
        assert_eq!(label, "MINOR ISSUE");
        assert_eq!(color, StatusColor::Orange);
    }

    #[test]
    fn missing_cloud_file_degrades_to_error_entry() {
        let result = load_cloud_status(Path::new("does/not/exist.json"), CloudVendor::Aws);
        assert!(result.is_err());

        let (service, label, color, components) = degraded_entry("aws");
        assert_eq!(service, "aws");
        assert_eq!(label, "ERROR");
        assert_eq!(color, StatusColor::Red);
        assert_eq!(components[0].name, "AWS API");
    }

    #[test]
    fn cloud_file_parses_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("aws_services_live.json");
        std::fs::write(
            &path,
            r#"{"North America": {"us-east-1": {"Compute": {"EC2": "Available"}}}}"#,
        )
        .expect("write fixture");

        let (label, color, components) =
            load_cloud_status(&path, CloudVendor::Aws).expect("load");
        assert_eq!(label, "OPERATIONAL");
        assert_eq!(color, StatusColor::Green);
        assert!(components.is_empty());
    }
}
