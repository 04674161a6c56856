use serde::Deserialize;
use tokio::time::{Duration, sleep};

use crate::status::Component;

use super::provider::FetchError;

/// statuspage.io v2 `components.json` shape, reduced to what the snapshot
/// model needs.
#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    #[serde(default)]
    components: Vec<ApiComponent>,
}

#[derive(Debug, Deserialize)]
struct ApiComponent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct DatadogStatusResponse {
    #[serde(default)]
    status: DatadogIndicator,
}

#[derive(Debug, Default, Deserialize)]
struct DatadogIndicator {
    #[serde(default)]
    indicator: String,
}

/// Bounded retry with exponential backoff. An explicit loop with an attempt
/// counter, so cancellation and stack behavior stay predictable.
async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    attempts: u32,
    service: &str,
    url: &str,
) -> Result<T, FetchError> {
    let mut attempt = 0;
    loop {
        let result = async {
            let response = client.get(url).send().await?.error_for_status()?;
            Ok::<T, reqwest::Error>(response.json::<T>().await?)
        }
        .await;

        match result {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if attempt >= attempts.max(1) {
                    log::error!(
                        "fetch_failed service={} url={} attempts={} error={}",
                        service,
                        url,
                        attempt,
                        error
                    );
                    return Err(FetchError::Http(error));
                }
                let wait_secs = 1u64 << (attempt - 1).min(6);
                log::warn!(
                    "fetch_retry service={} attempt={} wait_secs={} error={}",
                    service,
                    attempt,
                    wait_secs,
                    error
                );
                sleep(Duration::from_secs(wait_secs)).await;
            }
        }
    }
}

pub(super) async fn fetch_components(
    client: &reqwest::Client,
    attempts: u32,
    service: &str,
    url: &str,
    name_filter: Option<&[&str]>,
) -> Result<Vec<Component>, FetchError> {
    let response: ComponentsResponse = get_json(client, attempts, service, url).await?;

    let components = response
        .components
        .into_iter()
        .filter(|component| match name_filter {
            Some(names) => names.contains(&component.name.as_str()),
            None => true,
        })
        .map(|component| Component::new(component.name, component.status))
        .collect();

    Ok(components)
}

/// Datadog does not expose per-component statuses at the top level; each
/// region's `status.json` indicator becomes one component entry.
pub(super) async fn fetch_datadog_region(
    client: &reqwest::Client,
    attempts: u32,
    region: &str,
    base_url: &str,
) -> Result<Component, FetchError> {
    let url = format!("{}/api/v2/status.json", base_url);
    let response: DatadogStatusResponse =
        get_json(client, attempts, "datadog", &url).await?;

    let status = match response.status.indicator.as_str() {
        "none" => "operational".to_string(),
        "minor" => "minor issue".to_string(),
        "major" | "critical" => "major outage".to_string(),
        other => other.to_string(),
    };

    Ok(Component::new(region, status))
}

#[cfg(test)]
mod tests {
    use super::ComponentsResponse;

    #[test]
    fn components_response_tolerates_extra_fields() {
        let raw = r#"{
            "page": {"id": "abc"},
            "components": [
                {"id": "1", "name": "API Requests", "status": "operational", "position": 2},
                {"id": "2", "name": "Webhooks", "status": "degraded_performance"}
            ]
        }"#;
        let parsed: ComponentsResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.components.len(), 2);
        assert_eq!(parsed.components[1].status, "degraded_performance");
    }

    #[test]
    fn empty_body_yields_no_components() {
        let parsed: ComponentsResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.components.is_empty());
    }
}
