use std::path::Path;

use serde_json::Value;

use crate::status::{Component, StatusColor, aggregate_color, aggregate_label};

use super::provider::FetchError;

const MAX_TREE_COMPONENTS: usize = 20;

/// Cloud trees come from the page scrapers as geography -> region -> group ->
/// service maps. The two vendors only differ in how a leaf encodes trouble.
#[derive(Debug, Clone, Copy)]
pub(super) enum CloudVendor {
    Aws,
    Azure,
}

impl CloudVendor {
    fn leaf_color(&self, status: &Value) -> StatusColor {
        match self {
            CloudVendor::Aws => match status.as_str() {
                Some(text) if text.eq_ignore_ascii_case("available") => StatusColor::Green,
                _ => StatusColor::Red,
            },
            CloudVendor::Azure => match status {
                Value::String(text) if text.eq_ignore_ascii_case("available") => StatusColor::Green,
                Value::String(text) if text.eq_ignore_ascii_case("n/a") => StatusColor::Orange,
                // An object leaf carries incident details, which means trouble.
                _ => StatusColor::Red,
            },
        }
    }
}

fn leaf_status_text(status: &Value) -> String {
    match status {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        _ => "Unknown".to_string(),
    }
}

pub(super) fn load_cloud_status(
    path: &Path,
    vendor: CloudVendor,
) -> Result<(String, StatusColor, Vec<Component>), FetchError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FetchError::File {
        path: path.display().to_string(),
        source,
    })?;
    let tree: Value = serde_json::from_str(&raw).map_err(|error| FetchError::Payload {
        path: path.display().to_string(),
        message: error.to_string(),
    })?;

    Ok(summarize_cloud_tree(&tree, vendor))
}

/// Roll the tree up the way the dashboard does: red services make a region
/// red, red regions make a geography red, red geographies decide the
/// service-level color and label. Non-green leaves become component entries.
pub(super) fn summarize_cloud_tree(
    tree: &Value,
    vendor: CloudVendor,
) -> (String, StatusColor, Vec<Component>) {
    let mut red_geographies = 0;
    let mut components = Vec::new();

    let Some(geographies) = tree.as_object() else {
        return (aggregate_label(0).to_string(), aggregate_color(0), components);
    };

    for (geography, regions) in geographies {
        if geography == "Current Impact" {
            continue;
        }
        let Some(regions) = regions.as_object() else {
            continue;
        };

        let mut red_regions = 0;
        for (region, groups) in regions {
            let Some(groups) = groups.as_object() else {
                continue;
            };

            let mut red_issues = 0;
            for (group, services) in groups {
                if group == "_region_stats" {
                    continue;
                }
                let Some(services) = services.as_object() else {
                    continue;
                };

                for (service_name, status) in services {
                    let color = vendor.leaf_color(status);
                    if color == StatusColor::Red {
                        red_issues += 1;
                    }
                    if color != StatusColor::Green && components.len() < MAX_TREE_COMPONENTS {
                        components.push(Component::new(
                            format!("{} / {}", region, service_name),
                            leaf_status_text(status),
                        ));
                    }
                }
            }

            if aggregate_color(red_issues) == StatusColor::Red {
                red_regions += 1;
            }
        }

        if aggregate_color(red_regions) == StatusColor::Red {
            red_geographies += 1;
        }
    }

    (
        aggregate_label(red_geographies).to_string(),
        aggregate_color(red_geographies),
        components,
    )
}
