//! AWS-backed lister driving the `aws` CLI.
//!
//! `aws ec2 describe-instances` and `describe-regions` with `--output json`
//! expose the same records the EC2 API does; only the fields the grouping
//! engine consumes are deserialized.

use super::{Instance, InstanceLister, RegionCatalog};
use crate::Result;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

pub struct AwsCli {
    filters: String,
}

impl AwsCli {
    /// `filters` is passed to `describe-instances --filters` verbatim when
    /// non-empty.
    pub fn new(filters: String) -> Self {
        Self { filters }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRegions {
    #[serde(default)]
    regions: Vec<RegionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionEntry {
    region_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstances {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<RawInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawInstance {
    state: RawState,
    #[serde(default)]
    tags: Vec<RawTag>,
    #[serde(default)]
    public_ip_address: Option<String>,
    #[serde(default)]
    private_ip_address: Option<String>,
    #[serde(default)]
    vpc_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawState {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTag {
    key: String,
    value: String,
}

impl From<RawInstance> for Instance {
    fn from(raw: RawInstance) -> Self {
        Instance {
            state: raw.state.name,
            tags: raw.tags.into_iter().map(|t| (t.key, t.value)).collect(),
            public_ip: raw.public_ip_address,
            private_ip: raw.private_ip_address,
            vpc_id: raw.vpc_id,
        }
    }
}

fn into_instances(response: DescribeInstances) -> Vec<Instance> {
    response
        .reservations
        .into_iter()
        .flat_map(|reservation| reservation.instances)
        .map(Instance::from)
        .collect()
}

impl RegionCatalog for AwsCli {
    fn region_names(&self) -> Result<Vec<String>> {
        let out = run_aws(&["ec2", "describe-regions", "--output", "json"])?;
        let response: DescribeRegions =
            serde_json::from_str(&out).context("parse describe-regions response")?;
        Ok(response
            .regions
            .into_iter()
            .map(|region| region.region_name)
            .collect())
    }
}

impl InstanceLister for AwsCli {
    fn list_instances(&self, region: &str) -> Result<Vec<Instance>> {
        let mut args = vec!["ec2", "describe-instances", "--region", region, "--output", "json"];
        if !self.filters.is_empty() {
            args.push("--filters");
            args.push(&self.filters);
        }

        let out = run_aws(&args)?;
        let response: DescribeInstances = serde_json::from_str(&out)
            .with_context(|| format!("parse describe-instances response for {}", region))?;

        let instances = into_instances(response);
        debug!(region, count = instances.len(), "listed instances");
        Ok(instances)
    }
}

fn run_aws(args: &[&str]) -> Result<String> {
    debug!(?args, "invoking aws CLI");
    let output = Command::new("aws")
        .args(args)
        .output()
        .context("spawn aws CLI")?;

    if !output.status.success() {
        bail!(
            "aws {:?} failed with {}: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    String::from_utf8(output.stdout).context("aws CLI output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_describe_instances_response() {
        let body = r#"{
            "Reservations": [
                {
                    "Instances": [
                        {
                            "State": {"Code": 16, "Name": "running"},
                            "Tags": [{"Key": "Role", "Value": "web_apache"}],
                            "PublicIpAddress": "54.0.0.1",
                            "PrivateIpAddress": "10.0.0.1",
                            "VpcId": "vpc-1234"
                        },
                        {
                            "State": {"Code": 80, "Name": "stopped"}
                        }
                    ]
                }
            ]
        }"#;

        let response: DescribeInstances = serde_json::from_str(body).unwrap();
        let instances = into_instances(response);

        assert_eq!(instances.len(), 2);
        assert!(instances[0].is_running());
        assert_eq!(instances[0].tag("Role"), Some("web_apache"));
        assert_eq!(instances[0].address(), Some("10.0.0.1"));
        assert!(!instances[1].is_running());
        assert_eq!(instances[1].address(), None);
    }

    #[test]
    fn parses_describe_regions_response() {
        let body = r#"{
            "Regions": [
                {"Endpoint": "ec2.us-east-1.amazonaws.com", "RegionName": "us-east-1"},
                {"Endpoint": "ec2.eu-west-1.amazonaws.com", "RegionName": "eu-west-1"}
            ]
        }"#;

        let response: DescribeRegions = serde_json::from_str(body).unwrap();
        let names: Vec<String> = response
            .regions
            .into_iter()
            .map(|region| region.region_name)
            .collect();
        assert_eq!(names, vec!["us-east-1", "eu-west-1"]);
    }
}
