//! Provider boundary: the instance lister and region catalog the builder
//! consumes. Production implementation lives in `aws`; tests supply fakes.

pub mod aws;

pub use aws::AwsCli;

use crate::Result;
use std::collections::BTreeMap;

/// One compute instance as reported by the provider.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    pub state: String,
    pub tags: BTreeMap<String, String>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub vpc_id: Option<String>,
}

impl Instance {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Address Ansible should reach the instance at: the private address for
    /// VPC instances, the public address otherwise.
    pub fn address(&self) -> Option<&str> {
        if self.vpc_id.is_some() {
            self.private_ip.as_deref()
        } else {
            self.public_ip.as_deref()
        }
    }
}

/// Lists every instance in one region.
pub trait InstanceLister {
    fn list_instances(&self, region: &str) -> Result<Vec<Instance>>;
}

/// Enumerates every region name the provider knows.
pub trait RegionCatalog {
    fn region_names(&self) -> Result<Vec<String>>;
}
