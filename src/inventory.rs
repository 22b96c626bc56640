//! Inventory builder: per-region enumeration and group assembly.
//!
//! Groups form three layers: `all` -> region keys -> regional role groups,
//! with bare roles and their underscore prefixes fanning out to every
//! regional instantiation. Only regional role groups hold hosts.

use crate::Result;
use crate::cache;
use crate::config::Config;
use crate::group::GroupStore;
use crate::provider::{Instance, InstanceLister, RegionCatalog};
use crate::region;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub struct InventoryBuilder<'a> {
    config: Config,
    /// Region key -> canonical region name, fixed at construction.
    regions: BTreeMap<String, String>,
    lister: &'a dyn InstanceLister,
}

impl<'a> InventoryBuilder<'a> {
    /// Resolve the configured region selection against the catalog once.
    pub fn new(
        config: Config,
        catalog: &dyn RegionCatalog,
        lister: &'a dyn InstanceLister,
    ) -> Result<Self> {
        let valid = catalog.region_names()?;
        let regions = region::resolve_regions(&valid, &config.regions, &config.regions_exclude);
        debug!(count = regions.len(), "resolved regions");

        Ok(Self {
            config,
            regions,
            lister,
        })
    }

    /// Produce the serialized inventory, served from the staleness cache
    /// when it is within the configured age window. A rebuild refreshes the
    /// cache file as a side effect.
    pub fn generate(&self) -> Result<String> {
        if let Some(cached) = cache::read_fresh(&self.config.cache_path, self.config.cache_max_age)
        {
            debug!(path = %self.config.cache_path.display(), "serving cached inventory");
            return Ok(cached);
        }

        let mut store = GroupStore::new(self.config.group_vars.clone());
        // The top-most group exists even when no region is selected.
        store.ensure_group("all");

        let mut region_keys = BTreeSet::new();
        for (key, name) in &self.regions {
            let instances = self.lister.list_instances(name)?;
            self.add_region(&mut store, key, &instances);
            region_keys.insert(key.clone());
        }
        store.add_children("all", region_keys);

        let out = store.to_json()?;
        if let Err(err) = cache::write(&self.config.cache_path, &out) {
            warn!("failed to refresh inventory cache: {err:#}");
        }
        Ok(out)
    }

    /// Group one region's running instances by their role tag.
    fn add_region(&self, store: &mut GroupStore, region_key: &str, instances: &[Instance]) {
        let mut regional_roles = BTreeSet::new();
        let mut role_children: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut role_hierarchy: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for instance in instances {
            if !instance.is_running() {
                continue;
            }

            let role = instance
                .tag(&self.config.role_tag)
                .unwrap_or(&self.config.default_role);

            let Some(host) = instance.address() else {
                debug!(region_key, role, "skipping instance without a usable address");
                continue;
            };

            // The lowest-level group, the only kind that holds hosts.
            let regional_role = format!("{region_key}_{role}");
            regional_roles.insert(regional_role.clone());

            // web_apache -> use1_web_apache
            role_children
                .entry(role.to_string())
                .or_default()
                .insert(regional_role.clone());

            // worker -> worker_gearman -> use1_worker_gearman
            for prefix in role_prefixes(role) {
                role_hierarchy
                    .entry(prefix)
                    .or_default()
                    .insert(regional_role.clone());
            }

            store.add_host(&regional_role, host);
        }

        store.add_children(region_key, regional_roles);
        for (group, children) in role_children {
            store.add_children(&group, children);
        }
        for (group, children) in role_hierarchy {
            store.add_children(&group, children);
        }
    }
}

/// Every strict, non-empty underscore prefix of a role:
/// `worker_gearman_foo` -> `worker`, `worker_gearman`.
fn role_prefixes(role: &str) -> Vec<String> {
    let segments: Vec<&str> = role.split('_').collect();

    let mut prefixes = Vec::new();
    let mut prefix = String::new();
    for segment in &segments[..segments.len() - 1] {
        if !prefix.is_empty() {
            prefix.push('_');
        }
        prefix.push_str(segment);
        prefixes.push(prefix.clone());
    }
    prefixes
}
