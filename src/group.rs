//! Group store: the in-memory inventory being assembled.
//!
//! Groups are keyed by name and hold hosts, per-group vars, and child-group
//! names. Hosts and children are sets internally and sorted lists on output,
//! so the serialized inventory is identical regardless of insertion order.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Per-group variable overrides, keyed by group name.
pub type VarsTable = BTreeMap<String, BTreeMap<String, Value>>;

/// One named group in the inventory. Field order matches the emitted JSON
/// shape: `{hosts, vars, children}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupRecord {
    pub hosts: BTreeSet<String>,
    pub vars: BTreeMap<String, Value>,
    pub children: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct GroupStore {
    groups: BTreeMap<String, GroupRecord>,
    vars: VarsTable,
}

impl GroupStore {
    pub fn new(vars: VarsTable) -> Self {
        Self {
            groups: BTreeMap::new(),
            vars,
        }
    }

    /// Create a group if it does not exist yet. Vars come from the table
    /// supplied at construction; groups without an entry get an empty mapping.
    pub fn ensure_group(&mut self, name: &str) {
        self.ensure_mut(name);
    }

    /// Add a host to a group, creating the group on demand. Re-adding the
    /// same host is a no-op.
    pub fn add_host(&mut self, group: &str, host: &str) {
        self.ensure_mut(group).hosts.insert(host.to_string());
    }

    /// Add child groups to a group, creating the parent on demand. Each
    /// insertion is idempotent.
    pub fn add_children<I, S>(&mut self, group: &str, children: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = self.ensure_mut(group);
        for child in children {
            record.children.insert(child.into());
        }
    }

    /// Serialize every group as pretty-printed JSON with sorted keys and
    /// sorted host/children lists.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.groups)?)
    }

    fn ensure_mut(&mut self, name: &str) -> &mut GroupRecord {
        let vars = &self.vars;
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| GroupRecord {
                vars: vars.get(name).cloned().unwrap_or_default(),
                ..GroupRecord::default()
            })
    }
}
