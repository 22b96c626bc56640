//! Region selection and region-key derivation.
//!
//! A region key is the short group-name prefix for a region, e.g.
//! `us-east-1` -> `use1`.

use std::collections::{BTreeMap, BTreeSet};

/// Derive a region key from a canonical region name: first dash-segment,
/// then the first letter of each compass direction that occurs anywhere in
/// the name (checked in a fixed order, not mutually exclusive), then the
/// third dash-segment. `ap-southeast-2` matches both south and east and
/// becomes `apse2`.
pub fn region_key(region: &str) -> String {
    let segments: Vec<&str> = region.split('-').collect();

    let mut key = segments[0].to_string();
    for direction in ["north", "south", "east", "west"] {
        if region.contains(direction) {
            key.push_str(&direction[..1]);
        }
    }
    if let Some(number) = segments.get(2) {
        key.push_str(number);
    }

    key
}

/// Resolve the configured region selection against the provider's catalog,
/// producing a region-key -> region-name table. `"all"` selects every
/// catalog region not in the comma-separated exclude list; any other
/// selector is itself a comma-separated allowlist. Two regions deriving the
/// same key resolve last-write-wins in catalog order.
pub fn resolve_regions(valid: &[String], selector: &str, exclude: &str) -> BTreeMap<String, String> {
    let mut regions = BTreeMap::new();

    if selector == "all" {
        let excluded = name_set(exclude);
        for name in valid {
            if !excluded.contains(name.as_str()) {
                regions.insert(region_key(name), name.clone());
            }
        }
    } else {
        let allowed = name_set(selector);
        for name in valid {
            if allowed.contains(name.as_str()) {
                regions.insert(region_key(name), name.clone());
            }
        }
    }

    regions
}

fn name_set(csv: &str) -> BTreeSet<&str> {
    csv.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
