//! # Configuration Pipeline
//!
//! Folds the configuration layers into the effective configuration. Each
//! step merges the new layer as the *source* over the running result, so
//! every later layer takes priority over everything before it:
//!
//! 1. `default` (required) and `project` (required) are loaded.
//! 2. `result = merge(project, default)`.
//! 3. Every entry under `guests` is merged over `default_guest`.
//! 4. `result = merge(local, result)`; `local` is optional.
//! 5. `result = merge(override, result)`; the override layer is optional and
//!    its path depends on `project.tag`.
//!
//! The resulting tree is owned by the caller and never written back to disk.

use log::{info, warn};
use serde_yaml::Mapping;

use crate::context::RunContext;
use crate::error::Result;
use crate::loader::{LayerLoader, LoadOptions};
use crate::merge::{deep_merge, lookup_string, ConfigTree};

/// Key holding the per-guest configurations.
pub const GUESTS_KEY: &str = "guests";

/// Key holding the template every guest is expanded against.
pub const DEFAULT_GUEST_KEY: &str = "default_guest";

/// Build the effective configuration for `ctx`.
///
/// Returns an error if a required layer cannot be loaded; the project
/// layer is not read when the default layer already failed.
pub fn build_effective_config(
    ctx: &RunContext,
    loader: &dyn LayerLoader,
) -> Result<ConfigTree> {
    let default_conf = loader
        .load(&ctx.default_config(), LoadOptions::required("default configuration"))?
        .unwrap_or_else(empty);
    let project_conf = loader
        .load(&ctx.project_config, LoadOptions::required("project configuration"))?
        .unwrap_or_else(empty);

    let mut conf = deep_merge(&project_conf, &default_conf);
    expand_guests(&mut conf);

    let local_conf = loader
        .load(&ctx.local_config(), LoadOptions::optional("local configuration"))?
        .unwrap_or_else(empty);
    conf = deep_merge(&local_conf, &conf);

    match lookup_string(&conf, "project.tag") {
        Some(tag) => {
            let override_conf = loader
                .load(
                    &ctx.override_config(&tag),
                    LoadOptions::optional("override configuration"),
                )?
                .unwrap_or_else(empty);
            conf = deep_merge(&override_conf, &conf);
        }
        None => warn!("No project.tag configured, skipping the override configuration"),
    }

    info!("All settings successfully loaded.");
    Ok(conf)
}

/// Merge every guest entry over the `default_guest` template.
///
/// Guest keys win; template keys the guest lacks are inherited. Does
/// nothing when there is no `guests` mapping.
pub fn expand_guests(conf: &mut ConfigTree) {
    let template = conf
        .get(DEFAULT_GUEST_KEY)
        .cloned()
        .unwrap_or(ConfigTree::Null);
    let Some(guests) = conf
        .get_mut(GUESTS_KEY)
        .and_then(ConfigTree::as_mapping_mut)
    else {
        return;
    };
    for (_, guest) in guests.iter_mut() {
        *guest = deep_merge(guest, &template);
    }
}

fn empty() -> ConfigTree {
    ConfigTree::Mapping(Mapping::new())
}
