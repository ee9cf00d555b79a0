//! # Guest Plans
//!
//! Typed view of the effective configuration as the orchestration driver
//! consumes it. Every guest under `guests` becomes a [`GuestPlan`] with its
//! machine id, hostname, box, network interfaces, providers, provisioners
//! and shared folders. The [`Handoff`] bundles the plans with the raw
//! effective configuration for the driver.
//!
//! Provider, provisioner, mount type and NIC type names are closed enums.
//! A name outside the enum is logged and skipped; a known name the driver
//! does not implement yet is skipped as well, decided by an exhaustive
//! `match` so new variants cannot be forgotten.

use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::context::{detect_command, Environment, RunContext};
use crate::error::{Error, Result};
use crate::merge::{lookup, lookup_string, ConfigTree};
use crate::pipeline::GUESTS_KEY;

/// Virtualization provider of a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Virtualbox,
    Vmware,
    Aws,
}

impl Provider {
    /// Whether the driver can configure this provider.
    pub fn is_implemented(&self) -> bool {
        match self {
            Provider::Virtualbox => true,
            Provider::Vmware | Provider::Aws => false,
        }
    }
}

/// Provisioner run against a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provisioner {
    Ansible,
    Puppet,
    Docker,
    Shell,
    Chef,
}

impl Provisioner {
    /// Whether the driver can configure this provisioner.
    pub fn is_implemented(&self) -> bool {
        match self {
            Provisioner::Ansible => true,
            Provisioner::Puppet | Provisioner::Docker | Provisioner::Shell | Provisioner::Chef => {
                false
            }
        }
    }
}

/// How a shared folder is mounted into a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    /// Not mounted; files are synced by other means.
    None,
    Nfs,
    Smb,
    Rsync,
}

impl MountType {
    /// Whether the driver can configure this mount type.
    pub fn is_implemented(&self) -> bool {
        match self {
            MountType::None | MountType::Nfs => true,
            MountType::Smb | MountType::Rsync => false,
        }
    }
}

/// Kind of network attached to a NIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NicType {
    #[default]
    PrivateNetwork,
    PublicNetwork,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NicPlan {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NicType,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPlan {
    pub kind: Provider,
    pub settings: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionerPlan {
    pub kind: Provisioner,
    pub settings: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderPlan {
    pub name: String,
    pub mount: MountType,
    pub settings: ConfigTree,
}

/// Everything the driver needs to define one guest machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestPlan {
    /// Key of the guest under `guests`.
    pub id: String,
    /// `<id>_<tag>_<postfix>`, the machine name given to the driver.
    pub machine_id: String,
    pub hostname: String,
    pub box_name: String,
    pub box_url: String,
    /// IP of the NIC named `default`.
    pub default_ip: Option<String>,
    pub nics: Vec<NicPlan>,
    pub providers: Vec<ProviderPlan>,
    pub provisioners: Vec<ProvisionerPlan>,
    pub folders: Vec<FolderPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostManager {
    pub enabled: bool,
    pub manage_host: bool,
    pub manage_guest: bool,
}

/// Settings for the orchestration tool itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VagrantSettings {
    /// Version requirement, e.g. `>= 2.2.0`.
    pub version: Option<String>,
    pub hostmanager: HostManager,
}

/// Document handed to the orchestration driver.
#[derive(Debug, Clone, Serialize)]
pub struct Handoff {
    pub environment: Environment,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub vagrant: VagrantSettings,
    pub guests: Vec<GuestPlan>,
    pub config: ConfigTree,
}

impl Handoff {
    /// Plan every guest of `config` and bundle the result for the driver.
    pub fn build(ctx: &RunContext, config: ConfigTree) -> Result<Self> {
        let guests = plan_guests(&config)?;
        Ok(Self {
            environment: ctx.environment,
            command: detect_command(&ctx.passthrough).map(str::to_string),
            args: ctx.passthrough.clone(),
            vagrant: vagrant_settings(&config),
            guests,
            config,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as JSON. Mapping keys that are not strings are stringified.
    pub fn to_json(&self) -> Result<String> {
        let tree = string_keys(&serde_yaml::to_value(self)?);
        Ok(serde_json::to_string_pretty(&tree)?)
    }
}

fn string_keys(tree: &ConfigTree) -> ConfigTree {
    match tree {
        ConfigTree::Mapping(map) => ConfigTree::Mapping(
            map.iter()
                .map(|(k, v)| (ConfigTree::String(key_string(k)), string_keys(v)))
                .collect(),
        ),
        ConfigTree::Sequence(seq) => ConfigTree::Sequence(seq.iter().map(string_keys).collect()),
        other => other.clone(),
    }
}

/// Read the `vagrant` section. Missing flags default to `false`.
pub fn vagrant_settings(conf: &ConfigTree) -> VagrantSettings {
    let version = lookup_string(conf, "vagrant.version");
    if let Some(requirement) = &version {
        if let Err(e) = semver::VersionReq::parse(requirement) {
            warn!("vagrant.version '{}' is not a valid version requirement: {}", requirement, e);
        }
    }
    let flag = |key: &str| {
        lookup(conf, &format!("vagrant.hostmanager.{}", key))
            .and_then(ConfigTree::as_bool)
            .unwrap_or(false)
    };
    VagrantSettings {
        version,
        hostmanager: HostManager {
            enabled: flag("enabled"),
            manage_host: flag("manage_host"),
            manage_guest: flag("manage_guest"),
        },
    }
}

/// Build a plan for every entry under `guests`.
///
/// # Errors
///
/// Returns [`Error::Plan`] when `project.tag` or `guests` is missing, or a
/// guest lacks one of its required keys.
pub fn plan_guests(conf: &ConfigTree) -> Result<Vec<GuestPlan>> {
    let tag = lookup_string(conf, "project.tag").ok_or_else(|| Error::Plan {
        guest: "*".to_string(),
        message: "missing key 'project.tag'".to_string(),
    })?;
    let guests = conf
        .get(GUESTS_KEY)
        .and_then(ConfigTree::as_mapping)
        .ok_or_else(|| Error::Plan {
            guest: "*".to_string(),
            message: format!("missing mapping '{}'", GUESTS_KEY),
        })?;

    guests
        .iter()
        .map(|(id, guest)| plan_guest(&key_string(id), guest, &tag))
        .collect()
}

/// Build the plan for a single guest.
pub fn plan_guest(id: &str, guest: &ConfigTree, tag: &str) -> Result<GuestPlan> {
    let missing = |key: &str| Error::Plan {
        guest: id.to_string(),
        message: format!("missing key '{}'", key),
    };
    let box_name = lookup_string(guest, "box.name").ok_or_else(|| missing("box.name"))?;
    let box_url = lookup_string(guest, "box.url").ok_or_else(|| missing("box.url"))?;
    let nics = lookup(guest, "box.network.nics").ok_or_else(|| missing("box.network.nics"))?;
    let providers = lookup(guest, "box.provider").ok_or_else(|| missing("box.provider"))?;
    let provisioners = lookup(guest, "box.provisioner").ok_or_else(|| missing("box.provisioner"))?;
    let folders =
        lookup(guest, "box.filesystem.folders").ok_or_else(|| missing("box.filesystem.folders"))?;

    let postfix = lookup_string(guest, "postfix");
    let machine_id = join_non_empty(&[id, tag, postfix.as_deref().unwrap_or("")], "_");
    let hostname = lookup_string(guest, "box.network.hostname").unwrap_or_else(|| {
        join_non_empty(&[id, tag, postfix.as_deref().unwrap_or("")], ".")
    });

    let nics = plan_nics(&machine_id, nics);
    let default_ip = nics
        .iter()
        .find(|nic| nic.name == "default")
        .and_then(|nic| nic.ip.clone());

    Ok(GuestPlan {
        id: id.to_string(),
        hostname,
        box_name,
        box_url,
        default_ip,
        nics,
        providers: plan_entries(&machine_id, "VM Provider", providers, |kind: Provider, settings| {
            kind.is_implemented()
                .then_some(ProviderPlan { kind, settings })
        }),
        provisioners: plan_entries(
            &machine_id,
            "Provisioner",
            provisioners,
            |kind: Provisioner, settings| {
                kind.is_implemented()
                    .then_some(ProvisionerPlan { kind, settings })
            },
        ),
        folders: plan_folders(&machine_id, folders),
        machine_id,
    })
}

fn plan_nics(machine_id: &str, nics: &ConfigTree) -> Vec<NicPlan> {
    let Some(nics) = nics.as_mapping() else {
        return Vec::new();
    };
    let mut planned = Vec::with_capacity(nics.len());
    for (name, nic) in nics {
        let name = key_string(name);
        info!("{} --> Configuring network '{}'", machine_id, name);
        let kind = match nic.get("type") {
            None | Some(ConfigTree::Null) => NicType::default(),
            Some(value) => match parse_kind::<NicType>(value) {
                Some(kind) => kind,
                None => {
                    error!(
                        "{} --> Unknown network type {:?} for '{}'. Skipping...",
                        machine_id, value, name
                    );
                    continue;
                }
            },
        };
        planned.push(NicPlan {
            name,
            kind,
            ip: lookup_string(nic, "ip"),
        });
    }
    planned
}

fn plan_folders(machine_id: &str, folders: &ConfigTree) -> Vec<FolderPlan> {
    let Some(folders) = folders.as_mapping() else {
        return Vec::new();
    };
    let mut planned = Vec::with_capacity(folders.len());
    for (name, folder) in folders {
        let name = key_string(name);
        let mount = folder.get("mounttype").and_then(parse_kind::<MountType>);
        match mount {
            Some(mount) if mount.is_implemented() => {
                info!("{} --> Configuring sync for {}.", machine_id, name);
                planned.push(FolderPlan {
                    name,
                    mount,
                    settings: folder.clone(),
                });
            }
            _ => error!(
                "{} --> Unknown/Unimplemented Mounttype for folder {}. Skipping...",
                machine_id, name
            ),
        }
    }
    planned
}

/// Plan the named entries of a provider or provisioner mapping.
fn plan_entries<K, P>(
    machine_id: &str,
    what: &str,
    entries: &ConfigTree,
    plan: impl Fn(K, ConfigTree) -> Option<P>,
) -> Vec<P>
where
    K: DeserializeOwned,
{
    let Some(entries) = entries.as_mapping() else {
        return Vec::new();
    };
    let mut planned = Vec::with_capacity(entries.len());
    for (name, settings) in entries {
        let planned_entry = parse_kind::<K>(name).and_then(|kind| plan(kind, settings.clone()));
        match planned_entry {
            Some(entry) => {
                info!("{} --> Configuring {} [{}].", machine_id, what, key_string(name));
                planned.push(entry);
            }
            None => error!(
                "{} --> Unknown/Unimplemented {} '{}'. Skipping...",
                machine_id,
                what,
                key_string(name)
            ),
        }
    }
    planned
}

fn parse_kind<T: DeserializeOwned>(value: &ConfigTree) -> Option<T> {
    serde_yaml::from_value(value.clone()).ok()
}

fn key_string(key: &ConfigTree) -> String {
    match key {
        ConfigTree::String(s) => s.clone(),
        ConfigTree::Number(n) => n.to_string(),
        ConfigTree::Bool(b) => b.to_string(),
        ConfigTree::Null => "null".to_string(),
        other => format!("{:?}", other),
    }
}

fn join_non_empty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(separator)
}
