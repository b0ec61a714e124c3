//! Platform discovery: which documents to load on this device.
//!
//! Settings come from system properties. On a host the properties are read
//! from environment variables named after the property, upper-cased with
//! dots replaced by underscores (`tcs.dbg.host.hw_folder` is read from
//! `TCS_DBG_HOST_HW_FOLDER`).

use crate::error::BuildError;
use crate::types::Settings;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const PROP_HW_FOLDER: &str = "tcs.dbg.host.hw_folder";
pub const PROP_OVERLAY_FOLDER: &str = "tcs.dbg.host.overlay_folder";
pub const PROP_PERSIST_HW_NAME: &str = "persist.tcs.hw_filename";
pub const PROP_HW_NAME: &str = "ro.telephony.tcs.hw_name";
pub const PROP_PERSIST_SW_FOLDER: &str = "persist.tcs.sw_folder";
pub const PROP_SW_FOLDER: &str = "ro.telephony.tcs.sw_folder";
pub const PROP_BUILD_TYPE: &str = "ro.build.type";

pub const DEFAULT_HW_FOLDER: &str = "/system/vendor/etc/telephony/tcs";
pub const CATALOG_FOLDER: &str = "/system/vendor/etc/telephony/catalog";
pub const SYSFS_CONFIG_NAME: &str = "/sys/kernel/telephony/config_name";

/// A source of system properties.
pub trait PropertySource {
    /// The value of `name`, or `None` when unset or empty.
    fn get(&self, name: &str) -> Option<String>;
}

/// Properties read from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProperties;

impl EnvProperties {
    pub fn variable_name(property: &str) -> String {
        property.replace('.', "_").to_uppercase()
    }
}

impl PropertySource for EnvProperties {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::variable_name(name))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Properties held in memory.
#[derive(Debug, Clone, Default)]
pub struct MapProperties {
    values: BTreeMap<String, String>,
}

impl MapProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl PropertySource for MapProperties {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// The documents selected for this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub hw_root: PathBuf,
    pub overlay_root: Option<PathBuf>,
    pub base_name: String,
}

impl Platform {
    /// Discover the platform from `props`, falling back to the kernel's
    /// config name for the base document.
    pub fn discover(props: &dyn PropertySource) -> Result<Self, BuildError> {
        Self::discover_from(props, Path::new(SYSFS_CONFIG_NAME))
    }

    /// Like [`discover`](Self::discover), reading the fallback base name
    /// from `config_name_file`.
    pub fn discover_from(
        props: &dyn PropertySource,
        config_name_file: &Path,
    ) -> Result<Self, BuildError> {
        // Persisted overrides are ignored on production builds.
        let user_build = props.get(PROP_BUILD_TYPE).as_deref() == Some("user");
        let persisted = |name: &str| if user_build { None } else { props.get(name) };

        let hw_root = props
            .get(PROP_HW_FOLDER)
            .map_or_else(|| PathBuf::from(DEFAULT_HW_FOLDER), PathBuf::from);

        let overlay_root = props.get(PROP_OVERLAY_FOLDER).map(PathBuf::from).or_else(|| {
            persisted(PROP_PERSIST_SW_FOLDER)
                .or_else(|| props.get(PROP_SW_FOLDER))
                .map(|folder| Path::new(CATALOG_FOLDER).join(folder))
        });

        let base_name = persisted(PROP_PERSIST_HW_NAME)
            .or_else(|| props.get(PROP_HW_NAME))
            .or_else(|| read_config_name(config_name_file))
            .ok_or(BuildError::PlatformNotDetected)?;

        tracing::debug!(
            hw_root = %hw_root.display(),
            overlay_root = ?overlay_root,
            base_name = %base_name,
            "platform discovered"
        );

        Ok(Platform {
            hw_root,
            overlay_root,
            base_name,
        })
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            hw_root: self.hw_root,
            overlay_root: self.overlay_root,
            base_name: self.base_name,
            base_prefix: String::new(),
        }
    }
}

fn read_config_name(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = content.lines().next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}
