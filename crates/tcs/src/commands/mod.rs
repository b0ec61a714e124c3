//! Command implementations for the TCS CLI
//!
//! Every command runs against a context opened from [`ContextArgs`].

pub mod array;
pub mod get;
pub mod show;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tcs_config::{BuildError, EnvProperties, Platform, Settings, TcsContext};

/// Where the configuration comes from.
///
/// Without `--base` the platform is discovered from `TCS_DBG_HOST_*` and
/// `RO_TELEPHONY_TCS_*` environment variables; the other flags override
/// what was discovered.
#[derive(Debug, Default, Args)]
pub struct ContextArgs {
    /// Root of the hardware configuration documents
    #[arg(long, global = true)]
    pub hw_root: Option<PathBuf>,

    /// Root of the overlay documents
    #[arg(long, global = true)]
    pub overlay_root: Option<PathBuf>,

    /// Base document name, without prefix and extension
    #[arg(long, global = true)]
    pub base: Option<String>,

    /// Prefix of the base document file name
    #[arg(long, global = true)]
    pub base_prefix: Option<String>,

    /// Module to load as default group; `.path` lookups start there
    #[arg(short, long, global = true)]
    pub group: Option<String>,

    /// Additional module to load (repeatable)
    #[arg(short, long = "load", global = true)]
    pub load: Vec<String>,
}

impl ContextArgs {
    pub fn settings(&self) -> Result<Settings, BuildError> {
        let mut settings = match &self.base {
            Some(base) => Settings::new(tcs_config::DEFAULT_HW_FOLDER, base.as_str()),
            None => Platform::discover(&EnvProperties)?.into_settings(),
        };

        if let Some(hw_root) = &self.hw_root {
            settings.hw_root = hw_root.clone();
        }
        if let Some(overlay_root) = &self.overlay_root {
            settings.overlay_root = Some(overlay_root.clone());
        }
        if let Some(prefix) = &self.base_prefix {
            settings.base_prefix = prefix.clone();
        }
        Ok(settings)
    }

    /// Build the context and load the requested modules.
    pub fn open(&self) -> Result<TcsContext> {
        let settings = self.settings()?;
        tracing::debug!(
            base = %settings.base_document_path().display(),
            overlay_root = ?settings.overlay_root,
            "opening configuration"
        );

        let mut ctx = TcsContext::init(settings, self.group.as_deref())?;
        for group in &self.load {
            ctx.add_group(group, false)?;
        }
        Ok(ctx)
    }
}
