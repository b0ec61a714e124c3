//! `tcs print` and `tcs xml`: the whole merged tree.

use std::path::Path;

use anyhow::{Context, Result};
use tcs_config::TcsContext;

pub fn print(ctx: &TcsContext) -> Result<()> {
    print!("{}", ctx.dump());
    Ok(())
}

pub fn xml(ctx: &TcsContext, output: Option<&Path>) -> Result<()> {
    let xml = ctx.to_xml().context("Failed to serialize configuration")?;

    match output {
        Some(path) => {
            std::fs::write(path, &xml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration written");
        }
        None => print!("{}", xml),
    }
    Ok(())
}
