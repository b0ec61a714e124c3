//! `tcs get`: look up a single value.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tcs_config::TcsContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    Bool,
    Int,
    String,
    /// Items of a `<list>`, one per line
    List,
}

pub fn execute(ctx: &mut TcsContext, path: &str, key: &str, value_type: ValueType) -> Result<()> {
    for line in lookup(ctx, path, key, value_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// The output lines of a lookup.
pub fn lookup(
    ctx: &mut TcsContext,
    path: &str,
    key: &str,
    value_type: ValueType,
) -> Result<Vec<String>> {
    ctx.select_group(path)?;

    let lines = match value_type {
        ValueType::Bool => vec![ctx.get_bool(key)?.to_string()],
        ValueType::Int => vec![ctx.get_int(key)?.to_string()],
        ValueType::String => {
            let value = ctx
                .get_string(key)
                .ok_or_else(|| anyhow!("no <string> `{}` in group `{}`", key, path))?;
            vec![value]
        }
        ValueType::List => ctx.get_string_array(key),
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use tcs_config::LookupError;

    #[test]
    fn test_typed_lookups() {
        let mut ctx = context();
        assert_eq!(lookup(&mut ctx, ".hal", "enabled", ValueType::Bool).unwrap(), ["true"]);
        assert_eq!(lookup(&mut ctx, ".hal", "ping_timeout", ValueType::Int).unwrap(), ["16"]);
        assert_eq!(lookup(&mut ctx, "crm1.hal", "name", ValueType::String).unwrap(), ["modem"]);
        assert_eq!(lookup(&mut ctx, ".hal", "bands", ValueType::List).unwrap(), ["B1", "B3"]);
    }

    #[test]
    fn test_lookup_errors() {
        let mut ctx = context();

        let err = lookup(&mut ctx, ".radio", "x", ValueType::Int).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LookupError>(),
            Some(LookupError::GroupNotFound { .. })
        ));

        let err = lookup(&mut ctx, ".hal", "name", ValueType::Int).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LookupError>(),
            Some(LookupError::KeyNotFound { .. })
        ));

        let err = lookup(&mut ctx, ".hal", "missing", ValueType::String).unwrap_err();
        assert_eq!(err.to_string(), "no <string> `missing` in group `.hal`");
    }
}
