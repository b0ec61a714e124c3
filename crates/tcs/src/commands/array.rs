//! `tcs array`: walk the groups sharing a name.

use anyhow::Result;
use tcs_config::{TcsContext, render_lines};

pub fn execute(ctx: &mut TcsContext, path: &str, key: Option<&str>) -> Result<()> {
    for line in walk(ctx, path, key)? {
        println!("{}", line);
    }
    Ok(())
}

/// One `[index]` header per group followed by the group itself, or one
/// `[index] value` line per group when `key` is given.
pub fn walk(ctx: &mut TcsContext, path: &str, key: Option<&str>) -> Result<Vec<String>> {
    let count = ctx.select_group_array(path)?;
    tracing::debug!(path, count, "walking array group");

    let mut lines = Vec::new();
    for index in 0..count {
        if index > 0 {
            ctx.next_group_array()?;
        }

        match key {
            Some(key) => {
                let value = ctx.get_string(key).unwrap_or_else(|| "(unset)".to_string());
                lines.push(format!("[{}] {}", index, value));
            }
            None => {
                lines.push(format!("[{}]", index));
                if let Some(group) = ctx.current_group() {
                    lines.extend(render_lines(ctx.tree(), group));
                }
            }
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;

    #[test]
    fn test_walk_key() {
        let mut ctx = context();
        assert_eq!(
            walk(&mut ctx, "sim", Some("iccid")).unwrap(),
            ["[0] 8901", "[1] (unset)", "[2] 8903"]
        );
    }

    #[test]
    fn test_walk_groups() {
        let mut ctx = context();
        let lines = walk(&mut ctx, "sim", None).unwrap();
        assert_eq!(lines[0], "[0]");
        assert_eq!(lines[1], "====== Group: sim ======");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_walk_missing_array() {
        let mut ctx = context();
        assert!(walk(&mut ctx, "radio", None).is_err());
    }
}
