//! The `T-<subsystem>-<number>` error code catalog, embedded from
//! `error_catalog.json`.
//!
//! Subsystems: 0 internal, 1 xml, 2 config.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    pub subsystem: String,
    /// Must equal the title of the diagnostics carrying the code.
    pub title: String,
    pub message_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    pub since_version: String,
}

/// Panics on first access if `error_catalog.json` is not valid.
pub static ERROR_CATALOG: Lazy<BTreeMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../error_catalog.json"))
        .expect("error_catalog.json must deserialize into the catalog")
});

/// ```
/// use tcs_error_reporting::get_error_info;
///
/// assert_eq!(get_error_info("T-1-1").map(|info| info.subsystem.as_str()), Some("xml"));
/// ```
pub fn get_error_info(code: &str) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_codes_are_well_formed() {
        for code in ERROR_CATALOG.keys() {
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3, "bad code {code}");
            assert_eq!(parts[0], "T");
            assert!(parts[1].parse::<u32>().is_ok(), "bad code {code}");
            assert!(parts[2].parse::<u32>().is_ok(), "bad code {code}");
        }
    }

    #[test]
    fn test_empty_append_list_entry() {
        let info = get_error_info("T-2-7").unwrap();
        assert_eq!(info.subsystem, "config");
        assert_eq!(info.title, "Empty Append-Mode List");
    }

    #[test]
    fn test_nonexistent_code() {
        assert!(get_error_info("T-999-999").is_none());
    }
}
