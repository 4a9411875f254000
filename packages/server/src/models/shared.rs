use std::collections::HashSet;

use crate::error::AppError;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed name field (1-256 Unicode characters).
pub fn validate_name(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Validate an ID set used for many-to-many references (no duplicates).
pub fn validate_id_set(ids: &[i32], name: &str) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} ID: {id}")));
        }
    }
    Ok(())
}

/// Parse a comma-separated ID list query parameter (e.g. `genres=1,3`).
pub fn parse_id_list(raw: &str, name: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| AppError::Validation(format!("Invalid {name} ID: '{s}'")))
        })
        .collect()
}
