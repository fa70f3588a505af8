// src/io/reference.rs - Reference database loading

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load the reference company names from a JSON array of records, taking the
/// configured name field from each object (the production database stores it
/// under "c"). Records that are not objects or lack the field are skipped;
/// anything that is not a JSON array at all is fatal.
pub fn load_reference_names(path: &Path, name_field: &str) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference database {}", path.display()))?;
    let data: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse reference database {}", path.display()))?;
    let records = data.as_array().with_context(|| {
        format!(
            "Reference database {} must be a JSON array of records",
            path.display()
        )
    })?;

    let mut names = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for record in records {
        match record.get(name_field).and_then(Value::as_str) {
            Some(name) => names.push(name.to_string()),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} reference records without a string '{}' field",
            skipped, name_field
        );
    }
    debug!(
        "Loaded {} reference names from {}",
        names.len(),
        path.display()
    );
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_names_from_configured_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(
            &path,
            r#"[{"c": "BBVA", "y": 2024}, {"c": "Assicurazioni Generali"}, {"y": 2023}, 42]"#,
        )
        .unwrap();

        let names = load_reference_names(&path, "c").unwrap();
        assert_eq!(names, vec!["BBVA", "Assicurazioni Generali"]);
    }

    #[test]
    fn test_non_array_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"{"c": "BBVA"}"#).unwrap();
        assert!(load_reference_names(&path, "c").is_err());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "[{").unwrap();
        assert!(load_reference_names(&path, "c").is_err());
    }
}
