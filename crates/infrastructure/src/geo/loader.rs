use geodns_domain::{DomainError, GeoRange, GeoTable};
use std::path::Path;
use tracing::info;

/// Reads geo tables from `network/prefix,location` text files.
///
/// Blank lines and lines starting with `#` are skipped. Errors name the
/// offending line.
pub struct GeoTableLoader;

impl GeoTableLoader {
    pub fn load_file(path: impl AsRef<Path>) -> Result<GeoTable, DomainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::MalformedConfig(format!(
                "Failed to read geo table '{}': {}",
                path.display(),
                e
            ))
        })?;

        let table = Self::parse(&contents).map_err(|e| match e {
            DomainError::MalformedConfig(msg) => {
                DomainError::MalformedConfig(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!(path = %path.display(), ranges = table.len(), "Geo table loaded");
        Ok(table)
    }

    pub fn parse(contents: &str) -> Result<GeoTable, DomainError> {
        let mut ranges = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let range = GeoRange::parse(line).map_err(|e| match e {
                DomainError::MalformedConfig(msg) => {
                    DomainError::MalformedConfig(format!("line {}: {}", index + 1, msg))
                }
                other => other,
            })?;
            ranges.push(range);
        }

        Ok(GeoTable::build(ranges))
    }
}
