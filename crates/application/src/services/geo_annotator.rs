use geodns_domain::{GeoTable, Message, ResourceRecord};
use std::sync::Arc;
use tracing::trace;

/// TTL of synthesized location records, so downstream caches never keep them.
pub const LOCATION_TTL: u32 = 0;

/// Appends a `location-address` TXT record for every IPv4 answer covered by
/// the geo table.
#[derive(Debug, Clone)]
pub struct GeoAnnotator {
    table: Arc<GeoTable>,
}

impl GeoAnnotator {
    pub fn new(table: Arc<GeoTable>) -> Self {
        Self { table }
    }

    pub fn annotation_for(&self, record: &ResourceRecord) -> Option<ResourceRecord> {
        if record.is_cname() {
            return None;
        }
        let address = record.data.as_ipv4()?;
        let location = self.table.lookup_ip(address)?;

        Some(ResourceRecord::txt(
            record.name.clone(),
            LOCATION_TTL,
            format!("{}-{}", location, address),
        ))
    }

    /// Returns the number of TXT records appended.
    pub fn annotate(&self, message: &mut Message) -> usize {
        if self.table.is_empty() {
            return 0;
        }

        let annotations: Vec<ResourceRecord> = message
            .answers
            .iter()
            .filter_map(|record| self.annotation_for(record))
            .collect();

        let added = annotations.len();
        if added > 0 {
            trace!(added, "Location records appended");
        }
        message.answers.extend(annotations);
        added
    }
}
