use crate::geo_range::{prefix_mask, GeoRange, IPV4_BITS};
use crate::DomainError;
use rustc_hash::FxHashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Immutable longest-prefix table of IPv4 ranges to location labels.
///
/// Entries are partitioned by prefix width and keyed by the masked network,
/// so a lookup probes at most 33 hash maps, most specific width first.
#[derive(Debug, Clone)]
pub struct GeoTable {
    partitions: Vec<FxHashMap<u32, Arc<str>>>,
    widths: Vec<u8>,
    len: usize,
}

impl GeoTable {
    pub fn empty() -> Self {
        Self {
            partitions: vec![FxHashMap::default(); IPV4_BITS as usize + 1],
            widths: Vec::new(),
            len: 0,
        }
    }

    /// Builds the table. A later range with the same network and prefix
    /// replaces an earlier one.
    pub fn build(ranges: impl IntoIterator<Item = GeoRange>) -> Self {
        let mut table = Self::empty();

        for range in ranges {
            let partition = &mut table.partitions[range.prefix_len() as usize];
            if partition
                .insert(range.network(), Arc::clone(range.location()))
                .is_none()
            {
                table.len += 1;
            }
        }

        table.widths = (0..=IPV4_BITS)
            .rev()
            .filter(|w| !table.partitions[*w as usize].is_empty())
            .collect();

        table
    }

    /// Parses `network/prefix,location` rows and builds the table.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a str>) -> Result<Self, DomainError> {
        let ranges = rows
            .into_iter()
            .map(GeoRange::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::build(ranges))
    }

    pub fn lookup(&self, address: u32) -> Option<&str> {
        self.widths.iter().find_map(|&width| {
            self.partitions[width as usize]
                .get(&(address & prefix_mask(width)))
                .map(|location| &**location)
        })
    }

    pub fn lookup_ip(&self, address: Ipv4Addr) -> Option<&str> {
        self.lookup(u32::from(address))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for GeoTable {
    fn default() -> Self {
        Self::empty()
    }
}
