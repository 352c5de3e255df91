use crate::DomainError;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;
use std::sync::Arc;

pub const IPV4_BITS: u8 = 32;

/// Netmask with the top `width` bits set.
pub fn prefix_mask(width: u8) -> u32 {
    match width {
        0 => 0,
        w if w >= IPV4_BITS => u32::MAX,
        w => u32::MAX << (IPV4_BITS - w),
    }
}

/// One `network/prefix -> location` row of the geo table.
///
/// The network address always has the host bits cleared, so
/// `10.1.2.3/8` is stored as `10.0.0.0/8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRange {
    network: u32,
    prefix_len: u8,
    location: Arc<str>,
}

impl GeoRange {
    pub fn new(
        address: Ipv4Addr,
        prefix_len: u8,
        location: impl Into<Arc<str>>,
    ) -> Result<Self, DomainError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(DomainError::MalformedConfig(format!(
                "Missing location label for {}/{}",
                address, prefix_len
            )));
        }

        let network = Ipv4Network::new(address, prefix_len).map_err(|e| {
            DomainError::MalformedConfig(format!("Invalid prefix {}/{}: {}", address, prefix_len, e))
        })?;

        Ok(Self {
            network: u32::from(network.network()),
            prefix_len,
            location,
        })
    }

    /// Parses a `a.b.c.d/len,label` row.
    pub fn parse(row: &str) -> Result<Self, DomainError> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() != 2 {
            return Err(DomainError::MalformedConfig(format!(
                "Expected 'network/prefix,location', got '{}'",
                row
            )));
        }

        let (address, prefix) = fields[0].trim().split_once('/').ok_or_else(|| {
            DomainError::MalformedConfig(format!(
                "CIDR must include prefix (e.g., 10.0.0.0/8): '{}'",
                fields[0]
            ))
        })?;

        let address: Ipv4Addr = address.parse().map_err(|_| {
            DomainError::MalformedConfig(format!("Invalid IPv4 network address '{}'", address))
        })?;

        let prefix_len: u8 = prefix.parse().map_err(|_| {
            DomainError::MalformedConfig(format!("Invalid prefix length '{}'", prefix))
        })?;

        Self::new(address, prefix_len, fields[1].trim())
    }

    pub fn network(&self) -> u32 {
        self.network
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn location(&self) -> &Arc<str> {
        &self.location
    }
}
