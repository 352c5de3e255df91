use super::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordData {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Name(String),
    Text(String),
}

impl RecordData {
    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            RecordData::Ipv4(ip) => Some(*ip),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            RecordData::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Interprets the raw data as a server address: an address record, or a
    /// name field that happens to hold an IP literal.
    pub fn as_ip_literal(&self) -> Option<IpAddr> {
        match self {
            RecordData::Ipv4(ip) => Some(IpAddr::V4(*ip)),
            RecordData::Ipv6(ip) => Some(IpAddr::V6(*ip)),
            RecordData::Name(name) | RecordData::Text(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::Ipv4(ip) => write!(f, "{}", ip),
            RecordData::Ipv6(ip) => write!(f, "{}", ip),
            RecordData::Name(name) => write!(f, "{}", name),
            RecordData::Text(text) => write!(f, "\"{}\"", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,

    pub record_type: RecordType,

    pub ttl: u32,

    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            data,
        }
    }

    pub fn a(name: impl Into<String>, ttl: u32, address: Ipv4Addr) -> Self {
        Self::new(name, RecordType::A, ttl, RecordData::Ipv4(address))
    }

    pub fn aaaa(name: impl Into<String>, ttl: u32, address: Ipv6Addr) -> Self {
        Self::new(name, RecordType::AAAA, ttl, RecordData::Ipv6(address))
    }

    pub fn cname(name: impl Into<String>, ttl: u32, target: impl Into<String>) -> Self {
        Self::new(name, RecordType::CNAME, ttl, RecordData::Name(target.into()))
    }

    pub fn ns(name: impl Into<String>, ttl: u32, host: impl Into<String>) -> Self {
        Self::new(name, RecordType::NS, ttl, RecordData::Name(host.into()))
    }

    pub fn txt(name: impl Into<String>, ttl: u32, text: impl Into<String>) -> Self {
        Self::new(name, RecordType::TXT, ttl, RecordData::Text(text.into()))
    }

    pub fn is_cname(&self) -> bool {
        self.record_type == RecordType::CNAME
    }

    /// Target of a CNAME record.
    pub fn cname_target(&self) -> Option<&str> {
        if self.is_cname() {
            self.data.as_name()
        } else {
            None
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.ttl, self.record_type, self.data
        )
    }
}
