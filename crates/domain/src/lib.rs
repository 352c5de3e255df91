//! GeoDNS Domain Layer
pub mod config;
pub mod dns_message;
pub mod dns_record;
pub mod errors;
pub mod geo_range;
pub mod geo_table;
pub mod question;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{Message, ResponseCode, OPCODE_QUERY};
pub use dns_record::{RecordData, RecordType, ResourceRecord};
pub use errors::DomainError;
pub use geo_range::GeoRange;
pub use geo_table::GeoTable;
pub use question::{Question, CLASS_IN};
