mod dns_resolver;
mod upstream_transport;
mod wire_codec;

pub use dns_resolver::DnsResolver;
pub use upstream_transport::{TransportResponse, UpstreamTransport};
pub use wire_codec::WireCodec;

// Re-export for convenience
pub use geodns_domain::{Message, Question};
