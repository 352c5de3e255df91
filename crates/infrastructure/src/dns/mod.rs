pub mod codec;
pub mod server;
pub mod transport;

pub use codec::HickoryWireCodec;
pub use server::DnsServerHandler;
pub use transport::UdpTransport;
