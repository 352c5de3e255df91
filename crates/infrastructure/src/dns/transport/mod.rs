mod udp;

pub use udp::UdpTransport;
