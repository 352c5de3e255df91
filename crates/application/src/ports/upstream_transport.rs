use async_trait::async_trait;
use geodns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
    pub from: SocketAddr,
}

#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Send one encoded query to `server` and wait for a single reply.
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
