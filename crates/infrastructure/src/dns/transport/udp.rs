//! UDP transport for upstream DNS queries (RFC 1035 §4.2.1)
//!
//! Every exchange binds its own ephemeral socket, so concurrent walks never
//! read each other's replies.

use async_trait::async_trait;
use geodns_application::ports::{TransportResponse, UpstreamTransport};
use geodns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    retries: u32,
}

impl UdpTransport {
    /// `retries` extra attempts are made after a timeout.
    pub fn new(retries: u32) -> Self {
        Self { retries }
    }

    async fn bind_for(server: SocketAddr) -> Result<UdpSocket, DomainError> {
        let bind_addr = if server.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl UpstreamTransport for UdpTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = Self::bind_for(server).await?;
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        for attempt in 0..=self.retries {
            let bytes_sent = socket.send_to(message_bytes, server).await.map_err(|e| {
                DomainError::IoError(format!("Failed to send UDP query to {}: {}", server, e))
            })?;

            debug!(server = %server, bytes_sent, attempt, "UDP query sent");

            let (bytes_received, from_addr) =
                match tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf)).await {
                    Ok(result) => result.map_err(|e| {
                        DomainError::IoError(format!(
                            "Failed to receive UDP response from {}: {}",
                            server, e
                        ))
                    })?,
                    Err(_) => {
                        debug!(server = %server, attempt, "UDP query timed out");
                        continue;
                    }
                };

            if from_addr.ip() != server.ip() {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %server, bytes_received, "UDP response received");

            return Ok(TransportResponse {
                bytes: recv_buf,
                from: from_addr,
            });
        }

        Err(DomainError::TransportTimeout {
            server: server.to_string(),
        })
    }
}
