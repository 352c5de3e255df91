use geodns_application::ports::WireCodec;
use geodns_application::use_cases::HandleDnsQueryUseCase;
use geodns_domain::{DomainError, Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Turns one client datagram into one reply datagram.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
    codec: Arc<dyn WireCodec>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>, codec: Arc<dyn WireCodec>) -> Self {
        Self { use_case, codec }
    }

    /// Returns `None` when nothing should be sent back, which is the case for
    /// datagrams that do not decode as a DNS message.
    pub async fn handle_datagram(&self, bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match self.codec.decode(bytes) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %client, bytes = bytes.len(), error = %e, "Dropping undecodable datagram");
                return None;
            }
        };

        if let Some(question) = request.first_question() {
            info!(
                domain = %question.name,
                record_type = %question.record_type,
                client = %client,
                "DNS query received"
            );
        }

        let reply = match self.use_case.execute(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                debug!(client = %client, error = %e, "Sending error response");
                HandleDnsQueryUseCase::error_reply(&request, &e)
            }
        };

        match self.codec.encode(&reply) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(client = %client, error = %e, "Failed to encode response");
                self.encode_server_failure(&request, &e)
            }
        }
    }

    fn encode_server_failure(&self, request: &Message, cause: &DomainError) -> Option<Vec<u8>> {
        let mut reply = HandleDnsQueryUseCase::error_reply(request, cause);
        reply.response_code = ResponseCode::ServerFailure;

        match self.codec.encode(&reply) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "Failed to encode error response");
                None
            }
        }
    }
}
