use geodns_domain::{DomainError, Message};

/// Converts between the domain [`Message`] and its on-the-wire bytes.
pub trait WireCodec: Send + Sync {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, DomainError>;

    fn decode(&self, bytes: &[u8]) -> Result<Message, DomainError>;
}
