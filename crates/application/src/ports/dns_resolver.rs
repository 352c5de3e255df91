use async_trait::async_trait;
use geodns_domain::{DomainError, Message, Question};

#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve `question` and return the final reply.
    ///
    /// When `recursion_desired` is false the first upstream reply is returned
    /// untouched, referrals included.
    async fn resolve(
        &self,
        question: &Question,
        recursion_desired: bool,
    ) -> Result<Message, DomainError>;
}
