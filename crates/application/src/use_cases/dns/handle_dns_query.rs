use crate::ports::DnsResolver;
use geodns_domain::{DomainError, Message};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves the first question of `request` and shapes the upstream
    /// result into a reply for the client.
    #[instrument(skip(self, request), fields(id = request.id))]
    pub async fn execute(&self, request: &Message) -> Result<Message, DomainError> {
        let start = Instant::now();

        if !request.is_standard_query() {
            return Err(DomainError::UnsupportedOpcode(request.opcode));
        }

        let question = request
            .first_question()
            .ok_or_else(|| DomainError::MalformedMessage("Request has no question".to_string()))?;

        if request.questions.len() > 1 {
            debug!(
                ignored = request.questions.len() - 1,
                "Only the first question is resolved"
            );
        }

        if !question.record_type.is_supported_question() {
            return Err(DomainError::UnsupportedQuestionType(
                question.record_type.to_string(),
            ));
        }

        let mut reply = match self
            .resolver
            .resolve(question, request.recursion_desired)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    domain = %question.name,
                    record_type = %question.record_type,
                    error = %e,
                    "Resolution failed"
                );
                return Err(e);
            }
        };

        reply.id = request.id;
        reply.is_query = false;
        reply.recursion_available = true;
        reply.questions = vec![question.clone()];

        info!(
            domain = %question.name,
            record_type = %question.record_type,
            rcode = reply.response_code.as_str(),
            answers = reply.answers.len(),
            response_time_ms = start.elapsed().as_millis() as u64,
            "Query answered"
        );

        Ok(reply)
    }

    /// Header-only reply carrying the response code for `error`.
    pub fn error_reply(request: &Message, error: &DomainError) -> Message {
        let mut reply = Message::reply_to(request);
        reply.response_code = error.response_code();
        reply
    }
}
