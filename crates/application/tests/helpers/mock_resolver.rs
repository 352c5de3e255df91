use async_trait::async_trait;
use geodns_application::ports::DnsResolver;
use geodns_domain::{DomainError, Message, Question};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, Message>>>,
    error_responses: Arc<std::sync::RwLock<HashMap<String, DomainError>>>,
    calls: Arc<std::sync::Mutex<Vec<(Question, bool)>>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            error_responses: Arc::new(std::sync::RwLock::new(HashMap::new())),
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub async fn set_response(&self, domain: &str, reply: Message) {
        self.responses
            .write()
            .await
            .insert(domain.to_string(), reply);
    }

    pub fn set_response_error(&self, domain: &str, error: DomainError) {
        self.error_responses
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn calls(&self) -> Vec<(Question, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(
        &self,
        question: &Question,
        recursion_desired: bool,
    ) -> Result<Message, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.clone(), recursion_desired));

        if let Some(err) = self
            .error_responses
            .read()
            .unwrap()
            .get(question.name.as_ref())
            .cloned()
        {
            return Err(err);
        }

        self.responses
            .read()
            .await
            .get(question.name.as_ref())
            .cloned()
            .ok_or_else(|| DomainError::NoAnswerNoAuthority {
                domain: question.name.to_string(),
            })
    }
}
