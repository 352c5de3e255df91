use async_trait::async_trait;
use geodns_application::ports::{TransportResponse, UpstreamTransport, WireCodec};
use geodns_domain::{DomainError, Message, RecordType};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::builders::{ns, server, ReplyBuilder};

/// Codec that ships messages as JSON so tests can script upstream replies
/// without a real wire format.
pub struct JsonWireCodec;

impl WireCodec for JsonWireCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(message).map_err(|e| DomainError::MalformedMessage(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Message, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::MalformedMessage(e.to_string()))
    }
}

#[derive(Clone)]
pub enum Scripted {
    Reply(Message),
    /// Reply whose id does not match the query.
    WrongId(Message),
    Garbage,
    Timeout,
    IoError,
}

type ScriptKey = (SocketAddr, String, RecordType);

/// Upstream servers keyed by (server, question name, question type).
/// Anything not scripted times out.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<ScriptKey, Scripted>>,
    queries: Mutex<Vec<(SocketAddr, String, RecordType, bool)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, server_ip: &str, name: &str, record_type: RecordType, reply: Message) {
        self.script(server_ip, name, record_type, Scripted::Reply(reply));
    }

    pub fn script(&self, server_ip: &str, name: &str, record_type: RecordType, action: Scripted) {
        self.script
            .lock()
            .unwrap()
            .insert((server(server_ip), name.to_string(), record_type), action);
    }

    /// Servers and names queried so far, in order.
    pub fn queries(&self) -> Vec<(SocketAddr, String)> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(server, name, _, _)| (*server, name.clone()))
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn recursion_desired_flags(&self) -> Vec<bool> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, _, rd)| *rd)
            .collect()
    }
}

#[async_trait]
impl UpstreamTransport for ScriptedTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let query: Message = serde_json::from_slice(message_bytes).unwrap();
        let question = query.questions[0].clone();
        self.queries.lock().unwrap().push((
            server,
            question.name.to_string(),
            question.record_type,
            query.recursion_desired,
        ));

        let action = self
            .script
            .lock()
            .unwrap()
            .get(&(server, question.name.to_string(), question.record_type))
            .cloned()
            .unwrap_or(Scripted::Timeout);

        let serve = |mut reply: Message, id: u16| -> Result<TransportResponse, DomainError> {
            reply.id = id;
            reply.is_query = false;
            reply.questions = vec![question.clone()];
            Ok(TransportResponse {
                bytes: serde_json::to_vec(&reply).unwrap(),
                from: server,
            })
        };

        match action {
            Scripted::Reply(reply) => serve(reply, query.id),
            Scripted::WrongId(reply) => serve(reply, query.id.wrapping_add(1)),
            Scripted::Garbage => Ok(TransportResponse {
                bytes: b"\x00\x01garbage".to_vec(),
                from: server,
            }),
            Scripted::Timeout => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
            Scripted::IoError => Err(DomainError::IoError("connection refused".to_string())),
        }
    }
}

/// Upstream that answers every query with a referral to `width` nameservers
/// named under the question, none of them with glue.
pub struct GluelessFanOutTransport {
    width: usize,
    queries: AtomicUsize,
}

impl GluelessFanOutTransport {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamTransport for GluelessFanOutTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let query: Message = serde_json::from_slice(message_bytes).unwrap();
        let name = query.questions[0].name.to_string();

        let mut builder = ReplyBuilder::new();
        for i in 0..self.width {
            builder = builder.authority(ns(&name, &format!("ns{}.{}", i, name)));
        }
        let mut reply = builder.build();
        reply.id = query.id;
        reply.questions = query.questions.clone();

        Ok(TransportResponse {
            bytes: serde_json::to_vec(&reply).unwrap(),
            from: server,
        })
    }
}
