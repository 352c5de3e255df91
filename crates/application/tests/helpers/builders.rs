use geodns_domain::{Message, Question, RecordType, ResourceRecord, ResponseCode};
use std::net::{Ipv4Addr, SocketAddr};

pub const ROOT: &str = "198.41.0.4";

pub fn server(ip: &str) -> SocketAddr {
    SocketAddr::new(ip.parse().unwrap(), 53)
}

pub fn a(name: &str, ip: &str) -> ResourceRecord {
    ResourceRecord::a(name, 300, ip.parse::<Ipv4Addr>().unwrap())
}

pub fn cname(name: &str, target: &str) -> ResourceRecord {
    ResourceRecord::cname(name, 300, target)
}

pub fn ns(zone: &str, host: &str) -> ResourceRecord {
    ResourceRecord::ns(zone, 172800, host)
}

/// Upstream reply assembled section by section. Id and flags are filled in
/// by the transport when the reply is served.
#[derive(Default)]
pub struct ReplyBuilder {
    rcode: ResponseCode,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
}

impl ReplyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.additional.push(record);
        self
    }

    pub fn build(self) -> Message {
        let mut message = Message::query(0, Question::new(".", RecordType::A), false);
        message.is_query = false;
        message.response_code = self.rcode;
        message.answers = self.answers;
        message.authorities = self.authorities;
        message.additional = self.additional;
        message
    }
}
