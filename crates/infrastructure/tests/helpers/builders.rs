use geodns_domain::{Message, RecordType, ResourceRecord};
use std::net::Ipv4Addr;

pub fn a(name: &str, ip: &str) -> ResourceRecord {
    ResourceRecord::a(name, 300, ip.parse::<Ipv4Addr>().unwrap())
}

pub fn cname(name: &str, target: &str) -> ResourceRecord {
    ResourceRecord::cname(name, 300, target)
}

/// Authoritative-style responder: answers with every record owned by the
/// question name that matches the question type or is a CNAME.
pub fn zone(records: Vec<ResourceRecord>) -> impl Fn(&Message) -> Option<Message> + Send + Sync + 'static {
    move |query: &Message| {
        let question = query.first_question()?;
        let mut reply = Message::reply_to(query);
        reply.recursion_available = false;
        reply.answers = records
            .iter()
            .filter(|r| r.name.eq_ignore_ascii_case(&question.name))
            .filter(|r| r.record_type == question.record_type || r.record_type == RecordType::CNAME)
            .cloned()
            .collect();
        Some(reply)
    }
}
