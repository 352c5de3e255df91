//! DNS wire codec
//!
//! Translates between the domain `Message` and RFC 1035 wire format using
//! `hickory-proto`. Only A, NS, CNAME, TXT and AAAA records survive a decode;
//! everything else is dropped from the answer, authority and additional
//! sections.

use super::record_type_map::RecordTypeMapper;
use geodns_application::ports::WireCodec;
use geodns_domain::{
    DomainError, Message, Question, RecordData, RecordType, ResourceRecord, ResponseCode,
};
use hickory_proto::op::{
    Message as HickoryMessage, MessageType, OpCode, Query, ResponseCode as HickoryResponseCode,
};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, NS, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use tracing::trace;

pub struct HickoryWireCodec;

impl HickoryWireCodec {
    pub fn new() -> Self {
        Self
    }

    fn to_hickory(message: &Message) -> Result<HickoryMessage, DomainError> {
        let message_type = if message.is_query {
            MessageType::Query
        } else {
            MessageType::Response
        };

        let mut out = HickoryMessage::new(message.id, message_type, op_code(message.opcode));
        out.set_recursion_desired(message.recursion_desired);
        out.set_recursion_available(message.recursion_available);
        out.set_response_code(response_code_to_hickory(message.response_code));

        for question in &message.questions {
            let mut query = Query::new();
            query.set_name(to_name(&question.name)?);
            query.set_query_type(RecordTypeMapper::to_hickory(&question.record_type));
            query.set_query_class(dns_class(question.class));
            out.add_query(query);
        }

        for record in &message.answers {
            if let Some(record) = to_record(record)? {
                out.add_answer(record);
            }
        }
        for record in &message.authorities {
            if let Some(record) = to_record(record)? {
                out.add_name_server(record);
            }
        }
        for record in &message.additional {
            if let Some(record) = to_record(record)? {
                out.add_additional(record);
            }
        }

        Ok(out)
    }

    fn from_hickory(message: &HickoryMessage) -> Message {
        Message {
            id: message.id(),
            is_query: message.message_type() == MessageType::Query,
            opcode: u8::from(message.op_code()),
            recursion_desired: message.recursion_desired(),
            recursion_available: message.recursion_available(),
            response_code: response_code_from_hickory(message.response_code()),
            questions: message
                .queries()
                .iter()
                .map(|query| {
                    Question::new(
                        from_name(query.name()),
                        RecordTypeMapper::from_hickory(query.query_type()),
                    )
                    .with_class(u16::from(query.query_class()))
                })
                .collect(),
            answers: from_records(message.answers()),
            authorities: from_records(message.name_servers()),
            additional: from_records(message.additionals()),
        }
    }
}

impl Default for HickoryWireCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl WireCodec for HickoryWireCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, DomainError> {
        let message = Self::to_hickory(message)?;

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder).map_err(|e| {
            DomainError::MalformedMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Message, DomainError> {
        let message = HickoryMessage::from_vec(bytes).map_err(|e| {
            DomainError::MalformedMessage(format!("Failed to parse DNS message: {}", e))
        })?;

        Ok(Self::from_hickory(&message))
    }
}

fn to_name(name: &str) -> Result<Name, DomainError> {
    if name.is_empty() || name == "." {
        return Ok(Name::root());
    }

    let fqdn = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    };

    Name::from_str(&fqdn)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e)))
}

fn from_name(name: &Name) -> String {
    let text = name.to_utf8();
    match text.trim_end_matches('.') {
        "" => ".".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn to_record(record: &ResourceRecord) -> Result<Option<Record>, DomainError> {
    let rdata = match (record.record_type, &record.data) {
        (RecordType::A, RecordData::Ipv4(ip)) => RData::A(A(*ip)),
        (RecordType::AAAA, RecordData::Ipv6(ip)) => RData::AAAA(AAAA(*ip)),
        (RecordType::NS, RecordData::Name(host)) => RData::NS(NS(to_name(host)?)),
        (RecordType::CNAME, RecordData::Name(target)) => RData::CNAME(CNAME(to_name(target)?)),
        (RecordType::TXT, RecordData::Text(text)) => RData::TXT(TXT::new(vec![text.clone()])),
        (record_type, _) => {
            trace!(name = %record.name, record_type = %record_type, "Skipping record that cannot be encoded");
            return Ok(None);
        }
    };

    Ok(Some(Record::from_rdata(to_name(&record.name)?, record.ttl, rdata)))
}

fn from_records(records: &[Record]) -> Vec<ResourceRecord> {
    records.iter().filter_map(from_record).collect()
}

fn from_record(record: &Record) -> Option<ResourceRecord> {
    let (record_type, data) = match record.data() {
        RData::A(a) => (RecordType::A, RecordData::Ipv4(a.0)),
        RData::AAAA(aaaa) => (RecordType::AAAA, RecordData::Ipv6(aaaa.0)),
        RData::NS(ns) => (RecordType::NS, RecordData::Name(from_name(&ns.0))),
        RData::CNAME(cname) => (RecordType::CNAME, RecordData::Name(from_name(&cname.0))),
        RData::TXT(txt) => {
            let text = txt
                .txt_data()
                .iter()
                .map(|segment| String::from_utf8_lossy(segment))
                .collect::<String>();
            (RecordType::TXT, RecordData::Text(text))
        }
        other => {
            trace!(record_type = ?other.record_type(), "Dropping unsupported record");
            return None;
        }
    };

    Some(ResourceRecord::new(
        from_name(record.name()),
        record_type,
        record.ttl(),
        data,
    ))
}

fn op_code(opcode: u8) -> OpCode {
    match opcode {
        2 => OpCode::Status,
        4 => OpCode::Notify,
        5 => OpCode::Update,
        _ => OpCode::Query,
    }
}

fn dns_class(class: u16) -> DNSClass {
    match class {
        3 => DNSClass::CH,
        4 => DNSClass::HS,
        254 => DNSClass::NONE,
        255 => DNSClass::ANY,
        _ => DNSClass::IN,
    }
}

fn response_code_to_hickory(code: ResponseCode) -> HickoryResponseCode {
    match code {
        ResponseCode::NoError => HickoryResponseCode::NoError,
        ResponseCode::FormatError => HickoryResponseCode::FormErr,
        ResponseCode::ServerFailure => HickoryResponseCode::ServFail,
        ResponseCode::NameError => HickoryResponseCode::NXDomain,
        ResponseCode::NotImplemented => HickoryResponseCode::NotImp,
        ResponseCode::Refused => HickoryResponseCode::Refused,
        ResponseCode::Other(value) => HickoryResponseCode::Unknown(value),
    }
}

fn response_code_from_hickory(code: HickoryResponseCode) -> ResponseCode {
    match code {
        HickoryResponseCode::NoError => ResponseCode::NoError,
        HickoryResponseCode::FormErr => ResponseCode::FormatError,
        HickoryResponseCode::ServFail => ResponseCode::ServerFailure,
        HickoryResponseCode::NXDomain => ResponseCode::NameError,
        HickoryResponseCode::NotImp => ResponseCode::NotImplemented,
        HickoryResponseCode::Refused => ResponseCode::Refused,
        other => ResponseCode::Other(u16::from(other)),
    }
}
