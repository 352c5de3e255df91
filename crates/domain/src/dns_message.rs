use super::{Question, ResourceRecord};
use serde::{Deserialize, Serialize};

pub const OPCODE_QUERY: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Other(u16),
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormatError => "FORMERR",
            ResponseCode::ServerFailure => "SERVFAIL",
            ResponseCode::NameError => "NXDOMAIN",
            ResponseCode::NotImplemented => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u16,
    pub is_query: bool,
    pub opcode: u8,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub response_code: ResponseCode,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Message {
    /// Outbound query carrying a single question.
    pub fn query(id: u16, question: Question, recursion_desired: bool) -> Self {
        Self {
            id,
            is_query: true,
            opcode: OPCODE_QUERY,
            recursion_desired,
            recursion_available: false,
            response_code: ResponseCode::NoError,
            questions: vec![question],
            answers: Vec::new(),
            authorities: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Empty response mirroring the request header and its first question.
    pub fn reply_to(request: &Message) -> Self {
        Self {
            id: request.id,
            is_query: false,
            opcode: request.opcode,
            recursion_desired: request.recursion_desired,
            recursion_available: true,
            response_code: ResponseCode::NoError,
            questions: request.questions.iter().take(1).cloned().collect(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additional: Vec::new(),
        }
    }

    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn is_standard_query(&self) -> bool {
        self.opcode == OPCODE_QUERY
    }

    /// Appends `record` unless an answer with the same owner name is already
    /// present. Returns whether the record was added.
    pub fn merge_answer(&mut self, record: ResourceRecord) -> bool {
        if self.answers.iter().any(|existing| existing.name == record.name) {
            return false;
        }
        self.answers.push(record);
        true
    }
}
