use super::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: u16,
}

impl Question {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            class: CLASS_IN,
        }
    }

    pub fn with_class(mut self, class: u16) -> Self {
        self.class = class;
        self
    }

    /// A-type question used to chase aliases and nameserver host names.
    pub fn a(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, RecordType::A)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}
