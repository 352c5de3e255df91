use crate::dns_message::ResponseCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Unsupported question type: {0}")]
    UnsupportedQuestionType(String),

    #[error("Unsupported opcode: {0}")]
    UnsupportedOpcode(u8),

    #[error("No answer and no authority for {domain}")]
    NoAnswerNoAuthority { domain: String },

    #[error("Referral limit of {hops} queries exceeded resolving {domain}")]
    ReferralLimitExceeded { domain: String, hops: usize },

    #[error("Resolution depth exceeded while chasing {domain}")]
    ResolutionDepthExceeded { domain: String },

    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),
}

impl DomainError {
    /// Failures confined to one upstream server. The referral walk moves on to
    /// the next candidate instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::IoError(_)
                | DomainError::MalformedMessage(_)
                | DomainError::NoAnswerNoAuthority { .. }
        )
    }

    pub fn response_code(&self) -> ResponseCode {
        match self {
            DomainError::MalformedMessage(_) | DomainError::InvalidDomainName(_) => {
                ResponseCode::FormatError
            }
            DomainError::UnsupportedQuestionType(_) | DomainError::UnsupportedOpcode(_) => {
                ResponseCode::NotImplemented
            }
            _ => ResponseCode::ServerFailure,
        }
    }
}
