use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("CPF must have exactly 11 digits, got {0}")]
    InvalidCpf(usize),
    #[error("Invalid candidate number: {0:?}")]
    InvalidCandidateNumber(String),
    #[error("Vote is incomplete: {0} of 2 digits entered")]
    IncompleteVote(usize),
}

pub type DomainResult<T> = Result<T, DomainError>;
