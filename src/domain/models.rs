use std::fmt;

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Number of digits in a CPF.
pub const CPF_LEN: usize = 11;

/// Number of digits in a candidate number.
pub const CANDIDATE_DIGITS: usize = 2;

/// Wire value recorded for a blank vote.
pub const BLANK_VOTE_VALUE: &str = "0";

/// Removes every character that is not an ASCII digit.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A Brazilian voter id: exactly eleven digits, punctuation stripped.
///
/// # Examples
///
/// ```
/// use urna::domain::Cpf;
///
/// let cpf = Cpf::parse("123.456.789-01").unwrap();
/// assert_eq!(cpf.as_str(), "12345678901");
/// assert!(Cpf::parse("1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let digits = digits_only(raw);
        if digits.len() != CPF_LEN {
            return Err(DomainError::InvalidCpf(digits.len()));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Cpf {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two-digit code identifying a candidate on the keypad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateNumber(String);

impl CandidateNumber {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.len() == CANDIDATE_DIGITS && raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::InvalidCandidateNumber(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the voter chose on the keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteChoice {
    Blank,
    Candidate(CandidateNumber),
}

impl VoteChoice {
    /// Value sent to the server in the `number` field.
    pub fn wire_value(&self) -> &str {
        match self {
            VoteChoice::Blank => BLANK_VOTE_VALUE,
            VoteChoice::Candidate(number) => number.as_str(),
        }
    }
}

/// A still frame captured at session start, JPEG encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    jpeg: Vec<u8>,
}

impl Photo {
    pub fn from_jpeg(jpeg: Vec<u8>) -> Self {
        Self { jpeg }
    }

    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    /// Encodes the frame the way a browser canvas would hand it over.
    ///
    /// ```
    /// use urna::domain::Photo;
    ///
    /// let photo = Photo::from_jpeg(vec![0xff, 0xd8, 0xff]);
    /// assert_eq!(photo.to_data_url(), "data:image/jpeg;base64,/9j/");
    /// ```
    pub fn to_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.jpeg))
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Photo({} bytes)", self.jpeg.len())
    }
}

/// Candidate details as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub department: String,
}

/// Result of a candidate lookup. Not finding a candidate is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateLookup {
    Found(CandidateInfo),
    NotFound,
}

/// Server verdict on whether a CPF may vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub allowed: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Everything sent to the server to record a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSubmission {
    pub cpf: Cpf,
    pub choice: VoteChoice,
    pub photo: Photo,
}

/// Server verdict on a submitted vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted,
    Rejected { message: String },
}

/// The voter currently at the kiosk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoterSession {
    pub voter_id: Option<Cpf>,
    pub voter_name: Option<String>,
    pub eligible: bool,
    pub photo: Option<Photo>,
}

impl VoterSession {
    /// Marks the voter as cleared to vote.
    pub fn admit(&mut self, cpf: Cpf, name: Option<String>) {
        self.voter_id = Some(cpf);
        self.voter_name = name;
        self.eligible = true;
    }

    /// Drops the validated id; the photo is only ever taken after admission.
    pub fn revoke(&mut self) {
        self.voter_id = None;
        self.voter_name = None;
        self.eligible = false;
    }
}
