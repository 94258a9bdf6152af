//! HTTP client for the voting backend.

use std::io;
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, Request, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    CandidateLookup, CandidateNumber, Cpf, Eligibility, VoteOutcome, VoteSubmission,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response ({status}): {reason}")]
    UnexpectedResponse { status: u16, reason: String },
    #[error("failed to start request worker: {0}")]
    Worker(#[source] io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The three backend calls the kiosk relies on.
pub trait BallotApi: Send + Sync {
    fn check_cpf(&self, cpf: &Cpf) -> ApiResult<Eligibility>;
    fn candidate_info(&self, number: &CandidateNumber) -> ApiResult<CandidateLookup>;
    fn submit_vote(&self, submission: &VoteSubmission) -> ApiResult<VoteOutcome>;
}

#[derive(Serialize)]
struct VotePayload<'a> {
    cpf: &'a str,
    number: &'a str,
    photo: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn expect_success(status: StatusCode) -> ApiResult<()> {
    if !status.is_success() {
        return Err(ApiError::UnexpectedResponse {
            status: status.as_u16(),
            reason: status_text(status),
        });
    }
    Ok(())
}

/// Message shown when the server turns a vote down.
fn rejection_message(status: StatusCode, body: ErrorBody) -> String {
    body.error.unwrap_or_else(|| status_text(status))
}

/// [`BallotApi`] over a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpBallotApi {
    client: Client,
    base_url: String,
}

impl HttpBallotApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> ApiResult<Response> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.client.get(&url).send()?;
        debug!("GET {url} -> {}", response.status());
        Ok(response)
    }

    fn vote_request(&self, submission: &VoteSubmission) -> ApiResult<Request> {
        let payload = VotePayload {
            cpf: submission.cpf.as_str(),
            number: submission.choice.wire_value(),
            photo: submission.photo.to_data_url(),
        };
        Ok(self.client.post(self.url("/vote")).json(&payload).build()?)
    }
}

impl BallotApi for HttpBallotApi {
    fn check_cpf(&self, cpf: &Cpf) -> ApiResult<Eligibility> {
        let response = self.get(&format!("/api/check-cpf/{cpf}"))?;
        expect_success(response.status())?;
        Ok(response.json()?)
    }

    /// Any non-success status means the number belongs to nobody.
    fn candidate_info(&self, number: &CandidateNumber) -> ApiResult<CandidateLookup> {
        let response = self.get(&format!("/candidate-info/{number}"))?;
        if !response.status().is_success() {
            return Ok(CandidateLookup::NotFound);
        }
        Ok(CandidateLookup::Found(response.json()?))
    }

    fn submit_vote(&self, submission: &VoteSubmission) -> ApiResult<VoteOutcome> {
        let request = self.vote_request(submission)?;
        info!("POST {} (photo {} bytes)", request.url(), submission.photo.len());

        let response = self.client.execute(request)?;
        let status = response.status();
        info!("POST /vote -> {status}");
        if status.is_success() {
            return Ok(VoteOutcome::Accepted);
        }

        let body: ErrorBody = response.json().unwrap_or_default();
        Ok(VoteOutcome::Rejected {
            message: rejection_message(status, body),
        })
    }
}
