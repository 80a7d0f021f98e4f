//! Natural-language trip summary from a generative text API.

use crate::http::{build_client, send_json};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for a Gemini-style `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl SummaryClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Send a single prompt and return the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let request = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);
        let response: GenerateResponse = send_json(request)
            .await
            .context("summary generation failed")?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .context("summary response contained no text")
    }
}
