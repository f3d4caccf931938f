//! Verify v2 wire types

use serde::{Deserialize, Serialize};
use sv_core::domain::Channel;

/// `POST /v2/verify` body
#[derive(Debug, Serialize)]
pub struct StartRequest<'a> {
    pub brand: &'a str,
    pub workflow: Vec<WorkflowStep<'a>>,
}

/// One channel of the workflow, addressed to the user's phone
#[derive(Debug, Serialize)]
pub struct WorkflowStep<'a> {
    pub channel: Channel,
    pub to: &'a str,
}

/// `202` answer to a start request
#[derive(Debug, Deserialize)]
pub struct StartResponse {
    pub request_id: String,
    #[serde(default)]
    pub check_url: Option<String>,
}

/// `POST /v2/verify/{request_id}` body
#[derive(Debug, Serialize)]
pub struct CheckCodeRequest<'a> {
    pub code: &'a str,
}

/// `200` answer to a code check
#[derive(Debug, Deserialize)]
pub struct CheckCodeResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub status: String,
}

/// RFC 7807 problem document returned on every error
#[derive(Debug, Default, Deserialize)]
pub struct Problem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
}

impl Problem {
    /// Parse an error body; anything that is not a problem document yields
    /// an empty one
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Most specific human-readable text: `detail`, then `title`, then the
    /// raw body
    pub fn message(&self, raw_body: &str) -> String {
        fn present(text: &Option<String>) -> Option<&str> {
            text.as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
        }

        present(&self.detail)
            .or_else(|| present(&self.title))
            .map(str::to_string)
            .unwrap_or_else(|| raw_body.trim().to_string())
    }

    /// Whether the problem is a rejected code rather than a failed call
    pub fn is_invalid_code(&self) -> bool {
        let type_matches = self
            .kind
            .as_deref()
            .is_some_and(|kind| kind.ends_with("#invalid-code"));
        let title_matches = self
            .title
            .as_deref()
            .is_some_and(|title| title.eq_ignore_ascii_case("invalid code"));
        type_matches || title_matches
    }
}
