use serde_json::Value;

/// A provider response as captured by the transport, before any judgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: Some(text.into()),
        }
    }
}

/// Classifies a raw response as usable JSON or a failure, regardless of what the JSON holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator {
    verbose: bool,
}

impl ResponseValidator {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn validate(&self, response: Option<&RawResponse>) -> Option<Value> {
        let Some(response) = response else {
            tracing::error!("Provider request failed: response undefined");
            return None;
        };

        if response.status != 200 {
            tracing::error!(
                status = response.status,
                "Provider request failed with status {}: {}",
                response.status,
                self.excerpt(response.text.as_deref().unwrap_or_default()),
            );
            return None;
        }

        // Some upstream error paths answer 200 with nothing in the body.
        let text = response.text.as_deref().filter(|t| !t.is_empty())?;

        match serde_json::from_str(text) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::error!("Provider response parse error: {}", e);
                None
            }
        }
    }

    pub(crate) fn excerpt(&self, body: &str) -> String {
        if self.verbose {
            body.to_string()
        } else {
            truncate_body(body)
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
