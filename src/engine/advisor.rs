use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Summary of the last few answers sent to the advisor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// Fraction correct, 0..=1.
    pub accuracy: f64,
    #[serde(rename = "averageTime")]
    pub average_time_secs: f64,
    pub current_difficulty: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    /// Unclamped and possibly fractional; rounded and clamped before use.
    pub new_difficulty: f64,
    pub reason: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid advisor response: {0}")]
    InvalidResponse(String),

    #[error("Advisor unavailable: {0}")]
    Unavailable(String),
}

/// External service that recommends a difficulty from recent performance.
pub trait DifficultyAdvisor: Send + Sync {
    fn advise(&self, request: &AdviceRequest) -> Result<Advice, AdvisorError>;
}

/// Local rules: step up 1-2 levels when accurate (and fast), step down when
/// struggling, otherwise hold.
pub struct HeuristicAdvisor;

impl DifficultyAdvisor for HeuristicAdvisor {
    fn advise(&self, request: &AdviceRequest) -> Result<Advice, AdvisorError> {
        let current = request.current_difficulty as i64;
        let (delta, reason) = if request.accuracy >= 0.8 && request.average_time_secs <= 4.0 {
            (2, "Fast and accurate! Stepping up the challenge.")
        } else if request.accuracy >= 0.8 {
            (1, "Great accuracy. Raising the difficulty a little.")
        } else if request.accuracy <= 0.4 && request.average_time_secs >= 8.0 {
            (-2, "Those were tough. Easing off to rebuild momentum.")
        } else if request.accuracy <= 0.4 {
            (-1, "A few misses. Lowering the difficulty slightly.")
        } else {
            (0, "Steady performance. Keeping the current difficulty.")
        };
        Ok(Advice {
            new_difficulty: (current + delta) as f64,
            reason: reason.to_string(),
        })
    }
}

pub fn parse_advice(body: &str) -> Result<Advice, AdvisorError> {
    serde_json::from_str(body)
        .map_err(|e| AdvisorError::InvalidResponse(format!("Failed to parse advice: {e}")))
}

/// Remote advisor speaking JSON over HTTP.
#[cfg(feature = "network")]
pub struct HttpAdvisor {
    url: String,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpAdvisor {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, AdvisorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Unavailable(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            url: url.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[cfg(feature = "network")]
impl DifficultyAdvisor for HttpAdvisor {
    fn advise(&self, request: &AdviceRequest) -> Result<Advice, AdvisorError> {
        let body = serde_json::to_string(request)
            .map_err(|e| AdvisorError::InvalidResponse(format!("Failed to encode request: {e}")))?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisorError::Http(format!("Request timed out after {}s", self.timeout_secs))
                } else {
                    AdvisorError::Http(format!("Request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(AdvisorError::Http(format!(
                "HTTP {} from advisor",
                response.status()
            )));
        }

        let text = response
            .text()
            .map_err(|e| AdvisorError::InvalidResponse(format!("Failed to read body: {e}")))?;
        parse_advice(&text)
    }
}

/// Remote advisor when a URL is configured (and networking is compiled in),
/// otherwise the local heuristic.
pub fn build_advisor(url: Option<&str>, timeout_secs: u64) -> Arc<dyn DifficultyAdvisor> {
    #[cfg(feature = "network")]
    if let Some(url) = url {
        match HttpAdvisor::new(url, timeout_secs) {
            Ok(advisor) => {
                tracing::info!(url, "using remote difficulty advisor");
                return Arc::new(advisor);
            }
            Err(e) => tracing::warn!(error = %e, "falling back to local difficulty advisor"),
        }
    }
    #[cfg(not(feature = "network"))]
    if url.is_some() {
        tracing::warn!(timeout_secs, "advisor URL ignored: built without network support");
    }
    Arc::new(HeuristicAdvisor)
}
