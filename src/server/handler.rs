use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use super::index_page;
use crate::config::{Config, Credentials, PromptLimits};
use crate::error::AnalyzeError;
use crate::github::{parse_repo_url, RepoRef};
use crate::model::{AnalysisRequest, AnalysisResult};
use crate::pipeline::Analyzer;

/// Headers attached to every response, including pre-flight.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
];

/// Transport-independent response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn new(status: u16, content_type: Option<&str>, body: Vec<u8>) -> Self {
        let mut headers: Vec<(String, String)> = CORS_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(ct) = content_type {
            headers.push(("Content-Type".to_string(), ct.to_string()));
        }
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn preflight() -> Self {
        Self::new(200, None, Vec::new())
    }

    pub fn html(page: &str) -> Self {
        Self::new(200, Some("text/html; charset=utf-8"), page.as_bytes().to_vec())
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, Some("application/json"), body),
            Err(e) => {
                error!("failed to serialize response: {}", e);
                Self::error(&AnalyzeError::Internal(e.to_string()))
            }
        }
    }

    pub fn error(err: &AnalyzeError) -> Self {
        Self::error_message(err.status(), err.kind(), &err.to_string())
    }

    pub fn error_message(status: u16, kind: &str, message: &str) -> Self {
        let body = json!({ "error": message, "kind": kind }).to_string();
        Self::new(status, Some("application/json"), body.into_bytes())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Request handling for the analysis endpoint and the UI page.
///
/// Holds `None` in place of the analyzer when credentials were missing at
/// startup; analysis requests then fail with a configuration error.
pub struct AnalyzeService {
    web_host: String,
    analyzer: Option<Analyzer>,
    page: String,
}

impl AnalyzeService {
    pub fn new(web_host: impl Into<String>, analyzer: Option<Analyzer>) -> Self {
        Self {
            web_host: web_host.into(),
            analyzer,
            page: index_page(PromptLimits::default().file_badges),
        }
    }

    /// Render the UI with a different file-badge bound.
    pub fn with_file_badges(mut self, file_badges: usize) -> Self {
        self.page = index_page(file_badges);
        self
    }

    pub fn from_config(config: &Config, credentials: &Credentials) -> anyhow::Result<Self> {
        let analyzer = match credentials.pair() {
            Some((token, key)) => {
                Some(Analyzer::from_config(config, token.clone(), key.clone())?)
            }
            None => {
                warn!(
                    "{} and {} must both be set; analysis requests will fail until they are",
                    config.github.token_env, config.llm.api_key_env
                );
                None
            }
        };
        Ok(Self::new(config.github.web_host.clone(), analyzer)
            .with_file_badges(config.limits.file_badges))
    }

    pub fn is_configured(&self) -> bool {
        self.analyzer.is_some()
    }

    pub async fn handle(&self, method: &str, path: &str, body: &[u8]) -> HttpResponse {
        // Pre-flight short-circuits before routing or validation.
        if method.eq_ignore_ascii_case("OPTIONS") {
            return HttpResponse::preflight();
        }

        let path = path.split(['?', '#']).next().unwrap_or("");
        let method = method.to_ascii_uppercase();

        match (method.as_str(), path) {
            ("GET", "/") | ("GET", "/index.html") => HttpResponse::html(&self.page),
            ("POST", "/analyze") | ("POST", "/analyze-repo") => self.analyze(body).await,
            (_, "/" | "/index.html" | "/analyze" | "/analyze-repo") => {
                HttpResponse::error_message(405, "method_not_allowed", "Method not allowed")
            }
            _ => HttpResponse::error_message(404, "not_found", "Not found"),
        }
    }

    pub async fn analyze(&self, body: &[u8]) -> HttpResponse {
        match self.run(body).await {
            Ok(result) => HttpResponse::json(200, &result),
            Err(e) => HttpResponse::error(&e),
        }
    }

    async fn run(&self, body: &[u8]) -> Result<AnalysisResult, AnalyzeError> {
        let repo = parse_request(body, &self.web_host)?;
        let analyzer = self.analyzer.as_ref().ok_or_else(|| {
            error!("rejecting analysis of {}: credentials are not configured", repo);
            AnalyzeError::Configuration
        })?;
        analyzer.analyze(&repo).await
    }
}

/// Validate the request body and extract the repository reference.
pub fn parse_request(body: &[u8], web_host: &str) -> Result<RepoRef, AnalyzeError> {
    let request: AnalysisRequest =
        serde_json::from_slice(body).map_err(|_| AnalyzeError::MALFORMED_BODY)?;

    let url = match request.repo_url {
        None => return Err(AnalyzeError::MISSING_URL),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
            return Err(AnalyzeError::MISSING_URL)
        }
        Some(serde_json::Value::String(s)) => s,
        Some(_) => return Err(AnalyzeError::INVALID_URL),
    };

    parse_repo_url(&url, web_host).ok_or(AnalyzeError::INVALID_URL)
}
