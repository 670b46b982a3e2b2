//! Job-description fetching from known job boards.
//!
//! Outcomes are explicit values: a failed fetch never turns into text that
//! could be scored as if it were a job description.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{info, warn};

/// Shown to users in place of a job description when fetching fails.
pub const FETCH_FAILURE_MESSAGE: &str = "Job description could not be fetched.";

const USER_AGENT: &str = concat!("resume-matcher/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobBoard {
    LinkedIn,
    Indeed,
    Lever,
}

impl JobBoard {
    /// Matches on the URL host; anything unparseable is unsupported.
    pub fn detect(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

        if on("linkedin.com") {
            Some(JobBoard::LinkedIn)
        } else if on("indeed.com") {
            Some(JobBoard::Indeed)
        } else if on("lever.co") {
            Some(JobBoard::Lever)
        } else {
            None
        }
    }

    /// CSS selector for the element holding the description.
    pub fn container_selector(self) -> &'static str {
        match self {
            JobBoard::LinkedIn => "div.description__text",
            JobBoard::Indeed => "div#jobDescriptionText",
            JobBoard::Lever => "div.content",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Fetched { board: JobBoard, text: String },
    UnsupportedSite { url: String },
    ContainerMissing { board: JobBoard },
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            FetchOutcome::Fetched { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Text to display: the description, or [`FETCH_FAILURE_MESSAGE`].
    pub fn display_text(&self) -> &str {
        self.text().unwrap_or(FETCH_FAILURE_MESSAGE)
    }
}

/// Fetches a job description by URL. Implementations never error; every
/// failure is a [`FetchOutcome`] variant.
#[async_trait]
pub trait JobFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Plain HTTP fetcher with a hard per-request deadline.
#[derive(Clone)]
pub struct HttpJobFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpJobFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for job-description fetching")?;
        Ok(Self::with_client(client, timeout))
    }

    /// Uses a caller-built client. `timeout` still bounds the whole fetch,
    /// whatever the client's own settings.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn fetch_html(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl JobFetcher for HttpJobFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let Some(board) = JobBoard::detect(url) else {
            info!("Rejected job-description URL from unsupported site");
            return FetchOutcome::UnsupportedSite {
                url: url.to_string(),
            };
        };

        let outcome = match tokio::time::timeout(self.timeout, self.fetch_html(url)).await {
            Ok(Ok(html)) => match extract_description(&html, board) {
                Some(text) => FetchOutcome::Fetched { board, text },
                None => FetchOutcome::ContainerMissing { board },
            },
            Ok(Err(e)) => FetchOutcome::Failed {
                reason: e.to_string(),
            },
            Err(_) => FetchOutcome::Failed {
                reason: format!("timed out after {:?}", self.timeout),
            },
        };

        match &outcome {
            FetchOutcome::Fetched { text, .. } => {
                info!(board = ?board, chars = text.len(), "Fetched job description")
            }
            other => warn!(board = ?board, outcome = ?other, "Job description fetch failed"),
        }
        outcome
    }
}

/// Text of the board's description container, cleaned. `None` when the
/// container is absent or holds no text.
pub fn extract_description(html: &str, board: JobBoard) -> Option<String> {
    let selector = Selector::parse(board.container_selector()).ok()?;
    let document = Html::parse_document(html);
    let container = document.select(&selector).next()?;
    let raw = container.text().collect::<Vec<_>>().join("\n");
    let cleaned = clean_fetched_text(&raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Trims, turns newlines into spaces and collapses whitespace runs.
pub fn clean_fetched_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_boards() {
        assert_eq!(
            JobBoard::detect("https://www.linkedin.com/jobs/view/123"),
            Some(JobBoard::LinkedIn)
        );
        assert_eq!(
            JobBoard::detect("https://uk.indeed.com/viewjob?jk=abc"),
            Some(JobBoard::Indeed)
        );
        assert_eq!(
            JobBoard::detect("https://jobs.lever.co/acme/42"),
            Some(JobBoard::Lever)
        );
    }

    #[test]
    fn test_rejects_unknown_and_lookalike_hosts() {
        assert_eq!(JobBoard::detect("https://example.com/jobs/1"), None);
        assert_eq!(JobBoard::detect("https://notlinkedin.com/jobs"), None);
        assert_eq!(JobBoard::detect("not a url"), None);
    }

    #[test]
    fn test_extracts_linkedin_container() {
        let html = r#"<html><body>
            <div class="nav">Sign in</div>
            <div class="description__text"><p>Senior Rust Engineer</p>
            <ul><li>Kubernetes</li><li>PostgreSQL</li></ul></div>
        </body></html>"#;
        assert_eq!(
            extract_description(html, JobBoard::LinkedIn).as_deref(),
            Some("Senior Rust Engineer Kubernetes PostgreSQL")
        );
    }

    #[test]
    fn test_extracts_indeed_container_by_id() {
        let html = r#"<div id="jobDescriptionText">Python   developer</div>"#;
        assert_eq!(
            extract_description(html, JobBoard::Indeed).as_deref(),
            Some("Python developer")
        );
    }

    #[test]
    fn test_missing_or_empty_container_is_none() {
        let html = r#"<div class="other">Python</div><div class="content">   </div>"#;
        assert_eq!(extract_description(html, JobBoard::LinkedIn), None);
        assert_eq!(extract_description(html, JobBoard::Lever), None);
    }

    #[test]
    fn test_clean_fetched_text() {
        assert_eq!(clean_fetched_text("  a\nb  \n\n c  "), "a b c");
        assert_eq!(clean_fetched_text(""), "");
    }

    #[test]
    fn test_failure_outcomes_never_expose_text() {
        let outcome = FetchOutcome::ContainerMissing {
            board: JobBoard::Lever,
        };
        assert_eq!(outcome.text(), None);
        assert_eq!(outcome.display_text(), FETCH_FAILURE_MESSAGE);

        let fetched = FetchOutcome::Fetched {
            board: JobBoard::Lever,
            text: "Go developer".to_string(),
        };
        assert_eq!(fetched.display_text(), "Go developer");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(FetchOutcome::UnsupportedSite {
            url: "https://example.com".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "unsupported_site");
        assert_eq!(json["url"], "https://example.com");
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serves one connection on a local port that the returned fetcher
    /// resolves `jobs.lever.co` to.
    async fn lever_fetcher_against(
        response: Option<String>,
        timeout: Duration,
    ) -> (HttpJobFetcher, String) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(raw) => {
                    let _ = socket.write_all(raw.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                // Hold the connection open without answering.
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });

        let client = Client::builder()
            .resolve("jobs.lever.co", addr)
            .no_proxy()
            .build()
            .unwrap();
        let url = format!("http://jobs.lever.co:{}/acme/1", addr.port());
        (HttpJobFetcher::with_client(client, timeout), url)
    }

    #[tokio::test]
    async fn test_silent_server_hits_hard_timeout() {
        let (fetcher, url) = lever_fetcher_against(None, Duration::from_millis(200)).await;
        let started = std::time::Instant::now();
        let outcome = fetcher.fetch(&url).await;

        match outcome {
            FetchOutcome::Failed { reason } => assert!(reason.starts_with("timed out"), "{reason}"),
            other => panic!("expected timeout failure, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_server_error_status_is_failed() {
        let (fetcher, url) = lever_fetcher_against(
            Some(http_response("500 Internal Server Error", "")),
            Duration::from_secs(5),
        )
        .await;
        let outcome = fetcher.fetch(&url).await;

        assert_eq!(outcome.display_text(), FETCH_FAILURE_MESSAGE);
        match outcome {
            FetchOutcome::Failed { reason } => assert!(reason.contains("500"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_successful_fetch_extracts_container() {
        let (fetcher, url) = lever_fetcher_against(
            Some(http_response(
                "200 OK",
                "<div class=\"content\">Rust\n   developer</div>",
            )),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(
            fetcher.fetch(&url).await,
            FetchOutcome::Fetched {
                board: JobBoard::Lever,
                text: "Rust developer".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_site_short_circuits_without_network() {
        let fetcher = HttpJobFetcher::new(Duration::from_secs(1)).unwrap();
        let outcome = fetcher.fetch("https://example.com/job").await;
        assert!(matches!(outcome, FetchOutcome::UnsupportedSite { .. }));
    }
}
