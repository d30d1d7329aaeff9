use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::{FetchError, Result};
use crate::responses::{self, Extraction};

pub const API_KEY_HEADER: &str = "x-apisports-key";
const TEAMS_ENDPOINT: &str = "teams";
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const MAX_BACKOFF_DOUBLINGS: u32 = 6;

pub struct ApiSportsClient {
    http: Client,
    base_url: Url,
    api_key: String,
    retries: u32,
    retry_delay: Duration,
}

impl ApiSportsClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            retries: settings.retries,
            retry_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetch the teams of one country and extract `{name, logo}` records.
    pub async fn teams(&self, country: &str) -> Result<Extraction> {
        let body = self.get(TEAMS_ENDPOINT, &[("country", country)]).await?;
        responses::extract_teams(body)
    }

    /// GET an endpoint and parse the body as JSON, retrying transient failures.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.endpoint_url(endpoint)?;
        let mut attempt = 1;

        loop {
            debug!(%url, attempt, "sending request");

            match self.get_once(&url, query).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt <= self.retries && is_transient(&err) => {
                    let delay = self.retry_delay * 2u32.pow((attempt - 1).min(MAX_BACKOFF_DOUBLINGS));
                    warn!(attempt, error = %err, ?delay, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once(&self, url: &Url, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "response received");

        if !status.is_success() {
            return Err(FetchError::ApiError {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(FetchError::InvalidJson)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(endpoint)
            .map_err(|_| FetchError::InvalidUrl(format!("{base}{endpoint}")))
    }
}

/// Failures worth another attempt: timeouts, connection errors and 5xx.
fn is_transient(err: &FetchError) -> bool {
    match err {
        FetchError::Http(e) => e.is_timeout() || e.is_connect(),
        FetchError::ApiError { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s.is_server_error())
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(base_url: &str, retries: u32) -> Settings {
        Settings {
            api_key: "test-key".to_string(),
            country: "Belgium".to_string(),
            output_path: PathBuf::from("unused.json"),
            base_url: Url::parse(base_url).unwrap(),
            timeout: Some(Duration::from_secs(5)),
            retries,
        }
    }

    fn client_for(server: &MockServer, retries: u32) -> ApiSportsClient {
        ApiSportsClient::new(&settings_for(&server.uri(), retries))
            .unwrap()
            .with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_sends_key_header_and_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(query_param("country", "Belgium"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": [{"team": {"name": "Club Brugge", "logo": "http://x/1.png"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let extraction = client_for(&server, 0).teams("Belgium").await.unwrap();
        match extraction {
            Extraction::Teams { teams, skipped } => {
                assert_eq!(teams.len(), 1);
                assert_eq!(teams[0].name, "Club Brugge");
                assert_eq!(skipped, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 2).teams("Belgium").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::ApiError { status: 403, ref message } if message == "forbidden"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, 0).teams("Belgium").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 0).teams("Belgium").await.unwrap_err();
        assert!(matches!(err, FetchError::ApiError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let extraction = client_for(&server, 2).teams("Belgium").await.unwrap();
        assert!(matches!(extraction, Extraction::NoData { .. }));
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server, 2).teams("Belgium").await.unwrap_err();
        assert!(matches!(err, FetchError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .expect(2)
            .mount(&server)
            .await;

        let settings = Settings {
            timeout: Some(Duration::from_millis(200)),
            ..settings_for(&server.uri(), 1)
        };
        let client = ApiSportsClient::new(&settings)
            .unwrap()
            .with_retry_delay(Duration::from_millis(1));

        let err = client.teams("Belgium").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_connect_errors_are_retried() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ApiSportsClient::new(&settings_for(&format!("http://127.0.0.1:{port}"), 2))
            .unwrap()
            .with_retry_delay(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let err = client.teams("Belgium").await.unwrap_err();

        assert!(matches!(err, FetchError::Http(ref e) if e.is_connect()));
        // two backoff sleeps: 50 ms then 100 ms
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = ApiSportsClient::new(&settings_for("https://proxy.example.com/v3", 0)).unwrap();
        assert_eq!(
            client.endpoint_url("teams").unwrap().as_str(),
            "https://proxy.example.com/v3/teams"
        );

        let client = ApiSportsClient::new(&settings_for("https://v3.football.api-sports.io", 0)).unwrap();
        assert_eq!(
            client.endpoint_url("teams").unwrap().as_str(),
            "https://v3.football.api-sports.io/teams"
        );
    }
}
