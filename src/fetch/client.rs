use crate::error::{ContribError, Result};
use crate::fetch::query::build_query_with_cursors;
use crate::fetch::response::GraphqlResponse;
use crate::model::{Cursors, Page};
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, warn};

pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Environment variable holding the pre-issued bearer token.
pub const TOKEN_ENV: &str = "GITHUB_READ_TOKEN";

const USER_AGENT: &str = concat!("contribmap/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer one query round. The paginator only depends on
/// this, so windows can be driven from canned pages in tests.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page_with_cursors(
        &self,
        username: &str,
        from_date: NaiveDate,
        cursors: &Cursors,
    ) -> Result<Page>;

    async fn fetch_page(
        &self,
        username: &str,
        from_date: NaiveDate,
        cursor: Option<&str>,
    ) -> Result<Page> {
        self.fetch_page_with_cursors(username, from_date, &Cursors::shared(cursor))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(token: Option<String>) -> Self {
        Self {
            endpoint: GITHUB_GRAPHQL_ENDPOINT.to_string(),
            token,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// `Authorization` header value. A missing token is sent as `None` and
    /// left for the API to reject.
    pub fn authorization(&self) -> String {
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => format!("Bearer {token}"),
            None => "Bearer None".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

#[derive(Debug)]
pub struct ContributionsClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: String,
}

impl ContributionsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.token.is_none() {
            warn!("no {TOKEN_ENV} token configured; requests will be unauthenticated");
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            authorization: config.authorization(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PageSource for ContributionsClient {
    async fn fetch_page_with_cursors(
        &self,
        username: &str,
        from_date: NaiveDate,
        cursors: &Cursors,
    ) -> Result<Page> {
        let request = build_query_with_cursors(username, from_date, cursors);
        debug!(%username, %from_date, ?cursors, "POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        // GitHub answers auth failures with a bare `{"message": ..}` body
        if !status.is_success() && body.get("errors").is_none() {
            return Err(ContribError::Protocol(body));
        }

        serde_json::from_value::<GraphqlResponse>(body)?.into_page()
    }
}
