//! Backend endpoint parsing and the REST adapter behind `ResourceManager`.
//!
//! parse_endpoint -> validated http(s) base URL
//! ApiClient      -> blocking wrapper around an async reqwest client
//! RestManager<R> -> `ResourceManager<R>` over `<base>/<endpoint>[/<id>]`

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio::runtime::Runtime;
use url::Url;

use crate::resource::{Filters, ResourceManager, ResourceType};

/// Maximum length of response body written to the log.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Parse and validate a backend endpoint. Only http and https are accepted.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Endpoint URL is empty");
    }
    let url = Url::parse(trimmed).with_context(|| format!("Invalid endpoint URL: '{trimmed}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported endpoint scheme '{other}' (expected http or https)"),
    }
}

fn truncate_for_log(body: &str) -> String {
    if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    }
}

/// HTTP client for the backend API. Calls block on an owned runtime; every
/// invocation issues at most a couple of sequential requests.
pub struct ApiClient {
    base_url: Url,
    http: Client,
    runtime: Runtime,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = parse_endpoint(base_url)?;
        let http = Client::builder()
            .user_agent(concat!("resctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        let runtime = Runtime::new().context("Failed to create Tokio runtime")?;

        Ok(Self {
            base_url,
            http,
            runtime,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/<segments...>`; segments are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Endpoint URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the status and raw body.
    fn execute(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, String)> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        self.runtime.block_on(async {
            let response = request.send().await.context("Failed to send request")?;
            let status = response.status();
            let text = response
                .text()
                .await
                .context("Failed to read response body")?;
            Ok::<_, anyhow::Error>((status, text))
        })
    }

    fn check(status: StatusCode, body: &str) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        tracing::error!("API error: {} - {}", status, truncate_for_log(body));
        Err(anyhow!("API request failed: {}", status))
    }

    fn parse_body(body: &str) -> Result<Value> {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(body).context("Failed to parse response JSON")
    }

    /// GET; a 404 yields `None`.
    pub fn get(&self, url: Url, query: &[(&str, &str)], token: Option<&str>) -> Result<Option<Value>> {
        let (status, body) = self.execute(Method::GET, url, query, None, token)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check(status, &body)?;
        Self::parse_body(&body).map(Some)
    }

    pub fn post(&self, url: Url, payload: &Value, token: Option<&str>) -> Result<Value> {
        let (status, body) = self.execute(Method::POST, url, &[], Some(payload), token)?;
        Self::check(status, &body)?;
        Self::parse_body(&body)
    }

    pub fn put(&self, url: Url, payload: &Value, token: Option<&str>) -> Result<Value> {
        let (status, body) = self.execute(Method::PUT, url, &[], Some(payload), token)?;
        Self::check(status, &body)?;
        Self::parse_body(&body)
    }

    pub fn delete(&self, url: Url, token: Option<&str>) -> Result<()> {
        let (status, body) = self.execute(Method::DELETE, url, &[], None, token)?;
        Self::check(status, &body)
    }
}

/// `ResourceManager` backed by the REST API.
pub struct RestManager<R> {
    client: Arc<ApiClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ResourceType> RestManager<R> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn collection(&self) -> Result<Url> {
        let endpoint = R::endpoint();
        self.client.url(&[endpoint.as_str()])
    }

    fn member(&self, id: &str) -> Result<Url> {
        let endpoint = R::endpoint();
        self.client.url(&[endpoint.as_str(), id])
    }

    fn decode_list(value: Value) -> Result<Vec<R>> {
        let Value::Array(items) = value else {
            bail!("Expected a list of {}", R::PLURAL_DISPLAY_NAME.to_lowercase());
        };
        items.into_iter().map(R::from_document).collect()
    }

    fn query(&self, query: &[(&str, &str)], token: Option<&str>) -> Result<Vec<R>> {
        match self.client.get(self.collection()?, query, token)? {
            Some(value) => Self::decode_list(value),
            None => Ok(Vec::new()),
        }
    }

    fn get_member(&self, id: &str, token: Option<&str>) -> Result<Option<R>> {
        self.client
            .get(self.member(id)?, &[], token)?
            .map(R::from_document)
            .transpose()
    }

    fn require_id(instance: &R) -> Result<&str> {
        instance
            .id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("{} has no id", R::DISPLAY_NAME))
    }
}

impl<R: ResourceType> ResourceManager<R> for RestManager<R> {
    fn get_all(&self, filters: &Filters, token: Option<&str>) -> Result<Vec<R>> {
        let query: Vec<(&str, &str)> = filters.iter().collect();
        self.query(&query, token)
    }

    fn get_by_name(&self, name: &str, token: Option<&str>) -> Result<Option<R>> {
        let mut instances = self.query(&[("name", name)], token)?;
        if instances.len() > 1 {
            bail!(
                "More than one {} named \"{}\" are found.",
                R::DISPLAY_NAME.to_lowercase(),
                name
            );
        }
        Ok(instances.pop())
    }

    fn get_by_id(&self, id: &str, token: Option<&str>) -> Result<Option<R>> {
        self.get_member(id, token)
    }

    fn get_by_ref_or_id(&self, ref_or_id: &str, token: Option<&str>) -> Result<Option<R>> {
        self.get_member(ref_or_id, token)
    }

    fn create(&self, instance: &R, token: Option<&str>) -> Result<R> {
        let created = self
            .client
            .post(self.collection()?, &instance.to_document()?, token)?;
        R::from_document(created)
    }

    fn update(&self, instance: &R, token: Option<&str>) -> Result<R> {
        let id = Self::require_id(instance)?;
        let updated = self
            .client
            .put(self.member(id)?, &instance.to_document()?, token)?;
        R::from_document(updated)
    }

    fn delete(&self, instance: &R, token: Option<&str>) -> Result<()> {
        let id = Self::require_id(instance)?;
        self.client.delete(self.member(id)?, token)
    }
}
