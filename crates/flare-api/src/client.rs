// Controller HTTP client
//
// Wraps `reqwest::Client` with controller-specific URL construction,
// token auth, and response classification. Endpoint modules (net, of)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.
//
// Every method makes exactly one network attempt: no retry, no backoff,
// no caching. Callers that want resilience layer it on top, using
// `Error::is_transient` to decide.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::{self, AuthToken};
use crate::error::Error;
use crate::record::Record;
use crate::transport::TransportConfig;

/// Build a full URL for a controller API path: `{base}/sdn/v2.0/{segments...}`.
///
/// Each segment is appended individually so it is percent-encoded on its
/// own; the separators never are. Datapath IDs and other identifiers can
/// be passed as segments without caller-side escaping.
pub(crate) fn api_url(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut parts) = url.path_segments_mut() {
        parts.pop_if_empty();
        parts.push("sdn").push("v2.0");
        parts.extend(segments);
    }
    url
}

/// Async client for the HPE VAN SDN controller REST API.
///
/// Holds the controller address and auth token; all endpoint methods
/// (topology under `net/`, OpenFlow under `of/`, diagnostics under
/// `diag/`) hang off this one struct. The client is immutable after
/// construction and safe to share across tasks.
#[derive(Debug)]
pub struct FlareClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl FlareClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client around an existing auth token.
    ///
    /// `base_url` is the controller root, e.g. `https://10.44.254.129:8443`.
    /// The token is injected as a sensitive `X-Auth-Token` default header
    /// on every request; it is never logged.
    pub fn with_token(
        base_url: &str,
        token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        let mut token_value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        token_value.set_sensitive(true);
        headers.insert("X-Auth-Token", token_value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url, token })
    }

    /// Authenticate with user/password and build a client around the
    /// resulting token.
    ///
    /// `POST /sdn/v2.0/auth` with `{"login": {"user", "password"}}`.
    pub async fn login(
        base_url: &str,
        user: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let parsed = parse_base_url(base_url)?;
        let http = transport.build_client()?;
        let auth = auth::acquire_token(&http, &parsed, user, password).await?;
        Self::with_token(base_url, auth.token.into(), transport)
    }

    /// Authenticate and return the raw token record without building a
    /// client, e.g. to persist the token for later [`with_token`](Self::with_token) use.
    pub async fn acquire_token(
        base_url: &str,
        user: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<AuthToken, Error> {
        let parsed = parse_base_url(base_url)?;
        let http = transport.build_client()?;
        auth::acquire_token(&http, &parsed, user, password).await
    }

    /// Invalidate this client's token on the controller, consuming the client.
    ///
    /// `DELETE /sdn/v2.0/auth/{token}`
    pub async fn logout(self) -> Result<(), Error> {
        auth::release_token(&self.http, &self.base_url, self.token.expose_secret()).await
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON body.
    pub(crate) async fn get(&self, segments: &[&str]) -> Result<Value, Error> {
        self.get_with_params(segments, &[]).await
    }

    /// Send a GET request with query parameters, in slice order.
    ///
    /// An empty slice appends no `?` at all.
    pub(crate) async fn get_with_params(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<Value, Error> {
        let url = api_url(&self.base_url, segments);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        handle_response(resp).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, Error> {
        let url = api_url(&self.base_url, segments);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    /// Send a PUT request with a JSON body.
    pub(crate) async fn put<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, Error> {
        let url = api_url(&self.base_url, segments);
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        handle_response(resp).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<Value, Error> {
        let url = api_url(&self.base_url, segments);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_response(resp).await
    }

    /// Send a DELETE request with a JSON body.
    ///
    /// A few controller endpoints (flows, LLDP suppression) take the
    /// resources to remove in the DELETE body.
    pub(crate) async fn delete_with_body<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, Error> {
        let url = api_url(&self.base_url, segments);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).json(body).send().await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Classify a response: 2xx parses as JSON (empty body reads as `{}`),
/// 401 is an auth failure, anything else carries status + raw body.
pub(crate) async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "token expired or invalid credentials".into(),
        });
    }

    if status.is_success() {
        let body = resp.text().await.map_err(Error::Transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Controller {
            status: status.as_u16(),
            body,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase));
    }
    Ok(url)
}

// ── Envelope helpers ─────────────────────────────────────────────────

/// Extract a named member from a keyed response body and wrap it.
///
/// Most endpoints envelope their payload under a single key, e.g.
/// `{"datapath": {...}}`. A missing key surfaces as `FieldNotFound`.
pub(crate) fn member(body: Value, field: &str) -> Result<Record, Error> {
    Record::from(body).take(field)
}

/// Extract a named member array and wrap each element.
pub(crate) fn member_list(body: Value, field: &str) -> Result<Vec<Record>, Error> {
    match member(body, field)? {
        Record::Array(items) => Ok(items),
        other => Err(Error::Deserialization {
            message: format!("expected {field:?} to be an array"),
            body: other.to_string(),
        }),
    }
}
