// Token-based authentication
//
// The controller exchanges a user/password pair for an auth token at
// `POST /sdn/v2.0/auth`; the token rides in the `X-Auth-Token` header on
// every subsequent request and is invalidated with
// `DELETE /sdn/v2.0/auth/{token}`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::client::{api_url, handle_response};
use crate::error::Error;

/// An auth token record, as returned by the controller's auth endpoint.
///
/// The controller returns a handful of documented fields plus
/// deployment-specific extras; anything unmodeled lands in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
    /// Expiry as epoch milliseconds.
    #[serde(default, rename = "expirationDate")]
    pub expiration_date: Option<i64>,
    #[serde(default, rename = "userName")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The `{ "record": { ... } }` envelope around [`AuthToken`].
#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    record: AuthToken,
}

/// Exchange a user/password pair for an auth token.
pub(crate) async fn acquire_token(
    http: &reqwest::Client,
    base_url: &Url,
    user: &str,
    password: &SecretString,
) -> Result<AuthToken, Error> {
    let url = api_url(base_url, &["auth"]);
    debug!("logging in at {url}");

    let body = json!({
        "login": {
            "user": user,
            "password": password.expose_secret(),
        }
    });

    let resp = http
        .post(url)
        .json(&body)
        .send()
        .await
        .map_err(Error::Transport)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Authentication {
            message: format!("login failed (HTTP {status}): {body}"),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    let envelope: AuthEnvelope =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })?;

    debug!("login successful");
    Ok(envelope.record)
}

/// Invalidate a token on the controller.
pub(crate) async fn release_token(
    http: &reqwest::Client,
    base_url: &Url,
    token: &str,
) -> Result<(), Error> {
    let url = api_url(base_url, &["auth", token]);
    debug!("logging out");

    let resp = http.delete(url).send().await.map_err(Error::Transport)?;
    handle_response(resp).await?;

    debug!("logout complete");
    Ok(())
}
