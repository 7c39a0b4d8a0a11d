// Datacenter API HTTP client
//
// Wraps `reqwest::Client` with URL construction, optional basic auth and
// status/body handling for one datacenter. Read endpoints return the raw
// wire models; write endpoints return `()` on any 2xx.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    CheckRequest, RawAggregate, RawCheck, RawClient, RawEvent, RawSilence, RawStash,
    SilenceRequest,
};
use crate::transport::TransportConfig;

/// HTTP basic-auth credentials for a datacenter API.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// HTTP client for a single datacenter's REST API.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct SensuClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<BasicAuth>,
    /// Client-level request timeout, when this client configured one.
    timeout: Option<Duration>,
}

impl SensuClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        auth: Option<BasicAuth>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            auth: None,
            timeout: None,
        })
    }

    /// The datacenter base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Collections ──────────────────────────────────────────────────

    /// `GET /checks`
    pub async fn list_checks(&self) -> Result<Vec<RawCheck>, Error> {
        self.get(&["checks"]).await
    }

    /// `GET /clients`
    pub async fn list_clients(&self) -> Result<Vec<RawClient>, Error> {
        self.get(&["clients"]).await
    }

    /// `GET /events`
    pub async fn list_events(&self) -> Result<Vec<RawEvent>, Error> {
        self.get(&["events"]).await
    }

    /// `GET /aggregates`
    pub async fn list_aggregates(&self) -> Result<Vec<RawAggregate>, Error> {
        self.get(&["aggregates"]).await
    }

    /// `GET /stashes`
    pub async fn list_stashes(&self) -> Result<Vec<RawStash>, Error> {
        self.get(&["stashes"]).await
    }

    /// `GET /silenced`
    pub async fn list_silenced(&self) -> Result<Vec<RawSilence>, Error> {
        self.get(&["silenced"]).await
    }

    // ── Clients ──────────────────────────────────────────────────────

    /// Create or replace a client definition.
    ///
    /// `POST /clients`
    pub async fn update_client(&self, client: &RawClient) -> Result<(), Error> {
        debug!(client = %client.name, "updating client");
        self.post(&["clients"], client).await
    }

    /// `DELETE /clients/{name}`
    pub async fn delete_client(&self, name: &str) -> Result<(), Error> {
        debug!(client = name, "deleting client");
        self.delete(&["clients", name]).await
    }

    // ── Events & results ─────────────────────────────────────────────

    /// Resolve an open event.
    ///
    /// `POST /resolve` with `{"client": "...", "check": "..."}`
    pub async fn resolve_event(&self, client: &str, check: &str) -> Result<(), Error> {
        debug!(client, check, "resolving event");
        self.post(&["resolve"], &json!({ "client": client, "check": check }))
            .await
    }

    /// `DELETE /results/{client}/{check}`
    pub async fn delete_check_result(&self, client: &str, check: &str) -> Result<(), Error> {
        debug!(client, check, "deleting check result");
        self.delete(&["results", client, check]).await
    }

    /// `DELETE /aggregates/{name}`
    pub async fn delete_aggregate(&self, name: &str) -> Result<(), Error> {
        debug!(aggregate = name, "deleting aggregate");
        self.delete(&["aggregates", name]).await
    }

    /// Publish an ad-hoc check request to the check's subscribers.
    ///
    /// `POST /request`
    pub async fn request_check(&self, request: &CheckRequest) -> Result<(), Error> {
        debug!(check = %request.check, "issuing check execution");
        self.post(&["request"], request).await
    }

    // ── Silenced ─────────────────────────────────────────────────────

    /// `POST /silenced`
    pub async fn create_silence(&self, request: &SilenceRequest) -> Result<(), Error> {
        debug!(
            subscription = ?request.subscription,
            check = ?request.check,
            "creating silence"
        );
        self.post(&["silenced"], request).await
    }

    /// `POST /silenced/clear` with `{"id": "..."}`
    pub async fn clear_silence(&self, id: &str) -> Result<(), Error> {
        debug!(id, "clearing silence");
        self.post(&["silenced", "clear"], &json!({ "id": id })).await
    }

    // ── Stashes ──────────────────────────────────────────────────────

    /// `POST /stashes`
    pub async fn create_stash(&self, stash: &RawStash) -> Result<(), Error> {
        debug!(path = %stash.path, "creating stash");
        self.post(&["stashes"], stash).await
    }

    /// `DELETE /stashes/{path}`; the stash path may itself contain `/`.
    pub async fn delete_stash(&self, path: &str) -> Result<(), Error> {
        debug!(path, "deleting stash");
        let mut segments = vec!["stashes"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        self.delete(&segments).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build `{base}/{seg}/{seg}...`, percent-encoding every segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth {
            Some(auth) => {
                builder.basic_auth(&auth.username, Some(auth.password.expose_secret()))
            }
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);

        let resp = self.send(self.request(reqwest::Method::GET, url)).await?;
        let body = self.check_status(resp).await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn post(&self, segments: &[&str], body: &impl Serialize) -> Result<(), Error> {
        let url = self.endpoint(segments)?;
        debug!("POST {}", url);

        let resp = self
            .send(self.request(reqwest::Method::POST, url).json(body))
            .await?;
        self.check_status(resp).await.map(drop)
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.endpoint(segments)?;
        debug!("DELETE {}", url);

        let resp = self.send(self.request(reqwest::Method::DELETE, url)).await?;
        self.check_status(resp).await.map(drop)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    /// `Error::Timeout` when the client-level timeout fired, otherwise
    /// `Error::Transport`.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    /// Return the body on 2xx, or an `Error::Http` carrying the body
    /// (or the canonical reason when the body is empty).
    async fn check_status(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            return Ok(body);
        }

        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_owned()
        } else {
            body
        };
        Err(Error::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> SensuClient {
        SensuClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("http://sensu.local:4567");
        let url = c.endpoint(&["clients", "web 01"]).unwrap();
        assert_eq!(url.as_str(), "http://sensu.local:4567/clients/web%2001");
    }

    #[test]
    fn endpoint_respects_base_path() {
        let c = client("http://proxy.local/sensu/");
        let url = c.endpoint(&["silenced", "clear"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/sensu/silenced/clear");
    }
}
