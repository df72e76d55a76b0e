// Status endpoint HTTP client
//
// Wraps `reqwest::Client` with the endpoint URL and response checking.
// The endpoint returns a bare JSON array (no envelope); anything other
// than a 2xx answer is a failed fetch.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::SiteStatusRecord;
use crate::transport::TransportConfig;

/// Raw HTTP client for the site status endpoint.
pub struct StatusClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl StatusClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `endpoint` is the full URL of the status resource, e.g.
    /// `https://localhost:44325/api/Sites/SiteIPStatus`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            timeout: transport.timeout,
        })
    }

    /// The status endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the full site status list.
    pub async fn fetch_site_status(&self) -> Result<Vec<SiteStatusRecord>, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .map_or_else(|| body.clone(), str::to_owned),
            });
        }

        let records: Vec<SiteStatusRecord> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        debug!(records = records.len(), "site status fetched");
        Ok(records)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}
