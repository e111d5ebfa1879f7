//! HTTP fetching with a timeout and outcome classification.
//!
//! The module uses a trait-based design so the pipeline can run against a
//! real network or a scripted one:
//! - [`Transport`]: issues one GET for a [`ProviderQuery`]
//! - [`ConnectivityProbe`]: answers "are we online?" when a transport fails
//! - [`Fetcher`]: races the transport against a timer and classifies the
//!   result into a body or a [`PipelineError`]
//!
//! There is no automatic retry; retries are issued by the user.

use crate::error::{PipelineError, TransportError};
use crate::models::ProviderQuery;
use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// How much of an error body is kept in logs.
const LOG_BODY_LIMIT: usize = 512;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Issues HTTP GET requests.
pub trait Transport {
    /// Perform the request and read the full body.
    async fn get(&self, query: &ProviderQuery) -> Result<RawResponse, TransportError>;
}

/// Reports whether the network is reachable at all.
pub trait ConnectivityProbe {
    async fn is_online(&self) -> bool;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, query: &ProviderQuery) -> Result<RawResponse, TransportError> {
        let response = self.client.get(query.to_url()).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();
        let body = response.text().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// [`ConnectivityProbe`] that resolves the provider's host name.
///
/// A failed or slow DNS lookup is taken to mean the machine is offline.
#[derive(Debug, Clone)]
pub struct DnsProbe {
    host: String,
    port: u16,
    deadline: Duration,
}

impl DnsProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            deadline: Duration::from_secs(2),
        }
    }

    /// Probe the host of a provider endpoint.
    pub fn for_query(query: &ProviderQuery) -> Self {
        let host = query.endpoint.host_str().unwrap_or("localhost");
        let port = query.endpoint.port_or_known_default().unwrap_or(443);
        Self::new(host, port)
    }
}

impl ConnectivityProbe for DnsProbe {
    async fn is_online(&self) -> bool {
        match timeout(self.deadline, lookup_host((self.host.as_str(), self.port))).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                debug!(host = %self.host, error = %e, "Connectivity probe lookup failed");
                false
            }
            Err(_) => {
                debug!(host = %self.host, "Connectivity probe timed out");
                false
            }
        }
    }
}

/// Runs one request under a deadline and classifies the outcome.
#[derive(Debug)]
pub struct Fetcher<T, C> {
    transport: T,
    probe: C,
    timeout: Duration,
}

impl<T, C> Fetcher<T, C>
where
    T: Transport,
    C: ConnectivityProbe,
{
    pub fn new(transport: T, probe: C, timeout: Duration) -> Self {
        Self {
            transport,
            probe,
            timeout,
        }
    }

    /// Fetch the body of a successful response.
    ///
    /// If the deadline passes first the request future is dropped and
    /// [`PipelineError::Timeout`] is returned; its late completion can never
    /// be observed.
    #[instrument(level = "info", skip_all, fields(url = %query.redacted_url()))]
    pub async fn fetch(&self, query: &ProviderQuery) -> Result<String, PipelineError> {
        let t0 = Instant::now();
        let outcome = timeout(self.timeout, self.transport.get(query)).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        let response = match outcome {
            Err(_) => {
                warn!(elapsed_ms, timeout_ms = self.timeout.as_millis() as u64, "Fetch timed out");
                return Err(PipelineError::Timeout);
            }
            Ok(Err(TransportError::TimedOut)) => {
                warn!(elapsed_ms, "Transport reported a timeout");
                return Err(PipelineError::Timeout);
            }
            Ok(Err(e)) => return Err(self.classify_transport_error(e).await),
            Ok(Ok(response)) => response,
        };

        debug!(
            status = response.status,
            elapsed_ms,
            headers = ?response.headers,
            "Received provider response"
        );

        if (200..300).contains(&response.status) {
            Ok(response.body)
        } else {
            let error = PipelineError::from_status(response.status);
            warn!(
                status = response.status,
                kind = error.kind(),
                body = %truncate_for_log(&response.body, LOG_BODY_LIMIT),
                "Provider returned an error status"
            );
            Err(error)
        }
    }

    async fn classify_transport_error(&self, e: TransportError) -> PipelineError {
        if self.probe.is_online().await {
            warn!(error = %e, "Transport failed while online");
            PipelineError::Unknown(e.to_string())
        } else {
            warn!(error = %e, "Transport failed and network is unreachable");
            PipelineError::NetworkUnavailable
        }
    }
}
