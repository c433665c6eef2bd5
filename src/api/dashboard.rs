use crate::api::error::DashboardError;
use crate::api::query::{query, query_reply};
use crate::api::transport::{HttpTransport, Transport};
use crate::api::types::{
    Build, BugUpdate, Crash, FailedRepro, LogEntry, PollRequest, PollResponse,
};
use crate::config::config::DashboardConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub const METHOD_UPLOAD_BUILD: &str = "upload_build";
pub const METHOD_REPORT_CRASH: &str = "report_crash";
pub const METHOD_REPORT_FAILED_REPRO: &str = "report_failed_repro";
pub const METHOD_LOG_ERROR: &str = "log_error";
pub const METHOD_POLL: &str = "reporting_poll";
pub const METHOD_UPDATE_BUG: &str = "reporting_update";

/// Client for the dashboard API.
///
/// Identity is fixed at construction, so one instance can serve concurrent
/// calls from many tasks.
#[derive(Debug)]
pub struct Dashboard<T = HttpTransport> {
    client: String,
    addr: String,
    key: SecretString,
    transport: T,
}

impl Dashboard<HttpTransport> {
    pub fn new(client: impl Into<String>, addr: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_transport(client, addr, key, HttpTransport::default())
    }

    pub fn from_config(config: &DashboardConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(
            config.client.clone(),
            config.addr.clone(),
            config.key.expose_secret().to_owned(),
            transport,
        ))
    }
}

impl<T: Transport> Dashboard<T> {
    pub fn with_transport(
        client: impl Into<String>,
        addr: impl Into<String>,
        key: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            client: client.into(),
            addr: addr.into(),
            key: SecretString::from(key.into()),
            transport,
        }
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn call<Req>(&self, method: &str, req: &Req) -> Result<(), DashboardError>
    where
        Req: Serialize + ?Sized,
    {
        query(
            &self.transport,
            &self.client,
            &self.addr,
            self.key.expose_secret(),
            method,
            Some(req),
        )
        .await
    }

    async fn call_reply<Req, Resp>(&self, method: &str, req: &Req) -> Result<Resp, DashboardError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        query_reply(
            &self.transport,
            &self.client,
            &self.addr,
            self.key.expose_secret(),
            method,
            Some(req),
        )
        .await
    }

    pub async fn upload_build(&self, build: &Build) -> Result<(), DashboardError> {
        self.call(METHOD_UPLOAD_BUILD, build).await
    }

    pub async fn report_crash(&self, crash: &Crash) -> Result<(), DashboardError> {
        self.call(METHOD_REPORT_CRASH, crash).await
    }

    pub async fn report_failed_repro(&self, repro: &FailedRepro) -> Result<(), DashboardError> {
        self.call(METHOD_REPORT_FAILED_REPRO, repro).await
    }

    /// Centralized logging on the dashboard. Best-effort: failures are only
    /// traced locally and never returned.
    ///
    /// ```ignore
    /// dash.log_error("ci-upstream", format!("failed to build kernel: {}", err)).await;
    /// ```
    pub async fn log_error(&self, name: &str, msg: impl Into<String>) {
        let entry = LogEntry {
            name: name.to_string(),
            text: msg.into(),
        };

        if let Err(err) = self.call(METHOD_LOG_ERROR, &entry).await {
            warn!("dropped dashboard log entry from {}: {}", name, err);
        }
    }

    /// Asks for bug reports of the given type that are pending external reporting.
    pub async fn poll(&self, req: &PollRequest) -> Result<PollResponse, DashboardError> {
        self.call_reply(METHOD_POLL, req).await
    }

    pub async fn update_bug(&self, update: &BugUpdate) -> Result<(), DashboardError> {
        self.call(METHOD_UPDATE_BUG, update).await
    }
}
