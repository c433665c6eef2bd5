//! Client for the syzkaller dashboard API: typed records for builds, crashes
//! and bug reports, and a [`Dashboard`] that POSTs them as JSON.

pub mod api;
pub mod config;

pub use api::dashboard::Dashboard;
pub use api::error::DashboardError;
pub use api::query::{query, query_reply};
pub use api::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use api::types::{
    BugReport, BugStatus, BugUpdate, Build, Crash, FailedRepro, LogEntry, PollRequest,
    PollResponse, ReproLevel,
};
