//! # recordcast
//!
//! Real-time aggregation gateway. One radius query fans out to every
//! configured record source; each source's answer is published on a shared
//! event bus tagged with the query's correlation id, and every subscriber
//! receives only the batches carrying its own id.
//!
//! ## Modules
//!
//! - `model`: query, record and envelope types.
//! - `upstream`: the `RecordSource` trait and its HTTP implementation.
//! - `pubsub`: the topic-keyed event bus and correlation-id filtered
//!   subscriptions.
//! - `dispatch`: the query entry point and fire-and-forget source
//!   publishers.
//! - `network`: axum routes (`POST /query`, `GET /subscriptions`,
//!   `GET /health`).
//! - `config`, `logging`: settings loading and tracing setup.

/// Service wiring and lifecycle.
pub mod app;
/// Settings loaded from defaults, file and environment.
pub mod config;
/// Query entry point and source publishers.
pub mod dispatch;
/// Tracing subscriber setup (formatting, filters, sinks).
pub mod logging;
/// Domain types shared by every layer.
pub mod model;
/// HTTP and WebSocket surface.
pub mod network;
/// Event bus: topics, subscriptions, correlation filter.
pub mod pubsub;
/// Upstream record sources.
pub mod upstream;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use app::App;
pub use self::config::Settings;
pub use dispatch::{DispatchSnapshot, Dispatcher, PublishOutcome, SourcePublisher};
pub use model::{Address, CaseDetail, Envelope, Query, QueryArgs, Record};
pub use pubsub::{EventBus, FilteredSubscription, Subscription, RECORDS_IN_RADIUS};
/// Error types and the status-code taxonomy.
pub use recordcast_error::{
    ConfigError, ErrorExt, QueryError, RecvError, StatusCode, TryRecvError, UpstreamError,
};
pub use upstream::{HttpRecordSource, RecordSource, SourceEndpoint};
