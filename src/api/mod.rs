//! HTTP API Handlers and Routes
//!
//! The REST layer of the digest server, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers
//! - [`api::routes`](crate::api::routes) - Router configuration
//!
//! # API Endpoints
//!
//! - `POST /api/summarize` - Research and summarize topics, as one JSON envelope
//!   or as a progressive `text/plain` frame stream
//! - `GET /api/openapi.json` - OpenAPI document
//! - `GET /health` - Health check (mounted by the binary)

use crate::types::{SubmissionResult, SummarizeRequest, SummarizeResponse, TopicResult};
use utoipa::OpenApi;

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI document for the public endpoints
#[derive(OpenApi)]
#[openapi(
    paths(handlers::summarize::summarize),
    components(schemas(SummarizeRequest, SummarizeResponse, SubmissionResult, TopicResult)),
    tags((name = "summarize", description = "Topic research and summarization"))
)]
pub struct ApiDoc;
