use crate::{
    AppState,
    events::{codec::ERROR_PREFIX, encode_event},
    types::{AppError, Result, SummarizeRequest, SummarizeResponse},
};
use axum::{
    Json,
    body::{Body, Bytes},
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::convert::Infallible;
use tracing::{info, warn};

/// Research and summarize a list of study topics
///
/// With `stream: true` the response body is a sequence of `STATUS:` lines
/// followed by one `RESULT:` or `ERROR:` frame.
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summaries, as JSON or as a text/plain frame stream", body = SummarizeResponse),
        (status = 400, description = "Invalid input or no topics"),
        (status = 500, description = "Internal error")
    ),
    tag = "summarize"
)]
pub async fn summarize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(body) =
        payload.map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {}", e.body_text())))?;
    let request = SummarizeRequest::from_value(&body)?;

    let orchestrator = state.orchestrator_factory.create().await?;

    if !request.wants_stream() {
        let summary = orchestrator.submit(&request.topics).await?;
        return Ok(Json(SummarizeResponse { summary }).into_response());
    }

    info!("Starting streamed submission");
    let mut events = orchestrator.spawn(request.topics);

    let frames = async_stream::stream! {
        while let Some(event) = events.recv().await {
            let terminal = event.is_terminal();
            let frame = encode_event(&event).unwrap_or_else(|e| {
                warn!("Failed to encode event: {}", e);
                format!("{}{}", ERROR_PREFIX, e)
            });
            yield Ok::<_, Infallible>(Bytes::from(frame));
            if terminal {
                break;
            }
        }
    };

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(frames),
    )
        .into_response())
}
