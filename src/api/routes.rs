use crate::AppState;
use crate::api::ApiDoc;
use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/summarize",
            post(crate::api::handlers::summarize::summarize),
        )
        .route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
