//! # API REST
//!
//! REST API for GUIA.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, PDF download headers, CORS)
//!
//! Uses `api-shared` for request/response types and `guia-core` for all business logic.

#![warn(rust_2018_idioms)]

mod error;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AuthorityReq, AuthorityRes, ErrorRes, FormContextRes, GenerateGuideReq, GuideErrorRes,
    HealthRes, HealthService,
};
use guia_core::constants::DOWNLOAD_FILE_NAME;
use guia_core::{GuideForm, GuideService};

pub use error::{ApiError, ApiResult};

/// Application state shared across REST API handlers
///
/// Holds the guide service, which owns the immutable record store loaded at start-up.
#[derive(Clone)]
pub struct AppState {
    pub guide_service: GuideService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, form_context, generate_guide, authority),
    components(schemas(
        HealthRes,
        FormContextRes,
        GenerateGuideReq,
        GuideErrorRes,
        AuthorityReq,
        AuthorityRes,
        ErrorRes
    ))
)]
struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/form-context", get(form_context))
        .route("/guides", post(generate_guide))
        .route("/authority", post(authority))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports liveness and the number of asset records loaded.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.guide_service.store().len()))
}

#[utoipa::path(
    get,
    path = "/form-context",
    responses(
        (status = 200, description = "Sections available in the asset table", body = FormContextRes)
    )
)]
/// Distinct origin and destination sections, used to populate the form choices.
#[axum::debug_handler]
async fn form_context(State(state): State<AppState>) -> Json<FormContextRes> {
    Json(state.guide_service.form_context().into())
}

#[utoipa::path(
    post,
    path = "/guides",
    request_body = GenerateGuideReq,
    responses(
        (status = 200, description = "Movement guide as a PDF attachment"),
        (status = 400, description = "A required field is missing", body = GuideErrorRes),
        (status = 404, description = "No asset matched the identifiers", body = GuideErrorRes),
        (status = 422, description = "Text cannot be written to the PDF", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Generate a movement guide
///
/// Looks up the submitted asset identifiers, renders the guide and returns it as a download.
/// The file is also kept under the configured output directory with a per-request name.
///
/// # Errors
/// - `400` with the form context if any field is missing
/// - `404` with the form context if no asset matched
/// - `422` if a character cannot be encoded
/// - `500` if the guide cannot be written
#[axum::debug_handler]
async fn generate_guide(
    State(state): State<AppState>,
    Json(req): Json<GenerateGuideReq>,
) -> ApiResult<Response> {
    let form: GuideForm = req.into();
    let guide = state
        .guide_service
        .generate(&form)
        .map_err(|e| ApiError::from_guide(e, || state.guide_service.form_context()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
        ),
    ];
    Ok((headers, guide.pdf).into_response())
}

#[utoipa::path(
    post,
    path = "/authority",
    request_body = AuthorityReq,
    responses(
        (status = 200, description = "First authority recorded for the section, or empty", body = AuthorityRes),
        (status = 400, description = "Role is not origin or destination", body = ErrorRes)
    )
)]
/// Look up the authority for a section
///
/// Returns the first non-missing authority recorded for the section on the given side of the
/// movement. A section without one yields an empty string.
#[axum::debug_handler]
async fn authority(
    State(state): State<AppState>,
    Json(req): Json<AuthorityReq>,
) -> ApiResult<Json<AuthorityRes>> {
    let section = req.section.unwrap_or_default();
    let role = req.role.unwrap_or_default();
    let authority = state
        .guide_service
        .authority(&section, &role)
        .map_err(|e| ApiError::from_guide(e, || state.guide_service.form_context()))?;
    Ok(Json(AuthorityRes { authority }))
}
