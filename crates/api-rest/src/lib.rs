//! # API REST
//!
//! REST API implementation for the OPORD service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, per-session document storage)
//!
//! All order logic lives in `opord-core`; handlers only translate between JSON and core calls.

#![warn(rust_2018_idioms)]

pub mod session;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use opord_core::constants::{
    DEFAULT_CLASSIFICATION, DEFAULT_TIME_ZONE, HIGHER_HQ, UNIT_NAME, UNIT_SHORT, UNIT_TYPE,
};
use opord_core::{
    Enricher, ExportOutcome, OpordConfig, OpordDocument, OpordError, OpordResult, OpordService,
    SlidesExporter, SubordinateUnit,
};

use session::SessionStore;
use types::{
    Advisory, AdvisoryLevel, ExportReq, ExportRes, ExportStatus, FormDefaultsRes, GenerateReq,
    GenerateRes, HealthRes, SubordinateUnitRes,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OpordService>,
    pub exporter: Arc<SlidesExporter>,
    pub sessions: SessionStore,
    /// Whether the export button should be offered at all.
    pub slides_enabled: bool,
}

impl AppState {
    pub fn new(service: OpordService, exporter: SlidesExporter, slides_enabled: bool) -> Self {
        Self {
            service: Arc::new(service),
            exporter: Arc::new(exporter),
            sessions: SessionStore::new(),
            slides_enabled,
        }
    }

    /// Build the collaborators described by `config`.
    ///
    /// Export is offered only when the configured client-secrets file exists.
    pub fn from_config(config: &OpordConfig) -> OpordResult<Self> {
        let service = OpordService::new(Enricher::from_config(&config.ai)?);
        let exporter = SlidesExporter::from_config(&config.slides)?;
        let slides_enabled = config
            .slides
            .credentials_file()
            .is_some_and(|path| path.is_file());
        Ok(Self::new(service, exporter, slides_enabled))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, form_defaults, generate, export),
    components(schemas(
        HealthRes,
        FormDefaultsRes,
        SubordinateUnitRes,
        GenerateReq,
        GenerateRes,
        ExportReq,
        ExportRes,
        ExportStatus,
        Advisory,
        AdvisoryLevel,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/form", get(form_defaults))
        .route("/generate", post(generate))
        .route("/export", post(export))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Current UTC time as a DTG, e.g. `231500Z FEB 2025`.
pub fn default_dtg() -> String {
    Utc::now().format("%d%H%MZ %b %Y").to_string().to_uppercase()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "OPORD REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/form",
    responses(
        (status = 200, description = "Defaults for a blank order form", body = FormDefaultsRes)
    )
)]
/// Defaults and capability flags for building the input form
///
/// The default DTG is the current UTC time. `ai_enabled` and `slides_enabled` tell the client
/// whether to offer enrichment and export.
#[axum::debug_handler]
async fn form_defaults(State(state): State<AppState>) -> Json<FormDefaultsRes> {
    Json(FormDefaultsRes {
        default_dtg: default_dtg(),
        classification: DEFAULT_CLASSIFICATION.into(),
        time_zone: DEFAULT_TIME_ZONE.into(),
        unit_name: UNIT_NAME.into(),
        unit_short: UNIT_SHORT.into(),
        unit_type: UNIT_TYPE.into(),
        higher_hq: HIGHER_HQ.into(),
        subordinate_units: SubordinateUnit::ALL
            .iter()
            .map(|unit| SubordinateUnitRes {
                name: unit.name().into(),
                form_key: unit.form_key().into(),
            })
            .collect(),
        ai_enabled: state.service.ai_available(),
        slides_enabled: state.slides_enabled,
    })
}

#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateReq,
    responses(
        (status = 200, description = "Generated order", body = GenerateRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Generate an order from form fields
///
/// Optionally enriches blank fields first. Enrichment problems never fail the request; they are
/// returned as warning advisories and the affected fields fall back to doctrine text. The
/// generated document is stored in the session for a later export.
///
/// # Errors
/// Returns `500 Internal Server Error` if the document cannot be serialised for the session.
#[axum::debug_handler]
async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateReq>,
) -> Result<Json<GenerateRes>, (StatusCode, &'static str)> {
    let mut advisories = Vec::new();
    if req.use_ai && !state.service.ai_available() {
        advisories.push(Advisory::new(
            AdvisoryLevel::Info,
            "AI enrichment is not configured (OPENAI_API_KEY). Fields were used as entered.",
        ));
    }

    let outcome = state
        .service
        .generate(&req.fields, req.use_ai, req.model.as_deref())
        .await;
    advisories.extend(
        outcome
            .failures
            .iter()
            .map(|f| Advisory::new(AdvisoryLevel::Warning, f.message())),
    );

    let session_id = SessionStore::resolve(req.session_id.as_deref());
    match outcome.order.document.to_json() {
        Ok(json) => state.sessions.store(session_id, json),
        Err(e) => {
            tracing::error!("Store generated document error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    }

    Ok(Json(GenerateRes {
        session_id: session_id.to_string(),
        text: outcome.order.text,
        document: outcome.order.document,
        advisories,
        slides_enabled: state.slides_enabled,
    }))
}

#[utoipa::path(
    post,
    path = "/export",
    request_body = ExportReq,
    responses(
        (status = 200, description = "Export result; see status", body = ExportRes)
    )
)]
/// Export the session's last generated order to Google Slides
///
/// Always answers 200. `status` distinguishes a created presentation, export not being
/// available, a failed Google call, and a session with nothing to export. The stored document is
/// kept after a failure so the export can be retried.
#[axum::debug_handler]
async fn export(State(state): State<AppState>, Json(req): Json<ExportReq>) -> Json<ExportRes> {
    let document = match load_document(&state.sessions, req.session_id.as_deref()) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Export without document: {}", e);
            return Json(ExportRes {
                status: ExportStatus::NothingToExport,
                url: None,
                advisories: vec![Advisory::new(
                    AdvisoryLevel::Warning,
                    "No OPORD found in session. Please generate one first.",
                )],
            });
        }
    };

    let res = match state.exporter.export(&document).await {
        Ok(ExportOutcome::Exported { url, .. }) => ExportRes {
            status: ExportStatus::Exported,
            advisories: vec![Advisory::new(
                AdvisoryLevel::Success,
                format!("Presentation created: {url}"),
            )],
            url: Some(url),
        },
        Ok(ExportOutcome::Unavailable(reason)) => ExportRes {
            status: ExportStatus::NotConfigured,
            url: None,
            advisories: vec![Advisory::new(AdvisoryLevel::Warning, reason.message())],
        },
        Err(e) => {
            tracing::error!("Export to slides error: {:?}", e);
            ExportRes {
                status: ExportStatus::Failed,
                url: None,
                advisories: vec![Advisory::new(
                    AdvisoryLevel::Error,
                    format!("Export to Google Slides failed: {e}"),
                )],
            }
        }
    };
    Json(res)
}

fn load_document(
    sessions: &SessionStore,
    session_id: Option<&str>,
) -> Result<OpordDocument, OpordError> {
    let id = session_id
        .and_then(|s| uuid::Uuid::parse_str(s.trim()).ok())
        .ok_or(OpordError::NothingToExport)?;
    let json = sessions.load(&id).ok_or(OpordError::NothingToExport)?;
    OpordDocument::from_json(&json).map_err(|_| OpordError::NothingToExport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use opord_core::config::SlidesConfig;
    use opord_core::export::credentials::{AccessToken, StaticCredentialProvider};
    use opord_core::export::google::PresentationService;
    use opord_core::export::requests::{Presentation, SlideRequest};
    use opord_core::llm::{CompletionRequest, LlmClient, LlmError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            Err(LlmError::Http("connection refused".into()))
        }
    }

    struct FakeSlides {
        fail: bool,
    }

    #[async_trait]
    impl PresentationService for FakeSlides {
        async fn copy_template(
            &self,
            _token: &AccessToken,
            _template_id: &str,
            _title: &str,
        ) -> OpordResult<String> {
            Ok("copied".into())
        }

        async fn create_presentation(
            &self,
            _token: &AccessToken,
            _title: &str,
        ) -> OpordResult<Presentation> {
            Ok(Presentation {
                presentation_id: "pres-42".into(),
                slides: vec![],
            })
        }

        async fn batch_update(
            &self,
            _token: &AccessToken,
            _presentation_id: &str,
            _requests: &[SlideRequest],
        ) -> OpordResult<()> {
            if self.fail {
                Err(OpordError::SlidesApi {
                    status: 500,
                    body: "backend error".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn offline_state() -> AppState {
        AppState::new(
            OpordService::default(),
            SlidesExporter::from_config(&SlidesConfig::disabled()).unwrap(),
            false,
        )
    }

    fn exporting_state(fail: bool) -> AppState {
        AppState::new(
            OpordService::default(),
            SlidesExporter::new(
                Arc::new(FakeSlides { fail }),
                Arc::new(StaticCredentialProvider::ready("ya29.test")),
                None,
            ),
            true,
        )
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(router(offline_state()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn form_defaults_list_catalog_and_flags() {
        let (status, body) = call(router(offline_state()), "GET", "/form", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["classification"], "UNCLASSIFIED // TRAINING USE ONLY");
        assert_eq!(body["subordinate_units"].as_array().unwrap().len(), 5);
        assert_eq!(body["subordinate_units"][3]["form_key"], "task_weapons");
        assert_eq!(body["ai_enabled"], false);
        assert!(body["default_dtg"].as_str().unwrap().contains('Z'));
    }

    #[tokio::test]
    async fn generate_without_ai_returns_text_and_session() {
        let (status, body) = call(
            router(offline_state()),
            "POST",
            "/generate",
            Some(json!({
                "fields": {"operation_name": "IRON HAWK", "task_1st": "Assault OBJ EAGLE."},
                "use_ai": false
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("IRON HAWK"));
        assert_eq!(
            body["document"]["execution"]["tasks_to_subordinates"]["1st Platoon (Rifle)"],
            "Assault OBJ EAGLE."
        );
        assert!(uuid::Uuid::parse_str(body["session_id"].as_str().unwrap()).is_ok());
        assert!(body["advisories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generate_with_ai_unconfigured_adds_info_advisory() {
        let (_, body) = call(
            router(offline_state()),
            "POST",
            "/generate",
            Some(json!({"fields": {}, "use_ai": true})),
        )
        .await;
        assert_eq!(body["advisories"][0]["level"], "info");
        assert!(body["text"].as_str().unwrap().contains("Not reported."));
    }

    #[tokio::test]
    async fn enrichment_failures_become_warnings_and_text_still_renders() {
        let state = AppState::new(
            OpordService::new(Enricher::new(Arc::new(FailingLlm), "gpt-4o")),
            SlidesExporter::from_config(&SlidesConfig::disabled()).unwrap(),
            false,
        );
        let (status, body) = call(
            router(state),
            "POST",
            "/generate",
            Some(json!({"fields": {"operation_name": "IRON HAWK"}, "use_ai": true})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let advisories = body["advisories"].as_array().unwrap();
        assert_eq!(advisories.len(), 11);
        assert!(advisories.iter().all(|a| a["level"] == "warning"));
        assert!(body["text"]
            .as_str()
            .unwrap()
            .contains("     Purpose:    Not specified."));
    }

    #[tokio::test]
    async fn export_unknown_session_has_nothing_to_export() {
        let (status, body) = call(
            router(offline_state()),
            "POST",
            "/export",
            Some(json!({"session_id": uuid::Uuid::new_v4().to_string()})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "nothing_to_export");
        assert!(body.get("url").is_none());
    }

    async fn generate_then_export(state: AppState) -> Value {
        let app = router(state);
        let (_, generated) = call(
            app.clone(),
            "POST",
            "/generate",
            Some(json!({"fields": {"operation_name": "IRON HAWK"}})),
        )
        .await;
        let session_id = generated["session_id"].clone();
        let (status, body) = call(
            app,
            "POST",
            "/export",
            Some(json!({"session_id": session_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn export_without_configuration_reports_not_configured() {
        let body = generate_then_export(offline_state()).await;
        assert_eq!(body["status"], "not_configured");
        assert!(body["advisories"][0]["message"]
            .as_str()
            .unwrap()
            .contains("GOOGLE_CREDENTIALS_FILE"));
    }

    #[tokio::test]
    async fn export_returns_presentation_url() {
        let body = generate_then_export(exporting_state(false)).await;
        assert_eq!(body["status"], "exported");
        assert_eq!(
            body["url"],
            "https://docs.google.com/presentation/d/pres-42/edit"
        );
    }

    #[tokio::test]
    async fn failed_export_keeps_session_for_retry() {
        let state = exporting_state(true);
        let sessions = state.sessions.clone();
        let app = router(state);

        let (_, generated) = call(
            app.clone(),
            "POST",
            "/generate",
            Some(json!({"fields": {"operation_name": "IRON HAWK"}})),
        )
        .await;
        let session_id = generated["session_id"].as_str().unwrap().to_string();
        let (_, body) = call(
            app,
            "POST",
            "/export",
            Some(json!({"session_id": session_id})),
        )
        .await;

        assert_eq!(body["status"], "failed");
        assert_eq!(body["advisories"][0]["level"], "error");
        let id = uuid::Uuid::parse_str(&session_id).unwrap();
        assert!(sessions.load(&id).is_some());
    }

    #[test]
    fn default_dtg_is_upper_case_zulu() {
        let dtg = default_dtg();
        assert_eq!(dtg, dtg.to_uppercase());
        assert_eq!(&dtg[6..7], "Z");
    }
}
