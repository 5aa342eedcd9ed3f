//! HTTP handlers for report endpoints.
//!
//! These handlers connect Axum routes to the reporting query and command
//! handlers. Every handler takes [`RequireReportAdmin`] as its first
//! extractor so unauthorized callers are rejected before any input is read.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireReportAdmin;
use crate::application::handlers::reporting::{
    ExportFormat, ExportReportHandler, ExportReportQuery, GenerateReportHandler,
    GetReportSettingsHandler, GetReportSettingsQuery, ReportSettings, UpdateRecipientCommand,
    UpdateRecipientHandler,
};
use crate::domain::foundation::DomainError;
use crate::domain::reporting::ReportError;
use crate::ports::{RecordSource, ReportExporter, ReportSettingsStore};

use super::dto::{
    CsvQueryParams, RecipientResponse, ReportQueryParams, ReportResponse,
    ReportSettingsResponse, UpdateRecipientRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the report routes.
///
/// Cloned for each request; all dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct ReportsAppState {
    pub record_source: Arc<dyn RecordSource>,
    pub settings_store: Arc<dyn ReportSettingsStore>,
    pub exporter: Arc<dyn ReportExporter>,
    pub report_settings: ReportSettings,
}

impl ReportsAppState {
    pub fn new(
        record_source: Arc<dyn RecordSource>,
        settings_store: Arc<dyn ReportSettingsStore>,
        exporter: Arc<dyn ReportExporter>,
        report_settings: ReportSettings,
    ) -> Self {
        Self {
            record_source,
            settings_store,
            exporter,
            report_settings,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn generate_report_handler(&self) -> GenerateReportHandler {
        GenerateReportHandler::new(self.record_source.clone(), self.report_settings)
    }

    pub fn export_report_handler(&self) -> ExportReportHandler {
        ExportReportHandler::new(
            Arc::new(self.generate_report_handler()),
            self.exporter.clone(),
        )
    }

    pub fn get_settings_handler(&self) -> GetReportSettingsHandler {
        GetReportSettingsHandler::new(self.settings_store.clone(), self.report_settings)
    }

    pub fn update_recipient_handler(&self) -> UpdateRecipientHandler {
        UpdateRecipientHandler::new(self.settings_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/reports/subscriptions - Monthly report as JSON
pub async fn get_report(
    RequireReportAdmin(_user): RequireReportAdmin,
    State(state): State<ReportsAppState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<impl IntoResponse, ReportApiError> {
    let report = state.generate_report_handler().handle(params.into()).await?;
    Ok(Json(ReportResponse::from(&report)))
}

/// GET /api/reports/subscriptions/html - Monthly report as an HTML table
pub async fn get_report_html(
    RequireReportAdmin(_user): RequireReportAdmin,
    State(state): State<ReportsAppState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Response, ReportApiError> {
    let query = ExportReportQuery {
        range: params.into(),
        format: ExportFormat::Html,
    };
    let exported = state.export_report_handler().handle(query).await?;

    Ok(([(header::CONTENT_TYPE, exported.content_type)], exported.body).into_response())
}

/// GET /api/reports/subscriptions/csv - Monthly report as a CSV download
pub async fn get_report_csv(
    RequireReportAdmin(user): RequireReportAdmin,
    State(state): State<ReportsAppState>,
    Query(params): Query<CsvQueryParams>,
) -> Result<Response, ReportApiError> {
    let query = ExportReportQuery {
        range: params.range(),
        format: ExportFormat::Csv(params.layout()),
    };
    let exported = state.export_report_handler().handle(query).await?;
    tracing::info!(user_id = %user.id, bytes = exported.body.len(), "Report CSV exported");

    let disposition = match exported.filename {
        Some(name) => format!("attachment; filename=\"{}\"", name),
        None => "inline".to_string(),
    };

    Ok((
        [
            (header::CONTENT_TYPE, exported.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    )
        .into_response())
}

/// GET /api/reports/settings - Current report settings
pub async fn get_settings(
    RequireReportAdmin(_user): RequireReportAdmin,
    State(state): State<ReportsAppState>,
) -> Result<impl IntoResponse, ReportApiError> {
    let view = state.get_settings_handler().handle(GetReportSettingsQuery).await?;
    Ok(Json(ReportSettingsResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (PUT endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// PUT /api/reports/settings/recipient - Replace the monthly report recipient
pub async fn update_recipient(
    RequireReportAdmin(user): RequireReportAdmin,
    State(state): State<ReportsAppState>,
    Json(request): Json<UpdateRecipientRequest>,
) -> Result<impl IntoResponse, ReportApiError> {
    let cmd = UpdateRecipientCommand {
        email: request.email,
    };
    let email = state.update_recipient_handler().handle(cmd).await?;
    tracing::info!(user_id = %user.id, "Report recipient changed via API");

    Ok(Json(RecipientResponse::from(email)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts report errors to HTTP responses.
#[derive(Debug)]
pub struct ReportApiError(ReportError);

impl From<ReportError> for ReportApiError {
    fn from(err: ReportError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ReportApiError {
    fn from(err: DomainError) -> Self {
        Self(ReportError::from(err))
    }
}

impl IntoResponse for ReportApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            ReportError::InvalidDateRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE"),
            ReportError::InvalidRecipient(_) => (StatusCode::BAD_REQUEST, "INVALID_RECIPIENT"),
            ReportError::MailDelivery(_) => (StatusCode::BAD_GATEWAY, "MAIL_DELIVERY_FAILED"),
            ReportError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Report request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = match &self.0 {
            ReportError::InvalidDateRange { field, .. } => ErrorResponse::with_details(
                error_code,
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            _ => ErrorResponse::new(error_code, self.0.message()),
        };
        (status, Json(body)).into_response()
    }
}
