//! # REST API for Data Export
//!
//! CSV download of every student matching the table's current search, in the
//! table's current order.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use log::info;

use super::error_response;
use crate::AppState;

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/csv", get(export_students_csv))
}

/// Export students as a CSV download; 204 when nothing matches
pub async fn export_students_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    let controller = state.controller.lock().await;
    match controller.export_csv().await {
        Ok(Some(export)) => {
            info!("✅ Export CSV operation completed: {} students", export.record_count);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, export.content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.filename),
                    ),
                ],
                export.bytes,
            )
                .into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{request, test_app};
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_export_download() {
        let (app, _) = test_app(3, Some("admin@school.org"));

        let response = request(&app, "GET", "/api/export/csv", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"alunos.csv\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with("\u{FEFF}".as_bytes()));
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        // Header plus three rows, newest first
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("\"Student 03\""));
    }

    #[tokio::test]
    async fn test_empty_export_is_no_content() {
        let (app, _) = test_app(3, Some("admin@school.org"));
        request(&app, "PUT", "/api/students/search", Some(json!({"text": "nobody"}))).await;

        let response = request(&app, "GET", "/api/export/csv", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_export_requires_privileged_user() {
        let (app, _) = test_app(3, None);
        let response = request(&app, "GET", "/api/export/csv", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let (app, _) = test_app(3, Some("staff@school.org"));
        let response = request(&app, "GET", "/api/export/csv", None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
