//! # REST API for the Student Table and Form
//!
//! Every route answers with the current `ViewSnapshot`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use log::info;
use shared::{FormInputRequest, PageRequest, PageSizeRequest, SearchRequest, SortRequest};

use super::error_response;
use crate::domain::{ListController, RegistryError, RegistryResult};
use crate::AppState;

/// Create a router for student related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/reload", post(reload))
        .route("/search", put(set_search))
        .route("/sort", post(set_sort))
        .route("/page", put(set_page))
        .route("/page-size", put(set_page_size))
        .route("/form", put(update_form))
        .route("/form/clear", post(clear_form))
        .route("/save", post(save))
        .route("/:id/edit", post(edit))
        .route("/:id/stage-delete", post(stage_delete))
        .route("/deletion/confirm", post(confirm_deletion))
        .route("/deletion/cancel", post(cancel_deletion))
        .route("/message", delete(dismiss_message))
}

async fn respond(controller: &ListController, result: RegistryResult<()>) -> Response {
    match result {
        Ok(()) => (StatusCode::OK, Json(controller.snapshot().await)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");
    let controller = state.controller.lock().await;
    respond(&controller, Ok(())).await
}

/// Reload without holding the controller across the fetch; a response
/// superseded by a newer reload is dropped.
pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/students/reload");

    let (ticket, store) = {
        let mut controller = state.controller.lock().await;
        (controller.begin_reload(), controller.store())
    };

    match store.list(&ticket.query).await {
        Ok(page) => {
            let mut controller = state.controller.lock().await;
            if !controller.apply_reload(&ticket, page) {
                info!("Reload #{} superseded, returning current state", ticket.seq);
            }
            respond(&controller, Ok(())).await
        }
        Err(e) => error_response(RegistryError::remote(e)),
    }
}

pub async fn set_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/search - request: {:?}", request);
    let mut controller = state.controller.lock().await;
    let result = controller.set_search(&request.text).await;
    respond(&controller, result).await
}

pub async fn set_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/sort - column: {}", request.column);
    let mut controller = state.controller.lock().await;
    let result = controller.set_sort(request.column).await;
    respond(&controller, result).await
}

pub async fn set_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/page - page: {}", request.page);
    let mut controller = state.controller.lock().await;
    let result = controller.set_page(request.page).await;
    respond(&controller, result).await
}

pub async fn set_page_size(
    State(state): State<AppState>,
    Json(request): Json<PageSizeRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/page-size - page_size: {}", request.page_size);
    let mut controller = state.controller.lock().await;
    let result = controller.set_page_size(request.page_size).await;
    respond(&controller, result).await
}

pub async fn update_form(
    State(state): State<AppState>,
    Json(request): Json<FormInputRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/form");
    let mut controller = state.controller.lock().await;
    controller.update_form(&request);
    respond(&controller, Ok(())).await
}

pub async fn clear_form(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/students/form/clear");
    let mut controller = state.controller.lock().await;
    controller.clear_form();
    respond(&controller, Ok(())).await
}

pub async fn save(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/students/save");
    let mut controller = state.controller.lock().await;
    let result = controller.save().await;
    respond(&controller, result).await
}

pub async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/students/{}/edit", id);
    let mut controller = state.controller.lock().await;
    let result = controller.edit(&id);
    respond(&controller, result).await
}

pub async fn stage_delete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/students/{}/stage-delete", id);
    let mut controller = state.controller.lock().await;
    let result = controller.stage(&id);
    respond(&controller, result).await
}

pub async fn confirm_deletion(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/students/deletion/confirm");
    let mut controller = state.controller.lock().await;
    let result = controller.confirm_deletion().await;
    respond(&controller, result).await
}

pub async fn cancel_deletion(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/students/deletion/cancel");
    let mut controller = state.controller.lock().await;
    controller.cancel_deletion();
    respond(&controller, Ok(())).await
}

pub async fn dismiss_message(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/students/message");
    let mut controller = state.controller.lock().await;
    controller.dismiss_message();
    respond(&controller, Ok(())).await
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{body_json, request, test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use shared::{MessageKind, SortColumn, SortDirection, ViewSnapshot};

    #[tokio::test]
    async fn test_reload_and_paging() {
        let (app, _) = test_app(23, Some("admin@school.org"));

        let response = request(&app, "POST", "/api/students/reload", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.total, 23);
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.records.len(), 10);
        assert!(snapshot.can_export);

        let response = request(&app, "PUT", "/api/students/page", Some(json!({"page": 3}))).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.page, 3);
        assert_eq!(snapshot.records.len(), 3);
    }

    #[tokio::test]
    async fn test_sort_and_search() {
        let (app, _) = test_app(12, None);

        let response = request(&app, "POST", "/api/students/sort", Some(json!({"column": "name"}))).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.sort_column, SortColumn::Name);
        assert_eq!(snapshot.sort_direction, SortDirection::Asc);
        assert_eq!(snapshot.records[0].name, "Student 01");

        let response = request(&app, "PUT", "/api/students/search", Some(json!({"text": "student 1"}))).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.search, "student 1");
        assert_eq!(snapshot.total, 3);
        assert!(!snapshot.can_export);
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_bad_request() {
        let (app, _) = test_app(3, None);
        let response = request(&app, "PUT", "/api/students/page-size", Some(json!({"page_size": 7}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_validation_and_create() {
        let (app, _) = test_app(0, None);

        let response = request(&app, "POST", "/api/students/save", None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["error"], "Student name is required.");

        let response = request(
            &app,
            "PUT",
            "/api/students/form",
            Some(json!({"name": "Ana", "birth_date": "15062015", "case_number": "123456"})),
        )
        .await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.form.birth_date, "15/06/2015");
        assert_eq!(snapshot.form.case_number, "1234/56");

        let response = request(&app, "POST", "/api/students/save", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.records[0].birth_date, "15/06/2015");
        assert_eq!(snapshot.message.unwrap().kind, MessageKind::Success);

        let response = request(&app, "DELETE", "/api/students/message", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.message, None);
    }

    #[tokio::test]
    async fn test_edit_and_delete_flow() {
        let (app, store) = test_app(2, None);
        request(&app, "POST", "/api/students/reload", None).await;

        let response = request(&app, "POST", "/api/students/missing/edit", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = request(&app, "POST", "/api/students/s01/edit", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.editing_id.as_deref(), Some("s01"));
        assert_eq!(snapshot.form.name, "Student 01");

        let response = request(&app, "POST", "/api/students/form/clear", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.editing_id, None);

        let response = request(&app, "POST", "/api/students/deletion/confirm", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = request(&app, "POST", "/api/students/s01/stage-delete", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.staged.unwrap().id, "s01");

        let response = request(&app, "POST", "/api/students/deletion/cancel", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.staged, None);

        request(&app, "POST", "/api/students/s01/stage-delete", None).await;
        let response = request(&app, "POST", "/api/students/deletion/confirm", None).await;
        let snapshot: ViewSnapshot = body_json(response).await;
        assert_eq!(snapshot.total, 1);
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_bad_gateway() {
        let (app, store) = test_app(2, None);
        store.set_failing(true);
        let response = request(&app, "POST", "/api/students/reload", None).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
