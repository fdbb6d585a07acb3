use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use shared::protocol::API_PREFIX;
use shared::types::{CustomPort, Pin, Service};

use crate::api::error::{ApiError, ApiResult};
use crate::scanner::Scanner;
use crate::store::error::StoreError;
use crate::store::pins::NewPin;
use crate::store::selections::PortSelections;
use crate::store::services::{Assignments, Categories};
use crate::store_manager::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub scanner: Arc<Scanner>,
}

#[derive(Deserialize)]
pub struct DataQuery {
    pub action: String,
}

/// Mutating actions on the data endpoint, dispatched by the `action` field
/// of the request body. Field typing doubles as payload validation: a
/// non-map `categories` or non-list `services` is rejected before any write.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum DataAction {
    SaveCategories { categories: Categories },
    SaveAssignments { assignments: Assignments },
    SaveServices { services: Vec<Service> },
    ResetCategories,
    DeleteService { service_name: String },
    SaveCustomPorts { ports: Vec<CustomPort> },
    SaveDeletedServices { deleted: Vec<String> },
    ClearDeletedServices,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/data", get(get_data).post(post_data))
        .route("/pins", get(get_pins).post(post_pins).delete(delete_pin))
        .route(
            "/port-selections",
            get(get_port_selections).post(post_port_selections),
        )
        .route("/scan-progress", get(get_scan_progress))
        .route("/scan", post(run_scan))
        .with_state(state);

    Router::new().nest(API_PREFIX, api)
}

async fn get_data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> ApiResult<Response> {
    let response = match query.action.as_str() {
        "get_categories" => Json(state.store.get_categories().await?).into_response(),
        "get_assignments" => Json(state.store.get_assignments().await?).into_response(),
        "get_services" => Json(state.store.get_services().await?).into_response(),
        "get_custom_ports" => Json(state.store.get_custom_ports().await?).into_response(),
        "get_deleted_services" => {
            Json(state.store.get_deleted_services().await?).into_response()
        }
        _ => return Err(ApiError::validation("Invalid action")),
    };
    Ok(response)
}

async fn post_data(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Response> {
    let action: DataAction = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("Invalid request: {e}")))?;

    let response = match action {
        DataAction::SaveCategories { categories } => {
            state.store.save_categories(categories).await?;
            Json(json!({ "success": true, "message": "Categories saved" })).into_response()
        }
        DataAction::SaveAssignments { assignments } => {
            state.store.save_assignments(assignments).await?;
            Json(json!({ "success": true, "message": "Assignments saved" })).into_response()
        }
        DataAction::SaveServices { services } => {
            let merged = state.store.save_services(services).await?;
            Json(json!({ "success": true, "message": "Services saved", "services": merged }))
                .into_response()
        }
        DataAction::ResetCategories => {
            let defaults = state.store.reset_categories().await?;
            Json(json!({
                "success": true,
                "message": "Categories reset to defaults",
                "categories": defaults,
            }))
            .into_response()
        }
        DataAction::DeleteService { service_name } => {
            match state.store.delete_service(service_name.clone()).await {
                Ok(()) => Json(json!({
                    "success": true,
                    "message": format!("Service '{service_name}' deleted"),
                }))
                .into_response(),
                // Non-fatal: the title was in neither service list
                Err(StoreError::NotFound(message)) => {
                    Json(json!({ "success": false, "error": message })).into_response()
                }
                Err(e) => return Err(e.into()),
            }
        }
        DataAction::SaveCustomPorts { ports } => {
            state.store.save_custom_ports(ports).await?;
            Json(json!({ "success": true })).into_response()
        }
        DataAction::SaveDeletedServices { deleted } => {
            state.store.save_deleted_services(deleted).await?;
            Json(json!({ "success": true })).into_response()
        }
        DataAction::ClearDeletedServices => {
            state.store.clear_deleted_services().await?;
            Json(json!({ "success": true })).into_response()
        }
    };
    Ok(response)
}

async fn get_pins(State(state): State<AppState>) -> ApiResult<Json<Vec<Pin>>> {
    Ok(Json(state.store.get_pins().await?))
}

/// Add a single pin, or replace the whole list when the body carries
/// `action: "sync"`.
async fn post_pins(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Response> {
    if body.get("action").and_then(Value::as_str) == Some("sync") {
        let pins: Vec<Pin> = body
            .get("pins")
            .cloned()
            .ok_or_else(|| ApiError::validation("Invalid pins data"))
            .and_then(|pins| {
                serde_json::from_value(pins)
                    .map_err(|_| ApiError::validation("Invalid pins data"))
            })?;

        let pins = state.store.sync_pins(pins).await?;
        return Ok(Json(json!({ "success": true, "pins": pins })).into_response());
    }

    let new: NewPin = serde_json::from_value(body)
        .map_err(|_| ApiError::validation("Invalid input"))?;

    let pins = state.store.add_pin(new).await?;
    Ok(Json(json!({ "success": true, "pins": pins })).into_response())
}

#[derive(Deserialize)]
struct PinDeleteBody {
    title: String,
}

async fn delete_pin(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let body: PinDeleteBody =
        serde_json::from_value(body).map_err(|_| ApiError::validation("Invalid input"))?;

    let pins = state.store.remove_pin(body.title).await?;
    Ok(Json(json!({ "success": true, "pins": pins })).into_response())
}

async fn get_port_selections(State(state): State<AppState>) -> ApiResult<Json<PortSelections>> {
    Ok(Json(state.store.get_port_selections().await?))
}

#[derive(Deserialize)]
struct PortSelectionsBody {
    action: String,
    #[serde(default)]
    selections: PortSelections,
}

async fn post_port_selections(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let body: PortSelectionsBody =
        serde_json::from_value(body).map_err(|_| ApiError::validation("Invalid request"))?;

    if body.action != "sync" {
        return Err(ApiError::validation("Invalid request"));
    }

    state.store.sync_port_selections(body.selections).await?;
    Ok(Json(json!({ "success": true })).into_response())
}

async fn get_scan_progress(State(state): State<AppState>) -> ApiResult<Response> {
    Ok(Json(state.store.get_scan_progress().await?).into_response())
}

async fn run_scan(State(state): State<AppState>) -> Response {
    match state.scanner.trigger() {
        Ok(()) => Json(json!({
            "status": "started",
            "message": "Network scan has been initiated - services will be auto-discovered",
            "timestamp": Utc::now(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to trigger scan: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_action_dispatch_by_tag() {
        let action: DataAction = serde_json::from_value(json!({
            "action": "save_categories",
            "categories": { "nas": "NAS & Storage" },
        }))
        .unwrap();
        assert!(matches!(action, DataAction::SaveCategories { .. }));
    }

    #[test]
    fn test_non_map_categories_rejected() {
        let result: Result<DataAction, _> = serde_json::from_value(json!({
            "action": "save_categories",
            "categories": [1, 2, 3],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_list_services_rejected() {
        let result: Result<DataAction, _> = serde_json::from_value(json!({
            "action": "save_services",
            "services": "nope",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<DataAction, _> =
            serde_json::from_value(json!({ "action": "drop_everything" }));
        assert!(result.is_err());
    }
}
