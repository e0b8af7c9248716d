use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, State},
    Json,
};
use serde_json::Value;

use crate::database::models::Employee;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

fn employee_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(format!("Invalid employee id: {}", e.body_text())))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::invalid_json(e.body_text()))
}

/// GET /api/employees - every employee
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.employees.find_all().await?))
}

/// GET /api/employees/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Employee>, ApiError> {
    let id = employee_id(path)?;
    Ok(Json(state.employees.find_by_id(id).await?))
}

/// POST /api/employees - insert; any `id` in the body is ignored
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Employee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let employee = json_body(body)?;
    if !employee.is_new() {
        tracing::debug!(user = %user.username, "Discarding client id {} on create", employee.id);
    }
    Ok(Json(state.employees.create(employee).await?))
}

/// PUT /api/employees - replace a whole record
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<Employee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let employee = json_body(body)?;
    Ok(Json(state.employees.update(employee).await?))
}

/// PATCH /api/employees/:id - merge a sparse set of fields
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let id = employee_id(path)?;
    let payload = json_body(body)?;
    Ok(Json(state.employees.patch(id, payload).await?))
}

/// DELETE /api/employees/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<String, ApiError> {
    let id = employee_id(path)?;
    state.employees.delete(id).await?;
    tracing::info!(user = %user.username, "Employee {} removed", id);
    Ok(format!("Deleted employee id - {}", id))
}
