use crate::{auth::AuthContext, error::AppError, models::TaskInput, state::AppState};
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Lists every task, newest first. Any authenticated caller.
pub async fn get_tasks(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.tasks.list().await)
}

/// Retrieves a specific task by its ID. Any authenticated caller.
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = state.tasks.get(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a new task. Admin only.
///
/// ## Responses:
/// - `201 Created`: the new task; `created_by` is the caller's token subject.
/// - `400 Bad Request`: the payload is malformed or fails validation.
pub async fn create_task(
    state: web::Data<AppState>,
    caller: AuthContext,
    task_data: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create(task_data.into_inner(), &caller.subject)
        .await;

    Ok(HttpResponse::Created().json(task))
}

/// Replaces the editable fields of a task. Admin only.
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .update(task_id.into_inner(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID. Admin only.
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.tasks.delete(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
