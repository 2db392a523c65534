use crate::{
    auth::{LoginRequest, RegisterRequest, TokenResponse},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Register a new identity
///
/// Returns the created identity (id, email, role). The first identity ever registered is
/// an admin; the credential hash is never part of the response.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let identity = state
        .workflow
        .register(&register_data.email, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(identity))
}

/// Login
///
/// Exchanges email and password for a bearer token valid for 24 hours.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = state
        .workflow
        .login(&login_data.email, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Promote an identity to admin
///
/// Mounted behind `Authenticate` and `RequireRole::admin()`.
///
/// ## Responses:
/// - `200 OK`: the updated identity.
/// - `401 Unauthorized`: missing or unparsable bearer header.
/// - `403 Forbidden`: invalid token, or the caller is not an admin.
/// - `404 Not Found`: no identity with that id.
pub async fn promote(
    state: web::Data<AppState>,
    identity_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let identity = state.workflow.promote(identity_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(identity))
}
