#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use serde_json::{json, Value};
use taskgate::auth::{BcryptHasher, JwtCodec, TokenCodec};
use taskgate::directory::InMemoryDirectory;
use taskgate::{AppState, CredentialWorkflow};

pub const SECRET: &str = "integration-test-secret";

/// In-memory state with a cheap bcrypt cost.
pub fn test_state() -> web::Data<AppState> {
    let codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(SECRET).unwrap());
    let workflow = CredentialWorkflow::new(
        Arc::new(InMemoryDirectory::new()),
        Arc::new(BcryptHasher::new(4)),
        codec,
    );
    web::Data::new(AppState::new(workflow))
}

/// Sends a request and returns the status with the body parsed as JSON (`Null` if it is not JSON).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub async fn register<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers then logs in, returning the identity id and a bearer token.
pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, identity) = register(app, email, password).await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", email, identity);
    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login {}: {}", email, body);

    (
        identity["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
