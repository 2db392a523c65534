mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use chrono::{Duration, Utc};
use common::{bearer, send};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskgate::auth::{AuthContext, Authenticate, JwtCodec, RequireRole, TokenCodec};
use taskgate::models::Role;

const SECRET: &str = "gate-secret";

async fn counted(counter: web::Data<AtomicUsize>, caller: AuthContext) -> HttpResponse {
    counter.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!({ "subject": caller.subject, "role": caller.role }))
}

fn codec() -> Arc<JwtCodec> {
    Arc::new(JwtCodec::new(SECRET).unwrap())
}

macro_rules! gated_app {
    ($codec:expr, $counter:expr) => {{
        let codec: Arc<dyn TokenCodec> = $codec;
        test::init_service(
            App::new()
                .app_data($counter.clone())
                .service(
                    web::resource("/admin")
                        .wrap(RequireRole::admin())
                        .wrap(Authenticate::new(codec.clone()))
                        .route(web::get().to(counted)),
                )
                .service(
                    web::resource("/member")
                        .wrap(Authenticate::new(codec))
                        .route(web::get().to(counted)),
                ),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_admin_route_without_header_is_unauthenticated() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let app = gated_app!(codec(), counter);

    let req = test::TestRequest::get().uri("/admin").to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "missing token" }));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_admin_route_with_regular_token_is_forbidden() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let codec = codec();
    let token = codec.issue("ada@example.com", Role::Regular).unwrap();
    let app = gated_app!(codec, counter);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "unauthorized" }));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_malformed_header_is_unauthenticated() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let codec = codec();
    let token = codec.issue("ada@example.com", Role::Admin).unwrap();
    let app = gated_app!(codec, counter);

    for value in [
        format!("Token {}", token),
        token.clone(),
        format!("Bearer {} trailing", token),
    ] {
        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", value.clone()))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", value);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_bad_tokens_are_forbidden_alike() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let codec = codec();
    let expired = codec
        .issue_at("ada@example.com", Role::Admin, Utc::now() - Duration::hours(30))
        .unwrap();
    let forged = JwtCodec::new("someone-elses-secret")
        .unwrap()
        .issue("ada@example.com", Role::Admin)
        .unwrap();
    let app = gated_app!(codec, counter);

    let mut bodies = Vec::new();
    for token in [expired.as_str(), forged.as_str(), "not-a-jwt"] {
        for uri in ["/admin", "/member"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(token))
                .to_request();
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", uri, token);
            bodies.push(body);
        }
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_valid_tokens_reach_the_handler() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let codec = codec();
    let admin = codec.issue("root@example.com", Role::Admin).unwrap();
    let regular = codec.issue("ada@example.com", Role::Regular).unwrap();
    let app = gated_app!(codec, counter);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("bearer {}", admin)))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "subject": "root@example.com", "role": "admin" }));

    let req = test::TestRequest::get()
        .uri("/member")
        .insert_header(bearer(&regular))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "subject": "ada@example.com", "role": "regular" }));

    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_rotated_secret_invalidates_tokens() {
    let counter = web::Data::new(AtomicUsize::new(0));
    let token = codec().issue("root@example.com", Role::Admin).unwrap();
    let app = gated_app!(Arc::new(JwtCodec::new("rotated-secret").unwrap()), counter);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}
