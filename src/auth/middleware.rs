use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthContext;
use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// Resolves the `Authorization` header into an [`AuthContext`].
///
/// - no header (or an empty one): `Unauthenticated`
/// - anything but exactly `<scheme> <token>` with a case-insensitive `bearer` scheme: `Unauthenticated`
/// - a token that fails verification: `Forbidden`
pub fn authenticate(
    header: Option<&HeaderValue>,
    codec: &dyn TokenCodec,
) -> Result<AuthContext, AppError> {
    let raw = match header {
        Some(value) if !value.is_empty() => value
            .to_str()
            .map_err(|_| AppError::Unauthenticated("invalid authorization header".into()))?,
        _ => return Err(AppError::Unauthenticated("missing token".into())),
    };

    let parts: Vec<&str> = raw.split(' ').collect();
    let token = match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => *token,
        _ => {
            return Err(AppError::Unauthenticated(
                "invalid authorization header".into(),
            ))
        }
    };

    let claims = codec.verify(token).map_err(|_| AppError::Forbidden)?;
    Ok(AuthContext {
        subject: claims.sub,
        role: claims.role,
    })
}

/// First gate stage. Verifies the bearer token and attaches the caller's [`AuthContext`].
///
/// Rejected requests never reach the wrapped service.
#[derive(Clone)]
pub struct Authenticate {
    codec: Arc<dyn TokenCodec>,
}

impl Authenticate {
    pub fn new(codec: Arc<dyn TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateService {
            service,
            codec: self.codec.clone(),
        }))
    }
}

pub struct AuthenticateService<S> {
    service: S,
    codec: Arc<dyn TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers().get(header::AUTHORIZATION), self.codec.as_ref()) {
            Ok(context) => {
                log::debug!("authenticated {} as {}", context.subject, context.role);
                req.extensions_mut().insert(context);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), err);
                let response = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::JwtCodec;
    use crate::models::Role;

    fn codec() -> JwtCodec {
        JwtCodec::new("middleware-secret").unwrap()
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let codec = codec();
        assert!(matches!(
            authenticate(None, &codec),
            Err(AppError::Unauthenticated(_))
        ));
        assert!(matches!(
            authenticate(Some(&header("")), &codec),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_malformed_header_is_unauthenticated() {
        let codec = codec();
        let token = codec.issue("ada@example.com", Role::Admin).unwrap();

        for value in [
            token.clone(),
            format!("Basic {}", token),
            format!("Bearer {} extra", token),
            format!("Bearer  {}", token),
            "Bearer".to_string(),
        ] {
            assert!(
                matches!(
                    authenticate(Some(&header(&value)), &codec),
                    Err(AppError::Unauthenticated(_))
                ),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_invalid_token_is_forbidden() {
        let codec = codec();
        let forged = JwtCodec::new("elsewhere")
            .unwrap()
            .issue("ada@example.com", Role::Admin)
            .unwrap();

        assert_eq!(
            authenticate(Some(&header(&format!("Bearer {}", forged))), &codec),
            Err(AppError::Forbidden)
        );
        assert_eq!(
            authenticate(Some(&header("Bearer garbage")), &codec),
            Err(AppError::Forbidden)
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let codec = codec();
        let token = codec.issue("ada@example.com", Role::Regular).unwrap();

        for scheme in ["Bearer", "bearer", "BEARER", "bEaReR"] {
            let context =
                authenticate(Some(&header(&format!("{} {}", scheme, token))), &codec).unwrap();
            assert_eq!(
                context,
                AuthContext {
                    subject: "ada@example.com".to_string(),
                    role: Role::Regular,
                }
            );
        }
    }
}
