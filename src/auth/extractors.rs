use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Role;

/// The verified caller of a request: who the token names and the role it carries.
///
/// Inserted once by `Authenticate` and never modified afterwards.
/// Handlers on authenticated routes can take it as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: String,
    pub role: Role,
}

impl FromRequest for AuthContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthContext>().cloned() {
            Some(context) => ready(Ok(context)),
            // Only reachable on a route that is missing the `Authenticate` stage.
            None => ready(Err(
                AppError::Unauthenticated("missing token".to_string()).into()
            )),
        }
    }
}
