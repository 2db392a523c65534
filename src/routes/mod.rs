pub mod auth;
pub mod health;
pub mod tasks;

use std::sync::Arc;

use actix_web::{guard, web};

use crate::auth::{Authenticate, RequireRole, TokenCodec};
use crate::error::AppError;

/// Route table. Register and login are open; promotion and task writes need an admin token;
/// task reads need any valid token.
///
/// Expects `web::Data<AppState>` to be registered on the app. Body and path extractor
/// failures are reported through `AppError` so every error reply has the same JSON shape.
pub fn config(codec: Arc<dyn TokenCodec>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        );
        cfg.app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
        );

        cfg.service(health::health)
            .service(
                web::scope("/users")
                    .service(auth::register)
                    .service(auth::login)
                    .service(
                        web::resource("/promote/{id}")
                            .wrap(RequireRole::admin())
                            .wrap(Authenticate::new(codec.clone()))
                            .route(web::put().to(auth::promote)),
                    ),
            )
            .service(
                web::scope("/tasks")
                    .wrap(Authenticate::new(codec))
                    // Reads are guarded by method so writes fall through to the admin resources.
                    .service(
                        web::resource("")
                            .guard(guard::Get())
                            .route(web::get().to(tasks::get_tasks)),
                    )
                    .service(
                        web::resource("/{id}")
                            .guard(guard::Get())
                            .route(web::get().to(tasks::get_task)),
                    )
                    .service(
                        web::resource("")
                            .wrap(RequireRole::admin())
                            .route(web::post().to(tasks::create_task)),
                    )
                    .service(
                        web::resource("/{id}")
                            .wrap(RequireRole::admin())
                            .route(web::put().to(tasks::update_task))
                            .route(web::delete().to(tasks::delete_task)),
                    ),
            );
    }
}
