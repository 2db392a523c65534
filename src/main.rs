use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use taskgate::{config::Config, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&config).await {
        Ok(state) => web::Data::new(state),
        Err(err) => {
            log::error!("failed to initialise application state: {}", err);
            std::process::exit(1);
        }
    };
    let codec = state.codec();

    log::info!("Starting taskgate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config(codec.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
