use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError},
    http::KeepAlive,
    middleware::Logger,
    web,
    web::ServiceConfig,
    App,
    HttpRequest,
    HttpServer,
};
use drinks_engine::{DrinkManagement, DrinksApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        not_found,
        CreateDrinkRoute,
        DeleteDrinkRoute,
        DrinksDetailRoute,
        DrinksRoute,
        UpdateDrinkRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    prepare_database(&db, &config).await?;
    let verifier = config.auth.token_verifier()?;
    let srv = create_server_instance(config, db, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

async fn prepare_database(db: &SqliteDatabase, config: &ServerConfig) -> Result<(), ServerError> {
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Database migrations failed. {e}")))?;
    if config.reset_db {
        warn!("🗃️ DRINKS_RESET_DB is set. Deleting every drink.");
        db.reset(config.seed_db).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        if config.seed_db {
            info!("🗃️ Seeded the database with the sample drink");
        }
    }
    Ok(())
}

/// Builds the HTTP server. The key set cache inside `verifier` is shared by all workers.
pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    verifier: TokenVerifier,
) -> Result<Server, ServerError> {
    let verifier = web::Data::new(verifier);
    let srv = HttpServer::new(move || {
        let drinks_api = DrinksApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("drinks::access_log"))
            .wrap(cors())
            .app_data(web::Data::new(drinks_api))
            .app_data(verifier.clone())
            .configure(configure_routes::<SqliteDatabase>)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .shutdown_timeout(30)
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Registers every route, along with the extractor configuration that turns malformed bodies into `400` responses and
/// unparseable ids into `404` responses, both with the usual error body.
pub fn configure_routes<B: DrinkManagement + 'static>(cfg: &mut ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health)
        .service(DrinksRoute::<B>::new())
        .service(DrinksDetailRoute::<B>::new())
        .service(CreateDrinkRoute::<B>::new())
        .service(UpdateDrinkRoute::<B>::new())
        .service(DeleteDrinkRoute::<B>::new());
}

/// Any origin may call the API.
fn cors() -> Cors {
    Cors::default().allow_any_origin().send_wildcard().allow_any_method().allow_any_header().max_age(3600)
}

fn json_error(e: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Could not read request body. {e}");
    ServerError::InvalidRequestBody(e.to_string()).into()
}

/// A path that does not name a valid drink id can never match a record.
fn path_error(e: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Could not read request path. {e}");
    ServerError::NoRecordFound(format!("{} does not exist", req.path())).into()
}
