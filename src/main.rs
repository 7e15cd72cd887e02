use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod leave;
mod model;
mod models;
mod notify;
mod routes;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::leave::LeaveManager;
use crate::notify::{NotificationWorker, Outbox};
use crate::store::mysql::MySqlStore;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Manager API"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await.map_err(|e| {
        error!(error = %e, "Database initialisation failed");
        std::io::Error::other(format!("{e:#}"))
    })?;
    let store = MySqlStore::new(pool);

    let outbox = Outbox::from_config(config.notifications.smtp.as_ref()).map_err(|e| {
        error!(error = %e, "Invalid SMTP configuration");
        std::io::Error::other(e.to_string())
    })?;
    let (notifier, queue) = notify::channel();
    let worker = NotificationWorker::new(
        queue,
        outbox,
        config.notifications.max_attempts,
        config.notifications.retry_delay,
    );
    actix_web::rt::spawn(worker.run());

    let manager = Data::new(LeaveManager::new(
        store.clone(),
        config.policy.clone(),
        notifier,
        config.notifications.faculty_email.clone(),
    ));
    let store = Data::new(store);
    let config_data = Data::new(config.clone());
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(manager.clone())
            .app_data(store.clone())
            .app_data(config_data.clone())
            .service(index)
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await
}
