use actix_middleware::{serve_metrics, MetricsMiddleware, SessionResolver};
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use app_service::{
    db::{PgAccountStore, PgQuestionStore, PgRefreshStore, MIGRATOR},
    handlers,
    services::{AccountService, QuestionService},
    AppState, Config,
};
use db_pool::{create_pool, migrate};
use jwt_security::TokenCodec;
use notification_queue::{KafkaQueuePublisher, NotificationProducer};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "app_service=info,actix_web=info,info".into());

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing();

    tracing::info!(env = %config.server.env, "Starting app service");
    config.database.log_config();

    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    migrate(&pool, &MIGRATOR)
        .await
        .context("Failed to run migrations")?;

    let codec = Arc::new(TokenCodec::new(&config.jwt.secret).context("Invalid JWT_SECRET")?);
    let resolver = Arc::new(SessionResolver::new(
        codec.clone(),
        Arc::new(PgRefreshStore::new(pool.clone())),
    ));

    let publisher = KafkaQueuePublisher::new(
        &config.kafka.brokers,
        &config.kafka.topic,
        Duration::from_millis(config.kafka.delivery_timeout_ms),
    )
    .context("Failed to create Kafka producer")?;
    let notifications = NotificationProducer::new(Arc::new(publisher));

    let state = AppState {
        accounts: Arc::new(AccountService::new(
            Arc::new(PgAccountStore::new(pool.clone())),
            codec,
        )),
        questions: Arc::new(QuestionService::new(
            Arc::new(PgQuestionStore::new(pool)),
            notifications,
        )),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        let resolver = resolver.clone();
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(MetricsMiddleware)
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(serve_metrics))
            .configure(|cfg| handlers::configure(cfg, resolver))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await
    .context("HTTP server error")
}
