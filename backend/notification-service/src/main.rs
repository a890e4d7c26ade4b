use actix_middleware::{serve_metrics, MetricsMiddleware};
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use db_pool::create_pool;
use expo_push_shared::{ExpoPushClient, PushDispatcher};
use notification_queue::{INSERT_METHOD, QUESTION_TYPE};
use notification_service::{
    handlers::QuestionInsertHandler, Config, KafkaNotificationConsumer, NotificationConsumer,
    NotificationRouter, PgRecipientResolver,
};
use std::sync::Arc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notification_service=info,info".into());

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

    tracing::info!(env = %config.app.env, "Starting notification service");
    config.database.log_config();

    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to connect to database")?;

    let provider = ExpoPushClient::new(config.expo.access_token.clone())
        .context("Failed to build Expo push client")?;
    let dispatcher =
        Arc::new(PushDispatcher::new(Arc::new(provider)).with_chunk_size(config.expo.chunk_size));
    let recipients = Arc::new(PgRecipientResolver::new(pool));

    let router = NotificationRouter::new().register(
        QUESTION_TYPE,
        INSERT_METHOD,
        Arc::new(QuestionInsertHandler::new(recipients, dispatcher)),
    );
    let consumer = Arc::new(NotificationConsumer::new(Arc::new(router)));

    let kafka_consumer = KafkaNotificationConsumer::new(&config.kafka);
    tokio::spawn(async move {
        if let Err(e) = kafka_consumer.start(consumer).await {
            tracing::error!(error = %e, "Kafka notification consumer stopped");
        }
    });

    let addr = format!("0.0.0.0:{}", config.app.port);
    tracing::info!("Starting health/metrics server on {}", addr);

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(MetricsMiddleware)
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(serve_metrics))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await
    .context("HTTP server error")
}
