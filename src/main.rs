use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use tokio::main;
use tracing::{info, warn};

use message_dispatch::{
    application::{
        handlers::message_dispatcher::MessageDispatchHandler,
        services::scheduler::MessageScheduler,
        usecases::{
            create_message::CreateMessageUseCase, get_message::GetMessageUseCase,
            list_sent_messages::ListSentMessagesUseCase, message_stats::MessageStatsUseCase,
            process_pending::ProcessPendingMessagesUseCase, send_message::SendMessageUseCase,
        },
    },
    config::Config,
    domain::repositories::{CacheRepository, MessageRepository},
    infrastructure::{
        cache::redis_cache::RedisCacheRepository,
        messaging::http_api::HttpDeliveryClient,
        repositories::postgres::{self, PostgresMessageRepository},
    },
    logging::init_logging,
    presentation::http::endpoints::root::{ApiState, endpoints},
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[main]
async fn main() -> anyhow::Result<()> {
    let config = Config::try_parse()?;
    init_logging(&config.logging);

    let pool = postgres::connect(&config.database.url(), config.database.max_connections)
        .await
        .context("failed to connect to database")?;
    postgres::migrate(&pool)
        .await
        .context("failed to run database migrations")?;
    info!(host = %config.database.host, database = %config.database.name, "connected to database");

    let message_repo: Arc<dyn MessageRepository> = PostgresMessageRepository::new(pool);
    let cache = connect_cache(config.redis_url.as_deref()).await;
    let delivery = HttpDeliveryClient::new(&config.delivery)?;

    let dispatcher = Arc::new(MessageDispatchHandler::new(
        message_repo.clone(),
        delivery,
        cache.clone(),
    ));
    let process_pending_usecase = Arc::new(ProcessPendingMessagesUseCase::new(
        message_repo.clone(),
        dispatcher.clone(),
    ));
    let scheduler = Arc::new(MessageScheduler::new(
        process_pending_usecase.clone(),
        cache,
        config.scheduler.clone(),
    ));

    let state = Arc::new(ApiState {
        create_message_usecase: Arc::new(CreateMessageUseCase::new(message_repo.clone())),
        get_message_usecase: Arc::new(GetMessageUseCase::new(message_repo.clone())),
        list_sent_messages_usecase: Arc::new(ListSentMessagesUseCase::new(message_repo.clone())),
        message_stats_usecase: Arc::new(MessageStatsUseCase::new(message_repo.clone())),
        send_message_usecase: Arc::new(SendMessageUseCase::new(message_repo, dispatcher)),
        process_pending_usecase,
        scheduler: scheduler.clone(),
    });

    if config.scheduler_auto_start {
        scheduler.start().await?;
    }

    let server_url = config.server.url();
    info!(url = %server_url, "starting server");

    let api_service = OpenApiService::new(endpoints(state), "Message Dispatch API", "0.1.0")
        .server(format!("{server_url}/api/v1"));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api/v1", api_service).nest("/", ui);

    Server::new(TcpListener::bind(config.server.bind_addr()))
        .run_with_graceful_shutdown(app, shutdown_signal(), Some(SHUTDOWN_TIMEOUT))
        .await?;

    if scheduler.is_running().await {
        scheduler.stop().await?;
    }
    info!("server stopped");
    Ok(())
}

async fn connect_cache(redis_url: Option<&str>) -> Option<Arc<dyn CacheRepository>> {
    let Some(url) = redis_url else {
        info!("REDIS_URL not set, status cache disabled");
        return None;
    };
    match RedisCacheRepository::connect(url).await {
        Ok(cache) => {
            info!("connected to redis");
            Some(cache as Arc<dyn CacheRepository>)
        }
        Err(err) => {
            warn!(error = %err, "redis unavailable, status cache disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT, shutting down"),
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                let _ = ctrl_c.await;
                info!("received SIGINT, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("received SIGINT, shutting down");
    }
}
