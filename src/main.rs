use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::info;

use batchlink::config::Config;
use batchlink::logging::init_logging;
use batchlink::services::{
    AppStartTime, ClickAccountant, HealthService, RedirectService, ShortenService,
};
use batchlink::storages::click::{ClickManager, StorageSink};
use batchlink::storages::StorageFactory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenv().ok();
    init_logging();

    let config = Config::from_env();

    let storage = StorageFactory::create(&config).expect("Failed to create storage");
    info!(
        "Using storage backend: {}",
        storage.get_backend_name().await
    );

    let sink = Arc::new(StorageSink::new(storage.clone()));
    let click_manager = Arc::new(ClickManager::new(
        sink,
        Duration::from_secs(config.click_flush_interval_secs),
    ));

    {
        let manager = click_manager.clone();
        tokio::spawn(async move {
            manager.start_background_task().await;
        });
    }

    let accountant = ClickAccountant::new(storage.clone(), click_manager.clone());

    let bind_address = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server at http://{}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(accountant.clone()))
            .route("/shorten", web::post().to(ShortenService::post_shorten))
            .route("/urls", web::get().to(ShortenService::get_all_urls))
            .service(
                web::scope("/health")
                    .route("", web::get().to(HealthService::health_check))
                    .route("", web::head().to(HealthService::health_check))
                    .route("/ready", web::get().to(HealthService::readiness_check))
                    .route("/live", web::get().to(HealthService::liveness_check)),
            )
            .route("/{path:.*}", web::get().to(RedirectService::handle_redirect))
            .route("/{path:.*}", web::head().to(RedirectService::handle_redirect))
    })
    .bind(bind_address)?
    .run()
    .await?;

    // 退出前刷新点击缓冲
    info!("Flushing pending clicks before exit");
    click_manager.flush().await;

    Ok(())
}
