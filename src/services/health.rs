use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::config::Config;
use crate::storages::Storage;
use crate::utils::format_duration_human;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

pub struct HealthService;

impl HealthService {
    /// GET /health — read-only snapshot of store aggregates and process
    /// vitals. Never mutates state.
    pub async fn health_check(
        storage: web::Data<Arc<dyn Storage>>,
        app_start_time: web::Data<AppStartTime>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        // Aggregates are recomputed from the store on every call rather
        // than tracked in separate counters, so they cannot drift.
        let aggregates = tokio::time::timeout(Duration::from_secs(5), async {
            let total_urls = storage.count_urls().await;
            let total_clicks = storage.total_clicks().await;
            (total_urls, total_clicks)
        })
        .await;

        let is_healthy = aggregates.is_ok();
        let (total_urls, total_clicks) = match aggregates {
            Ok(totals) => totals,
            Err(_) => {
                error!("Storage aggregate probe timeout");
                (0, 0)
            }
        };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let health_response = json!({
            "status": if is_healthy { "healthy" } else { "unhealthy" },
            "uptime": uptime_seconds,
            "totalUrls": total_urls,
            "totalClicks": total_clicks,
            "environment": config.environment.clone(),
            "version": env!("CARGO_PKG_VERSION"),
            "memory": Self::memory_snapshot(),
            "timestamp": now.to_rfc3339(),
        });

        let response_status = if is_healthy {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}",
            start_time.elapsed(),
            if is_healthy { "healthy" } else { "unhealthy" },
            format_duration_human(app_start_time.start_datetime, now)
        );

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(health_response)
    }

    /// Process memory block. Key names follow the original UI contract;
    /// `heapUsed`/`heapTotal` map to resident and virtual process memory.
    fn memory_snapshot() -> serde_json::Value {
        let mut sys = sysinfo::System::new();

        match sysinfo::get_current_pid() {
            Ok(pid) => {
                sys.refresh_process(pid);
                match sys.process(pid) {
                    Some(proc) => json!({
                        "heapUsed": proc.memory(),
                        "heapTotal": proc.virtual_memory(),
                        "rss": proc.memory(),
                    }),
                    None => json!({ "heapUsed": 0, "heapTotal": 0, "rss": 0 }),
                }
            }
            Err(e) => {
                error!("Failed to resolve current pid: {}", e);
                json!({ "heapUsed": 0, "heapTotal": 0, "rss": 0 })
            }
        }
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}
