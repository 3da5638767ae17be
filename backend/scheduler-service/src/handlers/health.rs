use actix_web::{get, web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::services::SchedulerService;

/// Liveness probe
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "scheduler-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Store connectivity check; always 200, the body carries the state
#[get("/health/store")]
pub async fn store_health(service: web::Data<SchedulerService>) -> HttpResponse {
    let Some(store) = service.store() else {
        return HttpResponse::Ok().json(json!({ "store_connection": "not_configured" }));
    };

    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "store_connection": "ok" })),
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            HttpResponse::Ok().json(json!({
                "store_connection": "failed",
                "detail": e.to_string(),
            }))
        }
    }
}
