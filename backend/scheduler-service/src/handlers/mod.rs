pub mod health;
pub mod scheduler;

use actix_web::{error::JsonPayloadError, error::QueryPayloadError, web, HttpRequest};

use crate::error::AppError;

pub use health::{health_check, store_health};
pub use scheduler::{
    auto_generate, feedback, generate_post, get_weights, insert_item, next_post, run_daily,
    score_text, trends, update_weights, ADMIN_TOKEN_HEADER,
};

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Register every route. Expects `web::Data<SchedulerService>` in app data.
///
/// Malformed bodies and query strings answer with the same JSON error body
/// as every other failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health_check)
        .service(store_health)
        .service(insert_item)
        .service(
            web::scope("/scheduler")
                .service(next_post)
                .service(feedback)
                .service(trends)
                .service(get_weights)
                .service(update_weights)
                .service(auto_generate)
                .service(run_daily),
        )
        .service(web::scope("/semantic").service(score_text))
        .service(web::scope("/generator").service(generate_post));
}
