/// Scheduler API Handlers
///
/// Thin transport layer over [`SchedulerService`]; all decisions live in the
/// service.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::models::{
    AutoGenerateRequest, FeedbackRequest, GenerateRequest, NewItem, RunDailyRequest,
    RunDailyResult, WeightsUpdateRequest,
};
use crate::services::SchedulerService;

/// Header carrying the admin credential for manual weight overrides
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

const MAX_TRENDS_LIMIT: i64 = 100;

/// Query parameters for GET /scheduler/next_post and /scheduler/weights
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account: Option<String>,
}

/// Query parameters for GET /scheduler/trends
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Clamped to `[1, 100]`
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[get("/next_post")]
pub async fn next_post(
    service: web::Data<SchedulerService>,
    query: web::Query<AccountQuery>,
) -> Result<HttpResponse> {
    let account = service.account_or_default(query.account.as_deref());
    let recommendation = service.next_post(&account).await;
    Ok(HttpResponse::Ok().json(recommendation))
}

#[post("/feedback")]
pub async fn feedback(
    service: web::Data<SchedulerService>,
    body: web::Json<FeedbackRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let outcome = service.record_feedback(&body).await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/trends")]
pub async fn trends(
    service: web::Data<SchedulerService>,
    query: web::Query<TrendsQuery>,
) -> Result<HttpResponse> {
    let limit = match query.limit {
        Some(limit) => limit.clamp(1, MAX_TRENDS_LIMIT) as usize,
        None => service.settings().default_trends_limit,
    };
    let entries = service.trends(limit).await;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/weights")]
pub async fn get_weights(
    service: web::Data<SchedulerService>,
    query: web::Query<AccountQuery>,
) -> Result<HttpResponse> {
    let account = service.account_or_default(query.account.as_deref());
    let weights = service.get_weights(&account).await;
    Ok(HttpResponse::Ok().json(weights))
}

/// Authorization is checked before the body is validated
#[post("/weights/update")]
pub async fn update_weights(
    req: HttpRequest,
    service: web::Data<SchedulerService>,
    body: web::Json<WeightsUpdateRequest>,
) -> Result<HttpResponse> {
    let token = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = service.update_weights(&body, token).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/auto_generate")]
pub async fn auto_generate(
    service: web::Data<SchedulerService>,
    body: web::Json<AutoGenerateRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let result = service.auto_generate(&body).await;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/run_daily")]
pub async fn run_daily(
    service: web::Data<SchedulerService>,
    body: web::Json<RunDailyRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let results = service.run_daily(&body).await;
    Ok(HttpResponse::Ok().json(RunDailyResult { results }))
}

#[post("/score")]
pub async fn score_text(
    service: web::Data<SchedulerService>,
    body: web::Json<ScoreRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let score = service.score_text(&body.text, body.context.as_deref());
    Ok(HttpResponse::Ok().json(score))
}

#[post("/post")]
pub async fn generate_post(
    service: web::Data<SchedulerService>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse> {
    let content = service.generate(&body);
    Ok(HttpResponse::Ok().json(content))
}

#[post("/items")]
pub async fn insert_item(
    service: web::Data<SchedulerService>,
    body: web::Json<NewItem>,
) -> Result<HttpResponse> {
    body.validate()?;
    let outcome = service.insert_item(&body).await;
    Ok(HttpResponse::Ok().json(outcome))
}
