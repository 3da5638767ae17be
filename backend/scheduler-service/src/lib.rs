pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};

pub use db::{PgSchedulerStore, SchedulerStore, SharedStore};
pub use services::{ContentGenerator, SchedulerService, TemplateGenerator};
