pub mod audit;
pub mod engagement;
pub mod generator;
pub mod heuristic;
pub mod learner;
pub mod priority;
pub mod relevance;
pub mod scheduler;
pub mod trends;
pub mod weights;

pub use audit::AuditRecorder;
pub use generator::{ContentGenerator, TemplateGenerator};
pub use learner::OnlineLearner;
pub use scheduler::SchedulerService;
pub use weights::WeightStore;
