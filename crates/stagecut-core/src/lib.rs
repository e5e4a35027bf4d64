pub mod config;
pub mod error;
pub mod plan;

pub use config::PlanConfig;
pub use error::{ConfigError, ConfigResult};
pub use plan::{Plan, StagePlan, Worker};
