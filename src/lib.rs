pub mod config;
pub mod engines;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{AppConfig, ConfigManager, EvolutionConfig, FitnessConfig};
pub use engines::evaluation::FitnessBreakdown;
pub use engines::generation::{EvolutionEngine, EvolutionReport, Population, Skeleton};
pub use error::{LabanError, Result};
pub use types::{Effort, Flow, Height, Joint, Space, Time, Weight};
