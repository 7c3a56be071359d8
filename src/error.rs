use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabanError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No viable individuals: total fitness is {total_fitness}")]
    NoViableIndividuals { total_fitness: f64 },

    #[error("Individual {index} has not been evaluated")]
    NotEvaluated { index: usize },

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),
}

pub type Result<T> = std::result::Result<T, LabanError>;
