pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{CrossoverMode, DegeneratePolicy, EvolutionConfig};
pub use fitness::{Coefficient, FitnessConfig, FitnessParameter, LegPolicy};
pub use traits::{validate_section, ConfigManifest, ConfigSection, FieldManifest};
