pub mod skeleton;
pub mod operators;
pub mod population;
pub mod evolution_engine;
pub mod progress;

pub use skeleton::{Skeleton, NUM_FIXED_ATTRIBUTES, NUM_SWAP_SLOTS};
pub use population::Population;
pub use evolution_engine::{EvolutionEngine, EvolutionReport, GenerationStats};
pub use progress::{
    ChannelProgressCallback, LogProgressCallback, NullProgressCallback, ProgressCallback,
    ProgressMessage, Stage,
};
