use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Sender;

use super::evolution_engine::GenerationStats;

/// Steps of a generation, in the order the engine runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    CalculateFitness,
    Select,
    Crossover,
    Mutate,
    FinalSelect,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CalculateFitness => "calculate fitness",
            Stage::Select => "select",
            Stage::Crossover => "crossover",
            Stage::Mutate => "mutate",
            Stage::FinalSelect => "final select",
        };
        f.write_str(name)
    }
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_stage(&mut self, generation: usize, stage: Stage);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
}

/// Reports through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {} starting...", generation + 1);
    }

    fn on_stage(&mut self, generation: usize, stage: Stage) {
        log::debug!("Generation {}: {}", generation + 1, stage);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::info!(
            "Generation {} evaluated. Best fitness: {:.4}, average: {:.4}, population: {}",
            stats.generation + 1,
            stats.best,
            stats.average,
            stats.population_size
        );
    }
}

pub struct NullProgressCallback;

impl ProgressCallback for NullProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_stage(&mut self, _generation: usize, _stage: Stage) {}
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    Stage { generation: usize, stage: Stage },
    GenerationComplete(GenerationStats),
}

/// Forwards progress to another thread; a hung-up receiver is ignored.
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_stage(&mut self, generation: usize, stage: Stage) {
        let _ = self.sender.send(ProgressMessage::Stage { generation, stage });
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(stats.clone()));
    }
}
