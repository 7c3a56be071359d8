use std::path::PathBuf;

use anyhow::{bail, Context};
use labanevo::config::ConfigManager;
use labanevo::engines::generation::{EvolutionEngine, EvolutionReport, LogProgressCallback};
use labanevo::types::Joint;

struct Args {
    config_path: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config_path: None,
        json: false,
    };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            "-h" | "--help" => {
                println!("Usage: labanevo [CONFIG.toml] [--json]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("Unknown option: {}", flag),
            path => {
                if args.config_path.is_some() {
                    bail!("Only one configuration file may be given");
                }
                args.config_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(args)
}

fn print_report(report: &EvolutionReport) {
    for (rank, skeleton) in report.selection.iter().enumerate() {
        println!("Skeleton {} (fitness {:.4})", rank + 1, skeleton.fitness_score());
        for joint in Joint::ALL {
            println!("  {:<24} {:>8.3} deg", joint.name(), skeleton.angle_degrees(joint));
        }
        println!("  effort                   {}", skeleton.effort());
        println!("  height                   {}", skeleton.height());
        if let Some(breakdown) = skeleton.fitness_breakdown() {
            println!(
                "  pattern                  {} ({:?} effort, quadrant score {})",
                breakdown.pattern, breakdown.effort_tier, breakdown.quadrant_score
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    let manager = ConfigManager::new();
    manager
        .load_layered(args.config_path.as_deref())
        .context("Failed to load configuration")?;
    let config = manager.get();

    let mut engine = EvolutionEngine::from_app_config(&config)?;
    let report = engine.run(LogProgressCallback)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
