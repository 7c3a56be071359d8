use labanevo::config::{Coefficient, ConfigManager, DegeneratePolicy, LegPolicy};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("labanevo_{}_{}.toml", name, std::process::id()))
}

#[test]
fn test_layered_file_and_environment() {
    let path = temp_path("layered");
    std::fs::write(
        &path,
        r#"
[evolution]
population_size = 50
degenerate_policy = "Uniform"

[fitness]
leg_policy = "Tiered"
"#,
    )
    .unwrap();

    std::env::set_var("LABANEVO_EVOLUTION__ITERATION_COUNT", "9");
    std::env::set_var("LABANEVO_EVOLUTION__POPULATION_SIZE", "60");

    let manager = ConfigManager::new();
    let result = manager.load_layered(Some(&path));

    std::env::remove_var("LABANEVO_EVOLUTION__ITERATION_COUNT");
    std::env::remove_var("LABANEVO_EVOLUTION__POPULATION_SIZE");
    let _ = std::fs::remove_file(&path);

    result.unwrap();
    let config = manager.get();
    // Environment wins over the file
    assert_eq!(config.evolution.population_size, 60);
    assert_eq!(config.evolution.iteration_count, 9);
    assert_eq!(config.evolution.degenerate_policy, DegeneratePolicy::Uniform);
    assert_eq!(config.fitness.leg_policy, LegPolicy::Tiered);
    // Untouched values keep their defaults
    assert_eq!(config.evolution.final_selection_size, 5);
    assert_eq!(config.fitness.get(Coefficient::EffortHigh), 1.4);
}

#[test]
fn test_missing_file_is_an_error() {
    let manager = ConfigManager::new();
    assert!(manager.load_layered(Some(&temp_path("does_not_exist"))).is_err());
}

#[test]
fn test_save_then_load() {
    let path = temp_path("saved");
    let manager = ConfigManager::new();
    manager
        .update(|c| {
            c.evolution.crossover_count = 4;
            c.fitness.set(Coefficient::BartenieffMedial, 3.3);
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let loaded = ConfigManager::new();
    let result = loaded.load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    result.unwrap();
    assert_eq!(loaded.get().evolution.crossover_count, 4);
    assert_eq!(loaded.get().fitness.get(Coefficient::BartenieffMedial), 3.3);
}

#[test]
fn test_invalid_file_is_rejected() {
    let path = temp_path("invalid");
    std::fs::write(&path, "[evolution]\nselection_fraction = 1.5\n").unwrap();

    let manager = ConfigManager::new();
    let result = manager.load_layered(Some(&path));
    let _ = std::fs::remove_file(&path);

    assert!(result.is_err());
    assert_eq!(manager.get().evolution.selection_fraction, 0.2);
}

#[test]
fn test_coefficient_values_clamp_into_fixed_bounds() {
    let path = temp_path("clamped");
    std::fs::write(&path, "[fitness]\neffort_low = 12.0\nbartenieff_distal = 2.5\n").unwrap();

    let manager = ConfigManager::new();
    let result = manager.load_layered(Some(&path));
    let _ = std::fs::remove_file(&path);

    result.unwrap();
    let fitness = manager.get().fitness;
    assert_eq!(fitness.get(Coefficient::EffortLow), 10.0);
    assert_eq!(fitness.get(Coefficient::BartenieffDistal), 2.5);
    assert_eq!(fitness.parameter(Coefficient::EffortLow).range(), (0.0, 10.0));
    assert_eq!(fitness.parameter(Coefficient::EffortLow).default_value(), 0.6);
}

#[test]
fn test_coefficient_bounds_cannot_be_redefined() {
    let path = temp_path("bounds");
    std::fs::write(
        &path,
        "[fitness.effort_low]\nmin = 50.0\nmax = 60.0\ndefault = 55.0\nvalue = 55.0\n",
    )
    .unwrap();

    let manager = ConfigManager::new();
    let result = manager.load_layered(Some(&path));
    let _ = std::fs::remove_file(&path);

    assert!(result.is_err());
    let fitness = manager.get().fitness;
    assert_eq!(fitness.get(Coefficient::EffortLow), 0.6);
    assert_eq!(fitness.parameter(Coefficient::EffortLow).range(), (0.0, 10.0));
}
