//! Layered run configuration: defaults, an optional TOML file, then flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use lane_defence_core::GameConfig;
use lane_defence_simulation::SpawningConfig;
use serde::Deserialize;

/// Tick budget used when neither the file nor the flags provide one.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 20_000;

/// Settings controlling a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) game: GameConfig,
    pub(crate) spawning: SpawnTuning,
    pub(crate) max_ticks: u64,
}

impl Settings {
    /// Spawner configuration seeded from the game config with the tuning applied.
    pub(crate) fn spawning_config(&self) -> SpawningConfig {
        let tuning = self.spawning;
        let mut config = SpawningConfig::new(self.game.rng_seed);
        if let Some(ms) = tuning.pickup_interval_ms {
            config = config.with_pickup_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = tuning.first_wave_ms {
            config = config.with_first_wave_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = tuning.min_wave_ms {
            config = config.with_min_wave_interval(Duration::from_millis(ms));
        }
        if let Some(max_batch) = tuning.max_batch {
            config = config.with_max_batch(max_batch);
        }
        config
    }
}

/// Optional `[spawning]` table adjusting the spawner cadence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct SpawnTuning {
    pub(crate) pickup_interval_ms: Option<u64>,
    pub(crate) first_wave_ms: Option<u64>,
    pub(crate) min_wave_ms: Option<u64>,
    pub(crate) max_batch: Option<u32>,
}

/// Values accepted from the command line, each overriding the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) waves: Option<u32>,
    pub(crate) currency: Option<u32>,
    pub(crate) max_ticks: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    #[serde(flatten)]
    game: GameConfig,
    spawning: SpawnTuning,
    max_ticks: Option<u64>,
}

/// Resolves the final settings, reading `path` when one is provided.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let file = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file at {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to parse config file at {}", path.display()))?
        }
        None => SettingsFile::default(),
    };

    let settings = apply_overrides(file, overrides);
    settings
        .game
        .validate()
        .context("configuration does not describe a playable field")?;
    Ok(settings)
}

fn parse(contents: &str) -> Result<SettingsFile> {
    toml::from_str(contents).context("invalid toml contents")
}

fn apply_overrides(file: SettingsFile, overrides: Overrides) -> Settings {
    let mut game = file.game;
    if let Some(seed) = overrides.seed {
        game.rng_seed = seed;
    }
    if let Some(waves) = overrides.waves {
        game.wave_target = waves;
    }
    if let Some(currency) = overrides.currency {
        game.starting_currency = currency;
    }

    Settings {
        game,
        spawning: file.spawning,
        max_ticks: overrides
            .max_ticks
            .or(file.max_ticks)
            .unwrap_or(DEFAULT_MAX_TICKS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load(None, Overrides::default()).expect("defaults are valid");
        assert_eq!(settings.game, GameConfig::default());
        assert_eq!(settings.max_ticks, DEFAULT_MAX_TICKS);
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        let file = parse(
            r#"
            rows = 3
            wave_target = 2
            max_ticks = 900
            "#,
        )
        .expect("valid toml");
        let settings = apply_overrides(file, Overrides::default());

        assert_eq!(settings.game.rows, 3);
        assert_eq!(settings.game.wave_target, 2);
        assert_eq!(settings.game.columns, GameConfig::default().columns);
        assert_eq!(settings.max_ticks, 900);
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse("wave_target = 2\nrng_seed = 7\nmax_ticks = 900").expect("valid toml");
        let settings = apply_overrides(
            file,
            Overrides {
                seed: Some(11),
                waves: Some(4),
                currency: Some(300),
                max_ticks: Some(50),
            },
        );

        assert_eq!(settings.game.rng_seed, 11);
        assert_eq!(settings.game.wave_target, 4);
        assert_eq!(settings.game.starting_currency, 300);
        assert_eq!(settings.max_ticks, 50);
    }

    #[test]
    fn spawning_table_tunes_the_spawner() {
        let file = parse(
            r#"
            rng_seed = 9

            [spawning]
            first_wave_ms = 4000
            max_batch = 1
            "#,
        )
        .expect("valid toml");
        let settings = apply_overrides(file, Overrides::default());

        assert_eq!(settings.game.rng_seed, 9);
        assert_eq!(
            settings.spawning,
            SpawnTuning {
                first_wave_ms: Some(4_000),
                max_batch: Some(1),
                ..SpawnTuning::default()
            }
        );

        let expected = SpawningConfig::new(9)
            .with_first_wave_interval(Duration::from_secs(4))
            .with_max_batch(1);
        assert_eq!(settings.spawning_config(), expected);
    }

    #[test]
    fn untuned_spawner_keeps_defaults() {
        let settings = load(None, Overrides::default()).expect("defaults are valid");
        assert_eq!(
            settings.spawning_config(),
            SpawningConfig::new(GameConfig::default().rng_seed)
        );
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(parse("rows = \"five\"").is_err());
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let error = load(
            None,
            Overrides {
                waves: Some(0),
                ..Overrides::default()
            },
        )
        .expect_err("zero waves cannot be won");
        assert!(format!("{error:#}").contains("wave target"));
    }
}
