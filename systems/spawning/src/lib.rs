#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for sky pickups and zombie waves.

use std::time::Duration;

use lane_defence_core::{
    Command, Event, FieldGeometry, GameStatus, WaveProgress, ZombieSpawn, ZOMBIE_MAX_SPEED,
    ZOMBIE_MIN_SPEED,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_PICKUP_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_FIRST_WAVE_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_MIN_WAVE_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_BATCH: u32 = 3;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
    pickup_interval: Duration,
    first_wave_interval: Duration,
    min_wave_interval: Duration,
    max_batch: u32,
}

impl Config {
    /// Creates a configuration with the default cadence and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            pickup_interval: DEFAULT_PICKUP_INTERVAL,
            first_wave_interval: DEFAULT_FIRST_WAVE_INTERVAL,
            min_wave_interval: DEFAULT_MIN_WAVE_INTERVAL,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    /// Overrides the delay between sky pickup drops.
    #[must_use]
    pub const fn with_pickup_interval(mut self, interval: Duration) -> Self {
        self.pickup_interval = interval;
        self
    }

    /// Overrides the delay before the first wave. Later waves arrive one
    /// second sooner per completed wave.
    #[must_use]
    pub const fn with_first_wave_interval(mut self, interval: Duration) -> Self {
        self.first_wave_interval = interval;
        self
    }

    /// Overrides the shortest delay between waves.
    #[must_use]
    pub const fn with_min_wave_interval(mut self, interval: Duration) -> Self {
        self.min_wave_interval = interval;
        self
    }

    /// Overrides the largest number of zombies a single wave may hold.
    #[must_use]
    pub const fn with_max_batch(mut self, max_batch: u32) -> Self {
        self.max_batch = max_batch;
        self
    }
}

/// Pure system that emits pickup and wave commands as simulated time passes.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    pickup_accumulator: Duration,
    wave_accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pickup_accumulator: Duration::ZERO,
            wave_accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Clears both accumulators while keeping the random stream where it is.
    fn reset(&mut self) {
        self.pickup_accumulator = Duration::ZERO;
        self.wave_accumulator = Duration::ZERO;
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Pickups drop once per elapsed interval, so a large `dt` may produce
    /// several. Waves are limited to one per call.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: GameStatus,
        geometry: &FieldGeometry,
        waves: WaveProgress,
        zombies_alive: usize,
        out: &mut Vec<Command>,
    ) {
        if events.iter().any(|event| matches!(event, Event::WorldReset)) {
            self.reset();
        }

        if status != GameStatus::Playing {
            return;
        }

        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if accumulated.is_zero() {
            return;
        }

        self.pickup_accumulator = self.pickup_accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_pickup_drops() {
            let command = self.sky_pickup(geometry);
            out.push(command);
        }

        if waves.quota_reached() && zombies_alive == 0 {
            return;
        }

        self.wave_accumulator = self.wave_accumulator.saturating_add(accumulated);
        let interval = self.wave_interval(waves.completed);
        if !interval.is_zero() && self.wave_accumulator >= interval {
            self.wave_accumulator -= interval;
            let zombies = self.wave(geometry, waves.completed);
            out.push(Command::SpawnWave { zombies });
        }
    }

    fn resolve_pickup_drops(&mut self) -> usize {
        let interval = self.config.pickup_interval;
        if interval.is_zero() {
            return 0;
        }

        let mut drops = 0;
        while self.pickup_accumulator >= interval {
            self.pickup_accumulator -= interval;
            drops += 1;
        }
        drops
    }

    fn wave_interval(&self, completed: u32) -> Duration {
        self.config
            .first_wave_interval
            .saturating_sub(Duration::from_secs(u64::from(completed)))
            .max(self.config.min_wave_interval)
    }

    fn sky_pickup(&mut self, geometry: &FieldGeometry) -> Command {
        let x = sample(&mut self.rng, geometry.sky_drop_range());
        let settle_y = sample(&mut self.rng, geometry.settle_range());
        Command::SpawnPickup { x, settle_y }
    }

    fn wave(&mut self, geometry: &FieldGeometry, completed: u32) -> Vec<ZombieSpawn> {
        let size = batch_size(completed, self.config.max_batch);
        (0..size)
            .map(|_| ZombieSpawn {
                lane: self.rng.gen_range(0..geometry.rows().max(1)),
                speed: self.rng.gen_range(ZOMBIE_MIN_SPEED..=ZOMBIE_MAX_SPEED),
            })
            .collect()
    }
}

/// Number of zombies in the wave that follows `completed` earlier waves.
fn batch_size(completed: u32, max_batch: u32) -> u32 {
    completed.saturating_add(1).min(max_batch)
}

fn sample(rng: &mut ChaCha8Rng, (low, high): (f32, f32)) -> f32 {
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_grow_until_capped() {
        assert_eq!(batch_size(0, 3), 1);
        assert_eq!(batch_size(1, 3), 2);
        assert_eq!(batch_size(2, 3), 3);
        assert_eq!(batch_size(9, 3), 3);
    }

    #[test]
    fn wave_interval_shrinks_to_floor() {
        let spawning = Spawning::new(Config::new(7));
        assert_eq!(spawning.wave_interval(0), Duration::from_secs(10));
        assert_eq!(spawning.wave_interval(4), Duration::from_secs(6));
        assert_eq!(spawning.wave_interval(7), Duration::from_secs(3));
        assert_eq!(spawning.wave_interval(40), Duration::from_secs(3));
    }

    #[test]
    fn tuned_cadence_replaces_defaults() {
        let config = Config::new(7)
            .with_first_wave_interval(Duration::from_secs(4))
            .with_min_wave_interval(Duration::from_secs(2))
            .with_max_batch(1);
        let mut spawning = Spawning::new(config);
        assert_eq!(spawning.wave_interval(0), Duration::from_secs(4));
        assert_eq!(spawning.wave_interval(1), Duration::from_secs(3));
        assert_eq!(spawning.wave_interval(5), Duration::from_secs(2));

        let geometry = FieldGeometry::new(5, 9, 80.0);
        assert_eq!(spawning.wave(&geometry, 6).len(), 1);
    }

    #[test]
    fn resolves_pickup_drops_without_interval() {
        let mut spawning =
            Spawning::new(Config::new(1).with_pickup_interval(Duration::ZERO));
        spawning.pickup_accumulator = Duration::from_secs(10);
        assert_eq!(spawning.resolve_pickup_drops(), 0);
    }

    #[test]
    fn degenerate_ranges_collapse_to_lower_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(sample(&mut rng, (50.0, 50.0)), 50.0);
        assert_eq!(sample(&mut rng, (50.0, 10.0)), 50.0);
    }
}
