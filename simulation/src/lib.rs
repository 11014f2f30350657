#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-tick driver that wires the world and the pure systems together.
//!
//! Every tick applies player inputs first, then advances the clock, lets the
//! spawner and the plants enqueue their commands, steps entities, resolves
//! projectiles and finally evaluates the outcome of the run.

use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, ConfigError, Event, FieldPoint, GameConfig, GameSnapshot, GameStatus,
    PlantKind, TickSchedule, WaveProgress,
};
use lane_defence_system_plant_actions::PlantActions;
use lane_defence_system_spawning::Spawning;
use lane_defence_world::{self as world, query, World};
use tracing::{debug, info, trace};

pub use lane_defence_system_spawning::Config as SpawningConfig;

/// Player requests accepted at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Places a plant of the given kind on the cell.
    PlacePlant {
        /// Kind of plant to place.
        kind: PlantKind,
        /// Target cell.
        cell: CellCoord,
    },
    /// Places the currently selected plant kind on the cell.
    PlaceSelected {
        /// Target cell.
        cell: CellCoord,
    },
    /// Arms a plant kind for a later [`Input::PlaceSelected`].
    SelectPlantType(PlantKind),
    /// Collects every pickup within reach of the point.
    CollectPickup(FieldPoint),
    /// Starts a fresh run from the stored configuration.
    Reset,
}

impl From<Input> for Command {
    fn from(input: Input) -> Self {
        match input {
            Input::PlacePlant { kind, cell } => Command::PlacePlant { kind, cell },
            Input::PlaceSelected { cell } => Command::PlaceSelected { cell },
            Input::SelectPlantType(kind) => Command::SelectPlant { kind },
            Input::CollectPickup(point) => Command::CollectPickups { point },
            Input::Reset => Command::Reset,
        }
    }
}

/// Owns the world and every system participating in a run.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    plant_actions: PlantActions,
    schedule: TickSchedule,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds a simulation for the provided configuration.
    pub fn initialize(config: GameConfig) -> Result<Self, ConfigError> {
        let spawning = SpawningConfig::new(config.rng_seed);
        Self::with_spawning(config, spawning)
    }

    /// Builds a simulation whose spawner uses a tuned cadence.
    pub fn with_spawning(
        config: GameConfig,
        spawning: SpawningConfig,
    ) -> Result<Self, ConfigError> {
        let schedule = config.tick_schedule();
        info!(
            rows = config.rows,
            columns = config.columns,
            wave_target = config.wave_target,
            seed = config.rng_seed,
            "simulation initialised"
        );
        let world = World::new(config)?;

        Ok(Self {
            world,
            spawning: Spawning::new(spawning),
            plant_actions: PlantActions::new(),
            schedule,
            events: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Advances one tick at the configured tick rate.
    ///
    /// Tick durations follow [`TickSchedule`], so every `tick_rate` steps add
    /// up to exactly one simulated second.
    pub fn step(&mut self, inputs: &[Input]) -> &[Event] {
        let dt = self.schedule.next_dt();
        self.tick(dt, inputs)
    }

    /// Advances the simulation by `dt` and returns the events it produced.
    ///
    /// Inputs are always applied. Once the run is lost or won the remaining
    /// phases are skipped until a [`Input::Reset`] arrives.
    pub fn tick(&mut self, dt: Duration, inputs: &[Input]) -> &[Event] {
        self.events.clear();

        for input in inputs {
            debug!(?input, "applying input");
            world::apply(&mut self.world, Command::from(*input), &mut self.events);
        }

        let status = query::status(&self.world);
        if status.is_terminal() {
            return &self.events;
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        self.spawning.handle(
            &self.events,
            status,
            &query::geometry(&self.world),
            query::waves(&self.world),
            query::zombies_alive(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.plant_actions.handle(
            status,
            &query::plant_view(&self.world),
            &query::zombie_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        for command in [
            Command::StepEntities,
            Command::ResolveCombat,
            Command::EvaluateOutcome,
        ] {
            world::apply(&mut self.world, command, &mut self.events);
        }

        trace!(
            tick = query::tick_index(&self.world),
            events = self.events.len(),
            zombies = query::zombies_alive(&self.world),
            currency = query::currency(&self.world),
            "tick complete"
        );
        &self.events
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Captures everything a presentation layer needs to draw a frame.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        query::snapshot(&self.world)
    }

    /// Overall state of the run.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Currency available to the player.
    #[must_use]
    pub fn currency(&self) -> u32 {
        query::currency(&self.world)
    }

    /// Wave counter paired with the wave target.
    #[must_use]
    pub fn waves(&self) -> WaveProgress {
        query::waves(&self.world)
    }

    /// Read-only access to the underlying world for detailed queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}
