#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.

use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, ConfigError, Event, FieldGeometry, FieldPoint, GameConfig, GameStatus,
    PickupOrigin, PlacementError, PlantAction, PlantId, PlantKind, WaveProgress, ZombieSpawn,
    GENERATOR_PICKUP_OFFSET, PICKUP_VALUE, SKY_PICKUP_SPAWN_Y,
};
use tracing::{debug, info};

mod combat;
mod grid;
mod pickups;
mod plants;
mod zombies;

pub use grid::GridError;

use combat::ProjectileRegistry;
use grid::Grid;
use pickups::PickupRegistry;
use plants::PlantRegistry;
use zombies::ZombieRegistry;

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    geometry: FieldGeometry,
    grid: Grid,
    plants: PlantRegistry,
    zombies: ZombieRegistry,
    projectiles: ProjectileRegistry,
    pickups: PickupRegistry,
    currency: u32,
    waves: WaveProgress,
    status: GameStatus,
    selection: Option<PlantKind>,
    clock: Duration,
    tick_index: u64,
    breach_registered: bool,
}

impl World {
    /// Creates a fresh world for the provided configuration.
    ///
    /// Fails when the configuration does not describe a playable field.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: GameConfig) -> Self {
        let geometry = config.geometry();
        Self {
            grid: Grid::new(geometry.rows(), geometry.columns()),
            plants: PlantRegistry::new(),
            zombies: ZombieRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            pickups: PickupRegistry::new(),
            currency: config.starting_currency,
            waves: WaveProgress {
                completed: 0,
                target: config.wave_target,
            },
            status: GameStatus::Playing,
            selection: None,
            clock: Duration::ZERO,
            tick_index: 0,
            breach_registered: false,
            geometry,
            config,
        }
    }

    fn is_running(&self) -> bool {
        !self.status.is_terminal()
    }

    fn select_plant(&mut self, kind: PlantKind, out_events: &mut Vec<Event>) {
        let verdict = if !self.is_running() {
            Err(PlacementError::GameOver)
        } else if self.currency < kind.cost() {
            Err(PlacementError::InsufficientFunds)
        } else {
            Ok(())
        };

        match verdict {
            Ok(()) => {
                self.selection = Some(kind);
                out_events.push(Event::PlantSelected { kind });
            }
            Err(reason) => out_events.push(Event::SelectionRejected { kind, reason }),
        }
    }

    fn place_plant(&mut self, kind: PlantKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        self.selection = None;
        match self.try_place(kind, cell) {
            Ok(plant) => {
                debug!(
                    plant = plant.get(),
                    ?kind,
                    row = cell.row(),
                    column = cell.column(),
                    balance = self.currency,
                    "plant placed"
                );
                out_events.push(Event::PlantPlaced { plant, kind, cell });
            }
            Err(reason) => {
                debug!(
                    ?kind,
                    row = cell.row(),
                    column = cell.column(),
                    %reason,
                    "placement rejected"
                );
                out_events.push(Event::PlacementRejected { kind, cell, reason });
            }
        }
    }

    fn try_place(&mut self, kind: PlantKind, cell: CellCoord) -> Result<PlantId, PlacementError> {
        if !self.is_running() {
            return Err(PlacementError::GameOver);
        }
        self.grid.check(cell)?;
        let remaining = self
            .currency
            .checked_sub(kind.cost())
            .ok_or(PlacementError::InsufficientFunds)?;

        let plant = self.plants.allocate_id();
        self.grid.place(cell, plant)?;
        self.plants.insert(plant, kind, cell);
        self.currency = remaining;
        Ok(plant)
    }

    fn collect_pickups(&mut self, point: FieldPoint, out_events: &mut Vec<Event>) {
        for pickup in self.pickups.collect_at(point) {
            self.currency = self.currency.saturating_add(PICKUP_VALUE);
            out_events.push(Event::PickupCollected {
                pickup,
                balance: self.currency,
            });
        }
    }

    fn fire_projectile(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        let Some(shooter) = self.plants.get_mut(plant) else {
            return;
        };
        let PlantAction::Fire { damage, .. } = shooter.action() else {
            return;
        };
        if !shooter.is_ready() {
            return;
        }

        shooter.consume_interval();
        let lane = shooter.cell.row();
        let x = self.geometry.cell_right(shooter.cell);
        let projectile = self.projectiles.fire(lane, x, damage);
        out_events.push(Event::ProjectileFired {
            projectile,
            plant,
            lane,
        });
    }

    fn produce_pickup(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        let Some(generator) = self.plants.get_mut(plant) else {
            return;
        };
        if !matches!(generator.action(), PlantAction::ProducePickup { .. }) || !generator.is_ready()
        {
            return;
        }

        generator.consume_interval();
        let cell = generator.cell;
        let position = FieldPoint::new(
            self.geometry.cell_left(cell) + GENERATOR_PICKUP_OFFSET,
            self.geometry.cell_top(cell),
        );
        let origin = PickupOrigin::Generator(plant);
        let pickup = self.pickups.spawn_resting(position, origin);
        out_events.push(Event::PickupSpawned { pickup, origin });
    }

    fn spawn_wave(&mut self, spawns: Vec<ZombieSpawn>, out_events: &mut Vec<Event>) {
        let entry_x = self.geometry.zombie_entry_x();
        let mut spawned = 0_u32;
        for spawn in spawns {
            if spawn.lane >= self.geometry.rows() {
                continue;
            }
            let zombie = self.zombies.spawn(spawn.lane, spawn.speed, entry_x);
            spawned += 1;
            out_events.push(Event::ZombieSpawned {
                zombie,
                lane: spawn.lane,
            });
        }

        if spawned == 0 {
            return;
        }

        self.waves.completed = self.waves.completed.saturating_add(1);
        debug!(
            wave = self.waves.completed,
            target = self.waves.target,
            zombies = spawned,
            "wave spawned"
        );
        out_events.push(Event::WaveSpawned {
            wave: self.waves.completed,
            zombies: spawned,
        });
    }

    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        let next = if self.breach_registered {
            GameStatus::Lost
        } else if self.waves.quota_reached() && self.zombies.is_empty() {
            GameStatus::Won
        } else {
            return;
        };

        self.status = next;
        self.selection = None;
        info!(
            status = ?next,
            waves = self.waves.completed,
            tick = self.tick_index,
            "run finished"
        );
        out_events.push(Event::StatusChanged { status: next });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::from_validated(GameConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the run is lost or won every command except [`Command::Reset`] is
/// ignored, apart from placement and selection requests which are answered
/// with a rejection event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Reset => {
            *world = World::from_validated(world.config.clone());
            info!("world reset");
            out_events.push(Event::WorldReset);
        }
        Command::SelectPlant { kind } => world.select_plant(kind, out_events),
        Command::PlacePlant { kind, cell } => world.place_plant(kind, cell, out_events),
        Command::PlaceSelected { cell } => {
            if let Some(kind) = world.selection {
                world.place_plant(kind, cell, out_events);
            }
        }
        _ if !world.is_running() => {}
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            for plant in world.plants.iter_mut() {
                plant.advance_timer(dt);
            }
            world.pickups.age_all(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::CollectPickups { point } => world.collect_pickups(point, out_events),
        Command::SpawnPickup { x, settle_y } => {
            let position = FieldPoint::new(x, SKY_PICKUP_SPAWN_Y);
            let pickup = world.pickups.spawn_falling(position, settle_y);
            out_events.push(Event::PickupSpawned {
                pickup,
                origin: PickupOrigin::Sky,
            });
        }
        Command::SpawnWave { zombies } => world.spawn_wave(zombies, out_events),
        Command::FireProjectile { plant } => world.fire_projectile(plant, out_events),
        Command::ProducePickup { plant } => world.produce_pickup(plant, out_events),
        Command::StepEntities => {
            world.pickups.step(out_events);
            if zombies::step(
                &mut world.zombies,
                &mut world.plants,
                &mut world.grid,
                &world.geometry,
                out_events,
            ) {
                world.breach_registered = true;
            }
        }
        Command::ResolveCombat => {
            combat::resolve(
                &mut world.projectiles,
                &mut world.zombies,
                &world.geometry,
                out_events,
            );
            world.zombies.compact_defeated(out_events);
        }
        Command::EvaluateOutcome => world.evaluate_outcome(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use lane_defence_core::{
        CellCoord, FieldGeometry, GameSnapshot, GameStatus, PickupSnapshot, PlantId, PlantKind,
        PlantView, ProjectileSnapshot, WaveProgress, ZombieView,
    };

    /// Layout of the field.
    #[must_use]
    pub fn geometry(world: &World) -> FieldGeometry {
        world.geometry
    }

    /// Overall state of the run.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Currency available to the player.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.currency
    }

    /// Wave counter paired with the wave target.
    #[must_use]
    pub fn waves(world: &World) -> WaveProgress {
        world.waves
    }

    /// Plant type armed for placement, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<PlantKind> {
        world.selection
    }

    /// Total simulated time accumulated by ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed since the run started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether a plant occupies the provided cell.
    #[must_use]
    pub fn cell_occupied(world: &World, cell: CellCoord) -> bool {
        world.grid.cell_occupied(cell)
    }

    /// Returns the plant occupying the provided cell, if any.
    #[must_use]
    pub fn plant_at(world: &World, cell: CellCoord) -> Option<PlantId> {
        world.grid.occupant(cell)
    }

    /// Captures a read-only view of the plants on the grid.
    #[must_use]
    pub fn plant_view(world: &World) -> PlantView {
        PlantView::from_snapshots(world.plants.iter().map(|plant| plant.snapshot()).collect())
    }

    /// Captures a read-only view of the zombies on the field.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        ZombieView::from_snapshots(world.zombies.iter().map(|zombie| zombie.snapshot()).collect())
    }

    /// Number of zombies still alive on the field.
    #[must_use]
    pub fn zombies_alive(world: &World) -> usize {
        world.zombies.len()
    }

    /// Projectiles currently in flight, in firing order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.projectiles.snapshots()
    }

    /// Pickups awaiting collection, in creation order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world.pickups.snapshots()
    }

    /// Captures everything a presentation layer needs to draw a frame.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            geometry: world.geometry,
            plants: plant_view(world),
            zombies: zombie_view(world),
            projectiles: projectiles(world),
            pickups: pickups(world),
            currency: world.currency,
            waves: world.waves,
            status: world.status,
            selection: world.selection,
        }
    }
}
