#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Positions on the field are expressed in field units: `x` grows rightward
//! from the left edge of the grid and `y` grows downward from its top edge.
//! A single cell spans [`GameConfig::cell_length`] units along both axes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health every zombie spawns with.
pub const ZOMBIE_MAX_HEALTH: f32 = 100.0;
/// Slowest speed a zombie may roll at spawn, in field units per tick.
pub const ZOMBIE_MIN_SPEED: f32 = 0.3;
/// Fastest speed a zombie may roll at spawn, in field units per tick.
pub const ZOMBIE_MAX_SPEED: f32 = 0.7;
/// Damage an engaged zombie deals to its target plant every tick.
pub const ZOMBIE_BITE_DAMAGE: f32 = 0.5;
/// Maximum gap between a zombie's leading edge and a plant's right edge that
/// still allows the zombie to engage the plant.
pub const ENGAGEMENT_THRESHOLD: f32 = 10.0;
/// Length of a zombie's body trailing behind its leading edge.
pub const ZOMBIE_BODY_LENGTH: f32 = 30.0;
/// Distance ahead of a zombie's leading edge that still counts as a hit.
pub const ZOMBIE_REACH: f32 = 10.0;

/// Distance a projectile travels every tick.
pub const PROJECTILE_SPEED: f32 = 10.0;

/// Currency granted for every collected pickup.
pub const PICKUP_VALUE: u32 = 25;
/// Radius around a pickup's center that registers a collection.
pub const PICKUP_RADIUS: f32 = 20.0;
/// Simulated time a pickup stays on the field before it expires.
pub const PICKUP_LIFESPAN: Duration = Duration::from_secs(10);
/// Distance a falling pickup descends every tick.
pub const PICKUP_FALL_SPEED: f32 = 2.0;
/// Height above the grid at which sky pickups appear.
pub const SKY_PICKUP_SPAWN_Y: f32 = -120.0;
/// Horizontal offset of a generated pickup from its plant's left edge.
pub const GENERATOR_PICKUP_OFFSET: f32 = 20.0;
/// Margin kept between sky pickups and the field edges, also used as the
/// distance projectiles travel past the zombie entry line before expiring.
pub const FIELD_MARGIN: f32 = 50.0;

/// Describes the overall state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The run is in progress and entities are ticking.
    Playing,
    /// A zombie breached the left edge of the field.
    Lost,
    /// Every wave was spawned and no zombie remains alive.
    Won,
}

impl GameStatus {
    /// Reports whether the status freezes the simulation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Arms a plant type for subsequent [`Command::PlaceSelected`] requests.
    SelectPlant {
        /// Plant type the player wants to arm.
        kind: PlantKind,
    },
    /// Requests placement of a plant of the provided kind.
    PlacePlant {
        /// Type of plant to construct.
        kind: PlantKind,
        /// Cell the plant should occupy.
        cell: CellCoord,
    },
    /// Requests placement of the currently armed plant type.
    PlaceSelected {
        /// Cell the plant should occupy.
        cell: CellCoord,
    },
    /// Collects every pickup whose center lies within reach of the point.
    CollectPickups {
        /// Field position the player clicked.
        point: FieldPoint,
    },
    /// Drops a new falling pickup from above the field.
    SpawnPickup {
        /// Horizontal position of the drop.
        x: f32,
        /// Height at which the pickup stops falling.
        settle_y: f32,
    },
    /// Spawns a batch of zombies and counts it as one wave.
    SpawnWave {
        /// Zombies composing the batch, spawned in order.
        zombies: Vec<ZombieSpawn>,
    },
    /// Requests that a shooter plant fire a projectile down its lane.
    FireProjectile {
        /// Identifier of the firing plant.
        plant: PlantId,
    },
    /// Requests that a generator plant produce a pickup at its position.
    ProducePickup {
        /// Identifier of the producing plant.
        plant: PlantId,
    },
    /// Advances pickups and zombies by a single tick.
    StepEntities,
    /// Moves projectiles, applies hits, and compacts defeated entities.
    ResolveCombat,
    /// Evaluates the terminal conditions for the current tick.
    EvaluateOutcome,
    /// Discards the current run and rebuilds the world from its configuration.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a plant type was armed.
    PlantSelected {
        /// Plant type that is now armed.
        kind: PlantKind,
    },
    /// Reports that a selection request was rejected.
    SelectionRejected {
        /// Plant type requested for selection.
        kind: PlantKind,
        /// Specific reason the selection failed.
        reason: PlacementError,
    },
    /// Confirms that a plant was placed into the world.
    PlantPlaced {
        /// Identifier assigned to the plant by the world.
        plant: PlantId,
        /// Type of plant that was placed.
        kind: PlantKind,
        /// Cell occupied by the plant.
        cell: CellCoord,
    },
    /// Reports that a plant placement request was rejected.
    PlacementRejected {
        /// Type of plant requested for placement.
        kind: PlantKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a plant was destroyed by a zombie.
    PlantDestroyed {
        /// Identifier of the destroyed plant.
        plant: PlantId,
        /// Cell freed by the destruction.
        cell: CellCoord,
    },
    /// Confirms that a pickup appeared on the field.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Source that produced the pickup.
        origin: PickupOrigin,
    },
    /// Confirms that a pickup was collected.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Currency balance after the collection.
        balance: u32,
    },
    /// Reports that a pickup expired before it was collected.
    PickupExpired {
        /// Identifier of the expired pickup.
        pickup: PickupId,
    },
    /// Confirms that a batch of zombies was spawned.
    WaveSpawned {
        /// Number of waves spawned so far, including this one.
        wave: u32,
        /// Number of zombies in the batch.
        zombies: u32,
    },
    /// Confirms that a zombie entered the field.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Lane the zombie walks along.
        lane: u32,
    },
    /// Reports that a zombie stopped to attack a plant.
    ZombieEngaged {
        /// Identifier of the attacking zombie.
        zombie: ZombieId,
        /// Identifier of the plant under attack.
        plant: PlantId,
    },
    /// Reports that a zombie reached the left edge of the field.
    ZombieBreached {
        /// Identifier of the breaching zombie.
        zombie: ZombieId,
        /// Lane the zombie breached.
        lane: u32,
    },
    /// Confirms that a zombie ran out of health and was removed.
    ZombieDefeated {
        /// Identifier of the defeated zombie.
        zombie: ZombieId,
    },
    /// Confirms that a plant fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Identifier of the firing plant.
        plant: PlantId,
        /// Lane the projectile travels along.
        lane: u32,
    },
    /// Confirms that a projectile struck a zombie.
    ProjectileHit {
        /// Identifier of the projectile that landed.
        projectile: ProjectileId,
        /// Identifier of the zombie that was struck.
        zombie: ZombieId,
    },
    /// Announces that the run entered a new status.
    StatusChanged {
        /// Status that became active.
        status: GameStatus,
    },
    /// Confirms that the world was rebuilt from its configuration.
    WorldReset,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Returns the identifier that follows this one.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a plant.
    PlantId
);
entity_id!(
    /// Unique identifier assigned to a zombie.
    ZombieId
);
entity_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);
entity_id!(
    /// Unique identifier assigned to a pickup.
    PickupId
);

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate. Rows double as lanes.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Continuous position on the field measured in field units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Horizontal coordinate, growing rightward.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl FieldPoint {
    /// Creates a new field point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared(self, other: FieldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Remaining hit points of a plant or zombie, never below zero.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Health(f32);

impl Health {
    /// Creates a health value, flooring negative inputs at zero.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.max(0.0))
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Subtracts damage, flooring the result at zero.
    pub fn apply_damage(&mut self, damage: f32) {
        self.0 = (self.0 - damage).max(0.0);
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.0 <= 0.0
    }

    /// Fraction of `max` that remains, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        (self.0 / max).clamp(0.0, 1.0)
    }
}

/// Types of plants that can be placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    /// Produces pickups on a fixed cadence.
    Generator,
    /// Fires projectiles down its lane while zombies are present.
    Shooter,
    /// High-health obstacle without any timed action.
    Blocker,
}

impl PlantKind {
    /// Every plant kind in menu order.
    pub const ALL: [PlantKind; 3] = [Self::Generator, Self::Shooter, Self::Blocker];

    /// Returns the behavior table entry for the plant kind.
    #[must_use]
    pub const fn profile(self) -> PlantProfile {
        match self {
            Self::Generator => PlantProfile {
                cost: 50,
                max_health: 80.0,
                action: PlantAction::ProducePickup {
                    interval: Duration::from_secs(10),
                },
            },
            Self::Shooter => PlantProfile {
                cost: 100,
                max_health: 100.0,
                action: PlantAction::Fire {
                    interval: Duration::from_millis(1_500),
                    damage: 20.0,
                },
            },
            Self::Blocker => PlantProfile {
                cost: 50,
                max_health: 400.0,
                action: PlantAction::None,
            },
        }
    }

    /// Currency consumed when the plant is placed.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.profile().cost
    }

    /// Health the plant is placed with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        self.profile().max_health
    }
}

/// Static parameters describing a plant kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantProfile {
    /// Currency consumed when the plant is placed.
    pub cost: u32,
    /// Health the plant is placed with.
    pub max_health: f32,
    /// Timed action performed by the plant.
    pub action: PlantAction,
}

/// Timed behavior attached to a plant kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlantAction {
    /// The plant never acts on its own.
    None,
    /// The plant produces a static pickup every interval.
    ProducePickup {
        /// Simulated time between productions.
        interval: Duration,
    },
    /// The plant fires a projectile every interval while its lane is occupied.
    Fire {
        /// Simulated time between shots.
        interval: Duration,
        /// Damage carried by every projectile.
        damage: f32,
    },
}

impl PlantAction {
    /// Interval between actions, if the plant acts at all.
    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::ProducePickup { interval } | Self::Fire { interval, .. } => Some(*interval),
        }
    }
}

/// Source that produced a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupOrigin {
    /// Dropped from above the field by the spawner.
    Sky,
    /// Produced by the generator plant with the provided identifier.
    Generator(PlantId),
}

/// Parameters of a single zombie inside a [`Command::SpawnWave`] batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSpawn {
    /// Lane the zombie walks along.
    pub lane: u32,
    /// Distance the zombie advances every tick.
    pub speed: f32,
}

/// Wave counter paired with the number of waves required to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveProgress {
    /// Number of batches spawned so far.
    pub completed: u32,
    /// Number of batches that must be spawned before the run can be won.
    pub target: u32,
}

impl WaveProgress {
    /// Reports whether the wave quota has been reached.
    #[must_use]
    pub const fn quota_reached(&self) -> bool {
        self.completed >= self.target
    }
}

/// Reasons a plant placement or selection request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The run already ended, so the field no longer accepts plants.
    #[error("the run has ended")]
    GameOver,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already hosts a plant.
    #[error("cell is already occupied")]
    Occupied,
    /// The currency balance does not cover the plant's cost.
    #[error("insufficient currency")]
    InsufficientFunds,
}

/// Reasons a [`GameConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid must contain at least one row.
    #[error("field must contain at least one row")]
    ZeroRows,
    /// The grid must contain at least one column.
    #[error("field must contain at least one column")]
    ZeroColumns,
    /// Cells must have a finite, positive length.
    #[error("cell length must be finite and positive, got {0}")]
    InvalidCellLength(f32),
    /// The simulation must run at least one tick per second.
    #[error("tick rate must be positive")]
    ZeroTickRate,
    /// The run needs at least one wave.
    #[error("wave target must be positive")]
    ZeroWaveTarget,
}

/// Parameters required to initialise a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of lanes on the field.
    pub rows: u32,
    /// Number of plantable columns in every lane.
    pub columns: u32,
    /// Side length of a cell in field units.
    pub cell_length: f32,
    /// Currency available when the run starts.
    pub starting_currency: u32,
    /// Number of waves that must be spawned before the run can be won.
    pub wave_target: u32,
    /// Number of simulation ticks per simulated second.
    pub tick_rate: u32,
    /// Seed for the random source that drives spawning.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 9,
            cell_length: 80.0,
            starting_currency: 100,
            wave_target: 5,
            tick_rate: 30,
            rng_seed: 0x5eed_1a7e_d3f3_11ce,
        }
    }
}

impl GameConfig {
    /// Checks that the configuration describes a playable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if !self.cell_length.is_finite() || self.cell_length <= 0.0 {
            return Err(ConfigError::InvalidCellLength(self.cell_length));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.wave_target == 0 {
            return Err(ConfigError::ZeroWaveTarget);
        }
        Ok(())
    }

    /// Nominal simulated duration of a single tick, rounded down to the
    /// nanosecond.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    /// Sequence of tick durations that adds up to exactly one second every
    /// `tick_rate` ticks.
    #[must_use]
    pub const fn tick_schedule(&self) -> TickSchedule {
        TickSchedule::new(self.tick_rate)
    }

    /// Field layout derived from the configuration.
    #[must_use]
    pub const fn geometry(&self) -> FieldGeometry {
        FieldGeometry::new(self.rows, self.columns, self.cell_length)
    }
}

/// Splits simulated seconds into ticks without accumulating rounding error.
///
/// Tick `n` lasts `floor((n + 1) / rate) - floor(n / rate)` seconds measured
/// in nanoseconds, so any run of ticks whose nominal length is a whole number
/// of nanoseconds sums to exactly that length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSchedule {
    tick_rate: u32,
    index: u64,
}

impl TickSchedule {
    /// Creates a schedule for the provided number of ticks per second.
    #[must_use]
    pub const fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate,
            index: 0,
        }
    }

    /// Duration of the next tick.
    pub fn next_dt(&mut self) -> Duration {
        let rate = u128::from(self.tick_rate.max(1));
        let start = u128::from(self.index) * NANOS_PER_SECOND / rate;
        let end = (u128::from(self.index) + 1) * NANOS_PER_SECOND / rate;
        self.index = self.index.wrapping_add(1);
        Duration::from_nanos(u64::try_from(end - start).unwrap_or(u64::MAX))
    }
}

impl Iterator for TickSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_dt())
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Describes the lane layout of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldGeometry {
    rows: u32,
    columns: u32,
    cell_length: f32,
}

impl FieldGeometry {
    /// Creates a new field layout description.
    #[must_use]
    pub const fn new(rows: u32, columns: u32, cell_length: f32) -> Self {
        Self {
            rows,
            columns,
            cell_length,
        }
    }

    /// Number of lanes contained in the field.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in every lane.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Side length of a single square cell.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Horizontal coordinate of the cell's left edge.
    #[must_use]
    pub fn cell_left(&self, cell: CellCoord) -> f32 {
        cell.column() as f32 * self.cell_length
    }

    /// Horizontal coordinate of the cell's right edge.
    #[must_use]
    pub fn cell_right(&self, cell: CellCoord) -> f32 {
        self.cell_left(cell) + self.cell_length
    }

    /// Vertical coordinate of the cell's top edge.
    #[must_use]
    pub fn cell_top(&self, cell: CellCoord) -> f32 {
        cell.row() as f32 * self.cell_length
    }

    /// Horizontal position at which zombies enter their lane.
    #[must_use]
    pub fn zombie_entry_x(&self) -> f32 {
        self.width() + self.cell_length
    }

    /// Horizontal position past which projectiles leave the field.
    #[must_use]
    pub fn projectile_exit_x(&self) -> f32 {
        self.zombie_entry_x() + FIELD_MARGIN
    }

    /// Inclusive horizontal range used for sky pickup drops.
    #[must_use]
    pub fn sky_drop_range(&self) -> (f32, f32) {
        let low = FIELD_MARGIN;
        let high = (self.zombie_entry_x() - FIELD_MARGIN).max(low);
        (low, high)
    }

    /// Inclusive vertical range in which sky pickups settle.
    #[must_use]
    pub fn settle_range(&self) -> (f32, f32) {
        let low = FIELD_MARGIN;
        let high = (self.height() - FIELD_MARGIN).max(low);
        (low, high)
    }
}

/// Immutable representation of a single plant's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantSnapshot {
    /// Identifier allocated to the plant by the world.
    pub id: PlantId,
    /// Kind of plant that was placed.
    pub kind: PlantKind,
    /// Cell occupied by the plant.
    pub cell: CellCoord,
    /// Remaining health of the plant.
    pub health: Health,
    /// Indicates whether the plant's action timer has elapsed.
    pub ready: bool,
}

impl PlantSnapshot {
    /// Fraction of the plant's maximum health that remains.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        self.health.ratio(self.kind.max_health())
    }
}

/// Read-only snapshot describing all plants on the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlantView {
    snapshots: Vec<PlantSnapshot>,
}

impl PlantView {
    /// Creates a new plant view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlantSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured plant snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PlantSnapshot> {
        self.snapshots.iter()
    }

    /// Number of plants captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no plants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Unique identifier assigned to the zombie.
    pub id: ZombieId,
    /// Lane the zombie walks along.
    pub lane: u32,
    /// Horizontal position of the zombie's leading edge.
    pub x: f32,
    /// Distance the zombie advances every tick.
    pub speed: f32,
    /// Plant the zombie is attacking, if any.
    pub engaged: Option<PlantId>,
    /// Remaining health of the zombie.
    pub health: Health,
}

impl ZombieSnapshot {
    /// Reports whether the zombie is frozen in an attack.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged.is_some()
    }

    /// Fraction of the zombie's maximum health that remains.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        self.health.ratio(ZOMBIE_MAX_HEALTH)
    }
}

/// Read-only snapshot describing all zombies on the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a new zombie view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured zombie snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the zombies walking along the provided lane.
    pub fn in_lane(&self, lane: u32) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.lane == lane)
    }

    /// Reports whether at least one zombie walks along the lane.
    #[must_use]
    pub fn lane_occupied(&self, lane: u32) -> bool {
        self.in_lane(lane).next().is_some()
    }

    /// Number of zombies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no zombies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Horizontal position of the projectile.
    pub x: f32,
    /// Damage the projectile deals on impact.
    pub damage: f32,
}

/// Immutable representation of an uncollected pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier assigned to the pickup.
    pub id: PickupId,
    /// Current center of the pickup.
    pub position: FieldPoint,
    /// Indicates whether the pickup is still descending.
    pub falling: bool,
    /// Source that produced the pickup.
    pub origin: PickupOrigin,
    /// Simulated time since the pickup appeared.
    pub age: Duration,
}

/// Everything a presentation layer needs to draw a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    /// Layout of the field.
    pub geometry: FieldGeometry,
    /// Plants on the grid.
    pub plants: PlantView,
    /// Zombies on the field.
    pub zombies: ZombieView,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Pickups awaiting collection.
    pub pickups: Vec<PickupSnapshot>,
    /// Currency available to the player.
    pub currency: u32,
    /// Wave counter and target.
    pub waves: WaveProgress,
    /// Overall state of the run.
    pub status: GameStatus,
    /// Plant type armed for placement, if any.
    pub selection: Option<PlantKind>,
}
