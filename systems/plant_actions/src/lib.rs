#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns ready plants into production and firing commands.

use lane_defence_core::{Command, GameStatus, PlantAction, PlantSnapshot, PlantView, ZombieView};

/// Plant action system that queues commands for plants whose timers elapsed.
#[derive(Debug, Default)]
pub struct PlantActions {
    scratch: Vec<Command>,
}

impl PlantActions {
    /// Creates a new plant action system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ProducePickup` for ready generators and
    /// `Command::FireProjectile` for ready shooters facing a zombie.
    pub fn handle(
        &mut self,
        status: GameStatus,
        plants: &PlantView,
        zombies: &ZombieView,
        out: &mut Vec<Command>,
    ) {
        if status != GameStatus::Playing || plants.is_empty() {
            return;
        }

        self.scratch.clear();

        for plant in plants.iter().filter(|plant| plant.ready) {
            if let Some(command) = action_for(plant, zombies) {
                self.scratch.push(command);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn action_for(plant: &PlantSnapshot, zombies: &ZombieView) -> Option<Command> {
    match plant.kind.profile().action {
        PlantAction::None => None,
        PlantAction::ProducePickup { .. } => Some(Command::ProducePickup { plant: plant.id }),
        PlantAction::Fire { .. } => zombies
            .lane_occupied(plant.cell.row())
            .then_some(Command::FireProjectile { plant: plant.id }),
    }
}
