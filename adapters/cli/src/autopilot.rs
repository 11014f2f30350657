//! Scripted player used by the headless runner.
//!
//! Each tick the autopilot collects every pickup it can see, keeps one
//! generator at the back of every lane and answers zombies with shooters
//! placed behind the front line of the threatened lane.

use lane_defence_core::{CellCoord, GameSnapshot, GameStatus, PlantKind};
use lane_defence_simulation::Input;

/// Deterministic strategy turning snapshots into inputs.
#[derive(Debug, Default)]
pub(crate) struct Autopilot;

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Chooses the inputs for the next tick.
    pub(crate) fn plan(&self, snapshot: &GameSnapshot) -> Vec<Input> {
        if snapshot.status != GameStatus::Playing {
            return Vec::new();
        }

        let mut inputs: Vec<Input> = snapshot
            .pickups
            .iter()
            .filter(|pickup| !pickup.falling)
            .map(|pickup| Input::CollectPickup(pickup.position))
            .collect();

        if let Some(placement) = next_placement(snapshot) {
            inputs.push(placement);
        }
        inputs
    }
}

fn next_placement(snapshot: &GameSnapshot) -> Option<Input> {
    let rows = snapshot.geometry.rows();
    let columns = snapshot.geometry.columns();
    let occupied = |cell: CellCoord| snapshot.plants.iter().any(|plant| plant.cell == cell);

    let threatened = (0..rows).find(|lane| {
        snapshot.zombies.lane_occupied(*lane)
            && !snapshot
                .plants
                .iter()
                .any(|plant| plant.cell.row() == *lane && plant.kind == PlantKind::Shooter)
    });

    if let Some(lane) = threatened {
        if snapshot.currency < PlantKind::Shooter.cost() {
            return None;
        }
        return (1..columns)
            .map(|column| CellCoord::new(lane, column))
            .find(|cell| !occupied(*cell))
            .map(|cell| Input::PlacePlant {
                kind: PlantKind::Shooter,
                cell,
            });
    }

    if snapshot.currency < PlantKind::Generator.cost() {
        return None;
    }
    (0..rows)
        .map(|row| CellCoord::new(row, 0))
        .find(|cell| !occupied(*cell))
        .map(|cell| Input::PlacePlant {
            kind: PlantKind::Generator,
            cell,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{
        FieldPoint, GameConfig, Health, PickupId, PickupOrigin, PickupSnapshot, PlantId,
        PlantSnapshot, PlantView, WaveProgress, ZombieId, ZombieSnapshot, ZombieView,
    };
    use std::time::Duration;

    fn snapshot(currency: u32) -> GameSnapshot {
        GameSnapshot {
            geometry: GameConfig::default().geometry(),
            plants: PlantView::default(),
            zombies: ZombieView::default(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            currency,
            waves: WaveProgress {
                completed: 0,
                target: 5,
            },
            status: GameStatus::Playing,
            selection: None,
        }
    }

    fn plant(id: u32, kind: PlantKind, cell: CellCoord) -> PlantSnapshot {
        PlantSnapshot {
            id: PlantId::new(id),
            kind,
            cell,
            health: Health::new(kind.max_health()),
            ready: false,
        }
    }

    #[test]
    fn opens_with_a_generator_in_the_first_lane() {
        let inputs = Autopilot::new().plan(&snapshot(100));
        assert_eq!(
            inputs,
            vec![Input::PlacePlant {
                kind: PlantKind::Generator,
                cell: CellCoord::new(0, 0),
            }]
        );
    }

    #[test]
    fn collects_only_settled_pickups() {
        let mut state = snapshot(0);
        let settled = FieldPoint::new(120.0, 200.0);
        state.pickups = vec![
            PickupSnapshot {
                id: PickupId::new(0),
                position: settled,
                falling: false,
                origin: PickupOrigin::Sky,
                age: Duration::from_secs(2),
            },
            PickupSnapshot {
                id: PickupId::new(1),
                position: FieldPoint::new(300.0, -40.0),
                falling: true,
                origin: PickupOrigin::Sky,
                age: Duration::from_secs(1),
            },
        ];

        let inputs = Autopilot::new().plan(&state);

        assert_eq!(inputs, vec![Input::CollectPickup(settled)]);
    }

    #[test]
    fn threatened_lane_gets_a_shooter_behind_its_generator() {
        let mut state = snapshot(150);
        state.plants = PlantView::from_snapshots(vec![plant(
            0,
            PlantKind::Generator,
            CellCoord::new(3, 0),
        )]);
        state.zombies = ZombieView::from_snapshots(vec![ZombieSnapshot {
            id: ZombieId::new(0),
            lane: 3,
            x: 700.0,
            speed: 0.4,
            engaged: None,
            health: Health::new(100.0),
        }]);

        let inputs = Autopilot::new().plan(&state);

        assert_eq!(
            inputs,
            vec![Input::PlacePlant {
                kind: PlantKind::Shooter,
                cell: CellCoord::new(3, 1),
            }]
        );
    }

    #[test]
    fn saves_up_while_a_threat_is_unanswered() {
        let mut state = snapshot(60);
        state.zombies = ZombieView::from_snapshots(vec![ZombieSnapshot {
            id: ZombieId::new(0),
            lane: 1,
            x: 700.0,
            speed: 0.4,
            engaged: None,
            health: Health::new(100.0),
        }]);

        assert!(Autopilot::new().plan(&state).is_empty());
    }

    #[test]
    fn finished_runs_need_no_inputs() {
        let mut state = snapshot(500);
        state.status = GameStatus::Won;
        assert!(Autopilot::new().plan(&state).is_empty());
    }
}
