//! Zombie storage and the per-tick advance/attack behavior.

use std::collections::BTreeMap;

use lane_defence_core::{
    Event, FieldGeometry, Health, PlantId, ZombieId, ZombieSnapshot, ZOMBIE_BITE_DAMAGE,
    ZOMBIE_BODY_LENGTH, ZOMBIE_MAX_HEALTH, ZOMBIE_REACH,
};
use tracing::debug;

use crate::{grid::Grid, plants::PlantRegistry};

/// Horizontal coordinate at or beyond which a zombie breaches the field.
const BREACH_LINE: f32 = 0.0;

#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    pub(crate) id: ZombieId,
    pub(crate) lane: u32,
    pub(crate) x: f32,
    speed: f32,
    pub(crate) health: Health,
    engaged: Option<PlantId>,
}

impl Zombie {
    pub(crate) fn is_defeated(&self) -> bool {
        self.health.is_depleted()
    }

    /// Reports whether a projectile at `x` overlaps the zombie's body.
    pub(crate) fn body_contains(&self, x: f32) -> bool {
        self.x - ZOMBIE_BODY_LENGTH <= x && x <= self.x + ZOMBIE_REACH
    }

    pub(crate) fn snapshot(&self) -> ZombieSnapshot {
        ZombieSnapshot {
            id: self.id,
            lane: self.lane,
            x: self.x,
            speed: self.speed,
            engaged: self.engaged,
            health: self.health,
        }
    }
}

/// Arena of live zombies keyed by spawn order.
#[derive(Debug)]
pub(crate) struct ZombieRegistry {
    entries: BTreeMap<ZombieId, Zombie>,
    next_zombie_id: ZombieId,
}

impl ZombieRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_zombie_id: ZombieId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, lane: u32, speed: f32, x: f32) -> ZombieId {
        let id = self.next_zombie_id;
        self.next_zombie_id = id.next();
        let _ = self.entries.insert(
            id,
            Zombie {
                id,
                lane,
                x,
                speed,
                health: Health::new(ZOMBIE_MAX_HEALTH),
                engaged: None,
            },
        );
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Zombie> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zombie> {
        self.entries.values_mut()
    }

    /// Removes every zombie whose health ran out during the tick.
    pub(crate) fn compact_defeated(&mut self, out_events: &mut Vec<Event>) {
        self.entries.retain(|id, zombie| {
            if zombie.is_defeated() {
                debug!(zombie = id.get(), lane = zombie.lane, "zombie defeated");
                out_events.push(Event::ZombieDefeated { zombie: *id });
                false
            } else {
                true
            }
        });
    }
}

/// Advances or attacks with every zombie, in spawn order.
///
/// Plants destroyed by a bite leave the registry and the grid immediately, so
/// later zombies in the same pass already see the freed cell. Returns whether
/// any zombie reached the breach line.
pub(crate) fn step(
    zombies: &mut ZombieRegistry,
    plants: &mut PlantRegistry,
    grid: &mut Grid,
    geometry: &FieldGeometry,
    out_events: &mut Vec<Event>,
) -> bool {
    let mut breached = false;

    for zombie in zombies.entries.values_mut() {
        // Defeated zombies stay put until compaction but still count at the edge.
        if !zombie.is_defeated() {
            match zombie.engaged {
                Some(target) => {
                    let destroyed = match plants.get_mut(target) {
                        Some(plant) => {
                            plant.health.apply_damage(ZOMBIE_BITE_DAMAGE);
                            plant.health.is_depleted()
                        }
                        // Another zombie finished the plant earlier in the pass or
                        // on a previous tick.
                        None => {
                            zombie.engaged = None;
                            false
                        }
                    };

                    if destroyed {
                        if let Some(plant) = plants.remove(target) {
                            let _ = grid.remove(plant.cell);
                            debug!(
                                plant = target.get(),
                                zombie = zombie.id.get(),
                                "plant destroyed"
                            );
                            out_events.push(Event::PlantDestroyed {
                                plant: target,
                                cell: plant.cell,
                            });
                        }
                        zombie.engaged = None;
                    }
                }
                None => {
                    zombie.x -= zombie.speed;
                    if let Some(target) = plants.engageable(zombie.lane, zombie.x, geometry) {
                        zombie.engaged = Some(target);
                        out_events.push(Event::ZombieEngaged {
                            zombie: zombie.id,
                            plant: target,
                        });
                    }
                }
            }
        }

        if zombie.x <= BREACH_LINE {
            breached = true;
            out_events.push(Event::ZombieBreached {
                zombie: zombie.id,
                lane: zombie.lane,
            });
        }
    }

    breached
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{CellCoord, PlantKind};

    fn geometry() -> FieldGeometry {
        FieldGeometry::new(3, 4, 80.0)
    }

    fn place(
        plants: &mut PlantRegistry,
        grid: &mut Grid,
        kind: PlantKind,
        cell: CellCoord,
    ) -> PlantId {
        let id = plants.allocate_id();
        grid.place(cell, id).expect("free cell");
        plants.insert(id, kind, cell);
        id
    }

    #[test]
    fn advancing_zombie_moves_by_its_speed() {
        let mut zombies = ZombieRegistry::new();
        let mut plants = PlantRegistry::new();
        let mut grid = Grid::new(3, 4);
        let id = zombies.spawn(1, 0.5, 400.0);
        let mut events = Vec::new();

        let breached = step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events);

        assert!(!breached);
        assert!(events.is_empty());
        let zombie = zombies.iter().find(|zombie| zombie.id == id).expect("zombie");
        assert!((zombie.x - 399.5).abs() < f32::EPSILON);
    }

    #[test]
    fn zombie_engages_and_freezes_in_front_of_plant() {
        let mut zombies = ZombieRegistry::new();
        let mut plants = PlantRegistry::new();
        let mut grid = Grid::new(3, 4);
        let plant = place(&mut plants, &mut grid, PlantKind::Blocker, CellCoord::new(0, 1));
        let zombie = zombies.spawn(0, 0.5, 170.0);
        let mut events = Vec::new();

        let _ = step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events);
        assert_eq!(events, vec![Event::ZombieEngaged { zombie, plant }]);

        events.clear();
        let _ = step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events);
        let snapshot = zombies.iter().next().expect("zombie").snapshot();
        assert!((snapshot.x - 169.5).abs() < f32::EPSILON);
        assert_eq!(snapshot.engaged, Some(plant));

        let health = plants.iter().next().expect("plant").health.get();
        assert!((health - (400.0 - ZOMBIE_BITE_DAMAGE)).abs() < f32::EPSILON);
    }

    #[test]
    fn lethal_bite_frees_the_cell_and_detaches() {
        let mut zombies = ZombieRegistry::new();
        let mut plants = PlantRegistry::new();
        let mut grid = Grid::new(3, 4);
        let cell = CellCoord::new(2, 0);
        let plant = place(&mut plants, &mut grid, PlantKind::Generator, cell);
        plants
            .get_mut(plant)
            .expect("plant")
            .health = Health::new(ZOMBIE_BITE_DAMAGE);
        let _ = zombies.spawn(2, 0.5, 85.0);
        let mut events = Vec::new();

        let _ = step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events);
        events.clear();
        let _ = step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events);

        assert_eq!(events, vec![Event::PlantDestroyed { plant, cell }]);
        assert!(!grid.cell_occupied(cell));
        assert!(!zombies.iter().next().expect("zombie").snapshot().is_engaged());
    }

    #[test]
    fn zombie_reaching_left_edge_breaches() {
        let mut zombies = ZombieRegistry::new();
        let mut plants = PlantRegistry::new();
        let mut grid = Grid::new(3, 4);
        let zombie = zombies.spawn(1, 0.5, 0.5);
        let mut events = Vec::new();

        assert!(step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events));
        assert_eq!(events, vec![Event::ZombieBreached { zombie, lane: 1 }]);
    }

    #[test]
    fn defeated_zombie_at_the_edge_still_breaches() {
        let mut zombies = ZombieRegistry::new();
        let mut plants = PlantRegistry::new();
        let mut grid = Grid::new(3, 4);
        let zombie = zombies.spawn(2, 0.5, 0.0);
        for entry in zombies.iter_mut() {
            entry.health.apply_damage(ZOMBIE_MAX_HEALTH);
        }
        let mut events = Vec::new();

        assert!(step(&mut zombies, &mut plants, &mut grid, &geometry(), &mut events));
        assert_eq!(events, vec![Event::ZombieBreached { zombie, lane: 2 }]);
        let remaining = zombies.iter().next().expect("zombie");
        assert!(remaining.x.abs() < f32::EPSILON);
    }

    #[test]
    fn body_span_extends_behind_and_ahead() {
        let mut zombies = ZombieRegistry::new();
        let _ = zombies.spawn(0, 0.5, 300.0);
        let zombie = zombies.iter().next().expect("zombie");
        assert!(zombie.body_contains(270.0));
        assert!(zombie.body_contains(310.0));
        assert!(!zombie.body_contains(269.0));
        assert!(!zombie.body_contains(311.0));
    }

    #[test]
    fn compaction_removes_only_defeated_zombies() {
        let mut zombies = ZombieRegistry::new();
        let doomed = zombies.spawn(0, 0.5, 300.0);
        let _ = zombies.spawn(1, 0.5, 300.0);
        for zombie in zombies.iter_mut() {
            if zombie.id == doomed {
                zombie.health.apply_damage(ZOMBIE_MAX_HEALTH);
            }
        }
        let mut events = Vec::new();

        zombies.compact_defeated(&mut events);

        assert_eq!(events, vec![Event::ZombieDefeated { zombie: doomed }]);
        assert_eq!(zombies.len(), 1);
    }
}
