//! Authoritative plant state management utilities.

use std::{collections::BTreeMap, time::Duration};

use lane_defence_core::{
    CellCoord, FieldGeometry, Health, PlantAction, PlantId, PlantKind, PlantSnapshot,
    ENGAGEMENT_THRESHOLD,
};

/// State of a plant stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Plant {
    pub(crate) id: PlantId,
    pub(crate) kind: PlantKind,
    pub(crate) cell: CellCoord,
    pub(crate) health: Health,
    /// Simulated time since the last action. Stops growing once it reaches the
    /// action interval, so at most one tick of overshoot is carried.
    action_elapsed: Duration,
}

impl Plant {
    fn new(id: PlantId, kind: PlantKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            health: Health::new(kind.max_health()),
            action_elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn action(&self) -> PlantAction {
        self.kind.profile().action
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.action()
            .interval()
            .map_or(false, |interval| self.action_elapsed >= interval)
    }

    pub(crate) fn advance_timer(&mut self, dt: Duration) {
        if let Some(interval) = self.action().interval() {
            if self.action_elapsed < interval {
                self.action_elapsed = self.action_elapsed.saturating_add(dt);
            }
        }
    }

    /// Starts the next interval, keeping the part of the last tick that ran
    /// past the previous one.
    pub(crate) fn consume_interval(&mut self) {
        if let Some(interval) = self.action().interval() {
            self.action_elapsed = self.action_elapsed.saturating_sub(interval).min(interval);
        }
    }

    pub(crate) fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            health: self.health,
            ready: self.is_ready(),
        }
    }
}

/// Registry that stores plants and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct PlantRegistry {
    entries: BTreeMap<PlantId, Plant>,
    next_plant_id: PlantId,
}

impl PlantRegistry {
    /// Creates an empty plant registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_plant_id: PlantId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> PlantId {
        let id = self.next_plant_id;
        self.next_plant_id = id.next();
        id
    }

    pub(crate) fn insert(&mut self, id: PlantId, kind: PlantKind, cell: CellCoord) {
        let _ = self.entries.insert(id, Plant::new(id, kind, cell));
    }

    pub(crate) fn get_mut(&mut self, id: PlantId) -> Option<&mut Plant> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: PlantId) -> Option<Plant> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Plant> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Plant> {
        self.entries.values_mut()
    }

    /// Finds the plant a zombie at `x` in `lane` would bite into.
    ///
    /// A plant qualifies when its left edge lies behind the zombie's leading
    /// edge and its right edge is less than [`ENGAGEMENT_THRESHOLD`] ahead of
    /// it. Among qualifying plants the one with the greatest right edge wins.
    pub(crate) fn engageable(
        &self,
        lane: u32,
        x: f32,
        geometry: &FieldGeometry,
    ) -> Option<PlantId> {
        let mut best: Option<(f32, PlantId)> = None;
        for plant in self.entries.values() {
            if plant.cell.row() != lane {
                continue;
            }

            let left = geometry.cell_left(plant.cell);
            let right = geometry.cell_right(plant.cell);
            if left >= x || x - right >= ENGAGEMENT_THRESHOLD {
                continue;
            }

            match best {
                Some((best_right, _)) if best_right >= right => {}
                _ => best = Some((right, plant.id)),
            }
        }
        best.map(|(_, id)| id)
    }
}
