//! Currency pickups: falling sky drops and generator produce.

use std::{collections::BTreeMap, time::Duration};

use lane_defence_core::{
    Event, FieldPoint, PickupId, PickupOrigin, PickupSnapshot, PICKUP_FALL_SPEED,
    PICKUP_LIFESPAN, PICKUP_RADIUS,
};

#[derive(Clone, Debug)]
struct Pickup {
    position: FieldPoint,
    settle_y: f32,
    age: Duration,
    origin: PickupOrigin,
}

impl Pickup {
    fn is_falling(&self) -> bool {
        self.position.y < self.settle_y
    }

    fn is_expired(&self) -> bool {
        self.age > PICKUP_LIFESPAN
    }
}

/// Arena of uncollected pickups keyed by creation order.
#[derive(Debug)]
pub(crate) struct PickupRegistry {
    entries: BTreeMap<PickupId, Pickup>,
    next_pickup_id: PickupId,
}

impl PickupRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_pickup_id: PickupId::new(0),
        }
    }

    /// Adds a pickup that descends from `position` until it reaches `settle_y`.
    pub(crate) fn spawn_falling(&mut self, position: FieldPoint, settle_y: f32) -> PickupId {
        self.insert(Pickup {
            position,
            settle_y,
            age: Duration::ZERO,
            origin: PickupOrigin::Sky,
        })
    }

    /// Adds a pickup that rests at `position` from the start.
    pub(crate) fn spawn_resting(&mut self, position: FieldPoint, origin: PickupOrigin) -> PickupId {
        self.insert(Pickup {
            position,
            settle_y: position.y,
            age: Duration::ZERO,
            origin,
        })
    }

    fn insert(&mut self, pickup: Pickup) -> PickupId {
        let id = self.next_pickup_id;
        self.next_pickup_id = id.next();
        let _ = self.entries.insert(id, pickup);
        id
    }

    pub(crate) fn age_all(&mut self, dt: Duration) {
        for pickup in self.entries.values_mut() {
            pickup.age = pickup.age.saturating_add(dt);
        }
    }

    /// Lets falling pickups descend, then drops every expired pickup.
    pub(crate) fn step(&mut self, out_events: &mut Vec<Event>) {
        for pickup in self.entries.values_mut() {
            if pickup.is_falling() {
                pickup.position.y = (pickup.position.y + PICKUP_FALL_SPEED).min(pickup.settle_y);
            }
        }

        self.entries.retain(|id, pickup| {
            if pickup.is_expired() {
                out_events.push(Event::PickupExpired { pickup: *id });
                false
            } else {
                true
            }
        });
    }

    /// Removes and returns every pickup within collection reach of `point`.
    pub(crate) fn collect_at(&mut self, point: FieldPoint) -> Vec<PickupId> {
        let reach = PICKUP_RADIUS * PICKUP_RADIUS;
        let collected: Vec<PickupId> = self
            .entries
            .iter()
            .filter(|(_, pickup)| pickup.position.distance_squared(point) <= reach)
            .map(|(id, _)| *id)
            .collect();

        for id in &collected {
            let _ = self.entries.remove(id);
        }
        collected
    }

    pub(crate) fn snapshots(&self) -> Vec<PickupSnapshot> {
        self.entries
            .iter()
            .map(|(id, pickup)| PickupSnapshot {
                id: *id,
                position: pickup.position,
                falling: pickup.is_falling(),
                origin: pickup.origin,
                age: pickup.age,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_pickup_settles_at_target_height() {
        let mut pickups = PickupRegistry::new();
        let _ = pickups.spawn_falling(FieldPoint::new(100.0, 0.0), 5.0);
        let mut events = Vec::new();

        pickups.step(&mut events);
        pickups.step(&mut events);
        assert!(pickups.snapshots()[0].falling);
        pickups.step(&mut events);

        let snapshot = pickups.snapshots()[0];
        assert!(!snapshot.falling);
        assert_eq!(snapshot.position.y, 5.0);
        assert!(events.is_empty());
    }

    #[test]
    fn pickups_expire_once_lifespan_is_exceeded() {
        let mut pickups = PickupRegistry::new();
        let id = pickups.spawn_resting(FieldPoint::new(20.0, 0.0), PickupOrigin::Sky);
        let mut events = Vec::new();

        pickups.age_all(PICKUP_LIFESPAN);
        pickups.step(&mut events);
        assert_eq!(pickups.snapshots().len(), 1);

        pickups.age_all(Duration::from_millis(1));
        pickups.step(&mut events);
        assert!(pickups.snapshots().is_empty());
        assert_eq!(events, vec![Event::PickupExpired { pickup: id }]);
    }

    #[test]
    fn collection_respects_radius() {
        let mut pickups = PickupRegistry::new();
        let near = pickups.spawn_resting(FieldPoint::new(100.0, 100.0), PickupOrigin::Sky);
        let _far = pickups.spawn_resting(FieldPoint::new(200.0, 100.0), PickupOrigin::Sky);

        let collected = pickups.collect_at(FieldPoint::new(112.0, 116.0));

        assert_eq!(collected, vec![near]);
        assert_eq!(pickups.snapshots().len(), 1);
        assert!(pickups.collect_at(FieldPoint::new(112.0, 116.0)).is_empty());
    }
}
