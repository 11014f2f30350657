//! Projectile flight and lane-scoped hit resolution.

use std::collections::BTreeMap;

use lane_defence_core::{Event, FieldGeometry, ProjectileId, ProjectileSnapshot, PROJECTILE_SPEED};

use crate::zombies::ZombieRegistry;

#[derive(Clone, Debug)]
struct Projectile {
    lane: u32,
    x: f32,
    damage: f32,
    active: bool,
}

/// Arena of projectiles in flight keyed by firing order.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn fire(&mut self, lane: u32, x: f32, damage: f32) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = id.next();
        let _ = self.entries.insert(
            id,
            Projectile {
                lane,
                x,
                damage,
                active: true,
            },
        );
        id
    }

    pub(crate) fn snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.entries
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                lane: projectile.lane,
                x: projectile.x,
                damage: projectile.damage,
            })
            .collect()
    }
}

/// Moves every projectile and applies at most one hit per projectile.
///
/// Zombies are matched in spawn order. A zombie already out of health is not
/// a valid target, so overkill never swallows a second projectile. Spent
/// projectiles are compacted once the pass completes.
pub(crate) fn resolve(
    projectiles: &mut ProjectileRegistry,
    zombies: &mut ZombieRegistry,
    geometry: &FieldGeometry,
    out_events: &mut Vec<Event>,
) {
    let exit_x = geometry.projectile_exit_x();

    for (id, projectile) in projectiles.entries.iter_mut() {
        projectile.x += PROJECTILE_SPEED;
        if projectile.x > exit_x {
            projectile.active = false;
            continue;
        }

        let target = zombies.iter_mut().find(|zombie| {
            zombie.lane == projectile.lane
                && !zombie.is_defeated()
                && zombie.body_contains(projectile.x)
        });

        if let Some(zombie) = target {
            zombie.health.apply_damage(projectile.damage);
            projectile.active = false;
            out_events.push(Event::ProjectileHit {
                projectile: *id,
                zombie: zombie.id,
            });
        }
    }

    projectiles.entries.retain(|_, projectile| projectile.active);
}
