use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, Event, GameConfig, GameStatus, PickupOrigin, PlantKind, ZombieSpawn,
};
use lane_defence_system_plant_actions::PlantActions;
use lane_defence_world::{self as world, query, World};

const DT: Duration = Duration::from_millis(50);

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Advances the clock and lets plants act, returning the events of the tick.
fn tick(world: &mut World, system: &mut PlantActions) -> Vec<Event> {
    tick_by(world, system, DT)
}

fn tick_by(world: &mut World, system: &mut PlantActions, dt: Duration) -> Vec<Event> {
    let mut events = apply(world, Command::Tick { dt });

    let mut commands = Vec::new();
    system.handle(
        query::status(world),
        &query::plant_view(world),
        &query::zombie_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn fired(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count()
}

#[test]
fn shooter_fires_once_every_interval() {
    let mut world = World::default();
    let mut system = PlantActions::new();
    let _ = apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Shooter,
            cell: CellCoord::new(2, 0),
        },
    );
    let _ = apply(
        &mut world,
        Command::SpawnWave {
            zombies: vec![ZombieSpawn {
                lane: 2,
                speed: 0.5,
            }],
        },
    );

    let mut firing_ticks = Vec::new();
    for index in 1..=300 {
        let events = tick(&mut world, &mut system);
        for _ in 0..fired(&events) {
            firing_ticks.push(index);
        }
    }

    let expected: Vec<u32> = (1..=10).map(|shot| shot * 30).collect();
    assert_eq!(firing_ticks, expected);
}

#[test]
fn shooter_keeps_its_interval_at_thirty_hertz() {
    let config = GameConfig::default();
    let mut schedule = config.tick_schedule();
    let mut world = World::new(config).expect("valid config");
    let mut system = PlantActions::new();
    let _ = apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Shooter,
            cell: CellCoord::new(4, 0),
        },
    );
    let _ = apply(
        &mut world,
        Command::SpawnWave {
            zombies: vec![ZombieSpawn {
                lane: 4,
                speed: 0.5,
            }],
        },
    );

    let mut firing_ticks = Vec::new();
    for index in 1..=450 {
        let events = tick_by(&mut world, &mut system, schedule.next_dt());
        for _ in 0..fired(&events) {
            firing_ticks.push(index);
        }
    }

    let expected: Vec<u32> = (1..=10).map(|shot| shot * 45).collect();
    assert_eq!(firing_ticks, expected);
}

#[test]
fn idle_shooter_does_not_burst() {
    let mut world = World::default();
    let mut system = PlantActions::new();
    let _ = apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Shooter,
            cell: CellCoord::new(0, 0),
        },
    );

    for _ in 0..200 {
        let events = tick(&mut world, &mut system);
        assert_eq!(fired(&events), 0, "empty lane keeps the shooter quiet");
    }

    let _ = apply(
        &mut world,
        Command::SpawnWave {
            zombies: vec![ZombieSpawn {
                lane: 0,
                speed: 0.5,
            }],
        },
    );

    let mut firing_ticks = Vec::new();
    for index in 1..=61 {
        let events = tick(&mut world, &mut system);
        for _ in 0..fired(&events) {
            firing_ticks.push(index);
        }
    }

    assert_eq!(firing_ticks, vec![1, 31, 61]);
}

#[test]
fn generator_produces_pickup_every_ten_seconds() {
    let mut world = World::default();
    let mut system = PlantActions::new();
    let _ = apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Generator,
            cell: CellCoord::new(1, 3),
        },
    );

    for _ in 0..199 {
        let _ = tick(&mut world, &mut system);
    }
    assert!(query::pickups(&world).is_empty());

    let events = tick(&mut world, &mut system);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PickupSpawned { .. })));

    let pickups = query::pickups(&world);
    assert_eq!(pickups.len(), 1);
    let pickup = pickups[0];
    assert!(matches!(pickup.origin, PickupOrigin::Generator(_)));
    assert!(!pickup.falling);
    assert_eq!(pickup.position.x, 3.0 * 80.0 + 20.0);
    assert_eq!(pickup.position.y, 80.0);
    assert_eq!(query::currency(&world), 50);
    assert_eq!(query::status(&world), GameStatus::Playing);
}
