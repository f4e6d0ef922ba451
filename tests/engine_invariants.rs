use particle_life_engine::{InteractionMatrix, Position, SimConfig, Simulation};

fn small_config() -> SimConfig {
    SimConfig {
        particle_count: 400,
        map_size: 50.0,
        num_types: 3,
        min_radius: 1.0,
        max_radius: 5.0,
        cell_size: 5.0,
        friction: 0.4,
        dt: 0.1,
        max_speed: 10.0,
        range_epsilon: 1.0,
    }
}

/// Shortest vector from `a` to `b` on the torus.
fn toroidal_delta(a: &Position, b: &Position, map_size: f64) -> Position {
    let mut delta = b - a;
    for axis in 0..2 {
        if delta[axis] > map_size / 2.0 {
            delta[axis] -= map_size;
        } else if delta[axis] < -map_size / 2.0 {
            delta[axis] += map_size;
        }
    }
    delta
}

#[test]
fn positions_stay_on_the_torus() {
    let mut simulation = Simulation::new(small_config(), 7).expect("sim");
    let map_size = simulation.config().map_size;

    for _ in 0..100 {
        let snapshot = simulation.step();
        for position in snapshot.positions {
            assert!(position.x >= 0.0 && position.x < map_size);
            assert!(position.y >= 0.0 && position.y < map_size);
        }
    }
}

#[test]
fn grid_partition_stays_coherent_across_steps() {
    let mut simulation = Simulation::new(small_config(), 11).expect("sim");

    for _ in 0..20 {
        simulation.step();
        let grid = simulation.grid();
        let total: u32 = grid.counts().iter().sum();
        assert_eq!(total as usize, simulation.particles().len());
        assert!(grid.offsets().windows(2).all(|pair| pair[0] <= pair[1]));
        for cell in 0..grid.cell_count() {
            for index in grid.cell_span(cell) {
                assert_eq!(grid.cell_of(index), cell);
            }
        }
    }
}

#[test]
fn same_seed_yields_identical_trajectories() {
    let mut simulation_a = Simulation::new(small_config(), 0xDEADBEEF).expect("sim a");
    let mut simulation_b = Simulation::new(small_config(), 0xDEADBEEF).expect("sim b");

    assert_eq!(
        simulation_a.particles().positions,
        simulation_b.particles().positions
    );
    assert_eq!(
        simulation_a.particles().type_ids,
        simulation_b.particles().type_ids
    );

    for step in 0..25 {
        simulation_a.step();
        simulation_b.step();
        assert_eq!(
            simulation_a.particles().positions,
            simulation_b.particles().positions,
            "trajectories diverged at step {step}"
        );
        assert_eq!(
            simulation_a.particles().velocities,
            simulation_b.particles().velocities,
            "velocities diverged at step {step}"
        );
    }
}

#[test]
fn different_seeds_yield_different_worlds() {
    let simulation_a = Simulation::new(small_config(), 1).expect("sim a");
    let simulation_b = Simulation::new(small_config(), 2).expect("sim b");
    assert_ne!(
        simulation_a.particles().positions,
        simulation_b.particles().positions
    );
}

#[test]
fn speed_never_exceeds_the_clamp() {
    let mut simulation = Simulation::new(small_config(), 3).expect("sim");
    let max_speed = simulation.config().max_speed;

    for _ in 0..50 {
        simulation.step();
        for velocity in &simulation.particles().velocities {
            assert!(velocity.norm() <= max_speed + 1e-9);
        }
    }
}

#[test]
fn zero_matrix_decays_all_motion() {
    let mut simulation = Simulation::new(small_config(), 21).expect("sim");

    // Let the seeded matrix stir up motion first.
    for _ in 0..10 {
        simulation.step();
    }
    simulation
        .set_matrix(InteractionMatrix::zero(3))
        .expect("matching dimensions");

    // With no forcing, each tick scales every velocity by exactly the
    // friction factor.
    let friction = simulation.config().friction;
    let before = simulation.particles().velocities.clone();
    simulation.step();
    for (after, before) in simulation.particles().velocities.iter().zip(&before) {
        assert_eq!(*after, before * friction);
    }

    for _ in 0..60 {
        simulation.step();
    }
    assert!(simulation
        .particles()
        .velocities
        .iter()
        .all(|velocity| velocity.norm() < 1e-9));

    // Once the velocities are dead, positions stop changing.
    let resting = simulation.particles().positions.clone();
    simulation.step();
    for (after, before) in simulation.particles().positions.iter().zip(&resting) {
        assert!((after - before).norm() < 1e-9);
    }
}

#[test]
fn asymmetric_matrix_makes_prey_drift_away_from_predators() {
    let config = SimConfig {
        particle_count: 100,
        num_types: 2,
        ..small_config()
    };
    let mut simulation = Simulation::new(config, 2024).expect("sim");

    // Type 1 chases type 0; type 0 flees type 1; same types ignore each
    // other. Row is the influencer, column the influenced.
    let mut matrix = InteractionMatrix::zero(2);
    matrix.set(0, 1, 1.5);
    matrix.set(1, 0, -1.5);
    simulation.set_matrix(matrix).expect("matching dimensions");

    for _ in 0..3 {
        simulation.step();
    }

    let particles = simulation.particles();
    let map_size = simulation.config().map_size;
    let pursuers: Vec<&Position> = particles
        .positions
        .iter()
        .zip(&particles.type_ids)
        .filter(|(_, &t)| t == 1)
        .map(|(p, _)| p)
        .collect();
    assert!(!pursuers.is_empty());

    // Aggregate early-step motion of the fleeing type points away from the
    // nearest pursuer.
    let mut drift = 0.0;
    let mut fleeing = 0usize;
    for index in 0..particles.len() {
        if particles.type_ids[index] != 0 {
            continue;
        }
        fleeing += 1;
        let position = &particles.positions[index];
        let nearest = pursuers
            .iter()
            .min_by(|a, b| {
                let da = toroidal_delta(position, a, map_size).norm_squared();
                let db = toroidal_delta(position, b, map_size).norm_squared();
                da.partial_cmp(&db).unwrap()
            })
            .unwrap();
        let away = -toroidal_delta(position, nearest, map_size);
        if away.norm_squared() > 0.0 {
            drift += particles.velocities[index].dot(&away.normalize());
        }
    }
    assert!(fleeing > 0);
    assert!(drift > 0.0, "expected net flight, measured drift {drift}");
}

#[test]
fn snapshot_reflects_the_advanced_state() {
    let mut simulation = Simulation::new(small_config(), 5).expect("sim");
    let initial = simulation.particles().positions.clone();

    let snapshot = simulation.step();
    assert_eq!(snapshot.positions.len(), 400);
    assert_eq!(snapshot.types.len(), 400);
    assert_ne!(snapshot.positions, &initial[..]);
}
