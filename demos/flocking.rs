// demos/flocking.rs

use std::error::Error;

use log::info;
use rand::Rng;
use rs_orthtree::queries::NeighborQuery;
use rs_orthtree::tree::{Tree, TreeElement};
use rs_orthtree::utils::TreeConfig;

#[derive(Clone, Copy, Debug)]
struct Boid {
    position: [f64; 2],
    velocity: [f64; 2],
}

impl TreeElement<2> for Boid {
    fn position(&self) -> [f64; 2] {
        self.position
    }
}

const BOIDS: usize = 2_000;
const STEPS: usize = 100;
const VIEW_RADIUS: f64 = 2.5;
const SEPARATION_RADIUS: f64 = 0.8;
const MAX_SPEED: f64 = 1.5;
const DT: f64 = 0.05;

/// Alignment, cohesion and separation against the first neighbors found.
fn steer(boids: &[Boid], tree: &Tree<'_, Boid, 2>, id: usize) -> Result<[f64; 2], Box<dyn Error>> {
    let me = boids[id];
    let mut heading = [0.0; 2];
    let mut center = [0.0; 2];
    let mut push = [0.0; 2];
    let mut seen = 0.0;

    for other in NeighborQuery::of_element(tree, id)?.within(VIEW_RADIUS) {
        let them = boids[other];
        let dx = them.position[0] - me.position[0];
        let dy = them.position[1] - me.position[1];
        let dist_sq = dx * dx + dy * dy;
        if dist_sq > VIEW_RADIUS * VIEW_RADIUS {
            continue;
        }
        seen += 1.0;
        for d in 0..2 {
            heading[d] += them.velocity[d];
            center[d] += them.position[d];
        }
        if dist_sq < SEPARATION_RADIUS * SEPARATION_RADIUS && dist_sq > 0.0 {
            push[0] -= dx / dist_sq;
            push[1] -= dy / dist_sq;
        }
    }

    if seen == 0.0 {
        return Ok([0.0; 2]);
    }
    let mut steering = [0.0; 2];
    for d in 0..2 {
        let align = heading[d] / seen - me.velocity[d];
        let cohere = center[d] / seen - me.position[d];
        steering[d] = 0.05 * align + 0.01 * cohere + 0.1 * push[d];
    }
    Ok(steering)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = rand::rng();
    let mut boids: Vec<Boid> = (0..BOIDS)
        .map(|_| Boid {
            position: [rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)],
            velocity: [rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)],
        })
        .collect();

    // Each boid reacts to at most 16 flockmates.
    let config = TreeConfig::default().with_capacity(8).with_neighbor_limit(Some(16));

    for step in 0..STEPS {
        let steering = {
            let tree = Tree::build_enclosing(&boids, config)?;
            (0..boids.len())
                .map(|id| steer(&boids, &tree, id))
                .collect::<Result<Vec<_>, _>>()?
        };

        for (boid, steer) in boids.iter_mut().zip(steering) {
            for d in 0..2 {
                boid.velocity[d] += steer[d];
            }
            let speed = (boid.velocity[0].powi(2) + boid.velocity[1].powi(2)).sqrt();
            if speed > MAX_SPEED {
                boid.velocity[0] *= MAX_SPEED / speed;
                boid.velocity[1] *= MAX_SPEED / speed;
            }
            for d in 0..2 {
                boid.position[d] += boid.velocity[d] * DT;
            }
        }

        if step % 20 == 0 {
            let mean_speed = boids.iter()
                .map(|boid| (boid.velocity[0].powi(2) + boid.velocity[1].powi(2)).sqrt())
                .sum::<f64>() / boids.len() as f64;
            info!("step {}: mean speed {:.3}", step, mean_speed);
            println!("Step {}: mean speed = {:.3}", step, mean_speed);
        }
    }

    Ok(())
}
