// demos/gravity.rs

use std::error::Error;

use log::info;
use rand::Rng;
use rs_orthtree::parallel::par_map_elements;
use rs_orthtree::queries::FarFieldQuery;
use rs_orthtree::tree::{Tree, TreeElement};
use rs_orthtree::utils::TreeConfig;

#[derive(Clone, Copy, Debug)]
struct Body {
    position: [f64; 3],
    velocity: [f64; 3],
    mass: f64,
}

impl TreeElement<3> for Body {
    fn position(&self) -> [f64; 3] {
        self.position
    }

    fn weight(&self) -> f64 {
        self.mass
    }
}

const BODIES: usize = 5_000;
const STEPS: usize = 20;
const G: f64 = 1.0;
const SOFTENING: f64 = 1e-3;
const DT: f64 = 1e-3;

fn pull(from: &[f64; 3], to: &[f64; 3], mass: f64) -> [f64; 3] {
    let delta = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
    let dist_sq = delta.iter().map(|x| x * x).sum::<f64>() + SOFTENING * SOFTENING;
    let scale = G * mass / (dist_sq * dist_sq.sqrt());
    [delta[0] * scale, delta[1] * scale, delta[2] * scale]
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = rand::rng();
    let mut bodies: Vec<Body> = (0..BODIES)
        .map(|_| Body {
            position: [
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            ],
            velocity: [0.0; 3],
            mass: rng.random_range(0.5..2.0) / BODIES as f64,
        })
        .collect();

    let config = TreeConfig::default().with_capacity(16).with_theta(0.6);

    for step in 0..STEPS {
        let accelerations = {
            let tree = Tree::build_enclosing(&bodies, config)?;
            let query = FarFieldQuery::new(&tree);

            par_map_elements(&tree, |id| {
                let source = bodies[id].position;
                let mut acceleration = [0.0; 3];
                let Ok(field) = query.for_element(id) else {
                    return acceleration;
                };
                // Softening keeps coincident pairs finite.
                for &other in &field.near {
                    let force = pull(&source, &bodies[other].position, bodies[other].mass);
                    (0..3).for_each(|d| acceleration[d] += force[d]);
                }
                for &node in &field.far {
                    let barycenter = tree.barycenter(node);
                    let force = pull(&source, barycenter.position(), barycenter.total_weight());
                    (0..3).for_each(|d| acceleration[d] += force[d]);
                }
                acceleration
            })
        };

        for (body, acceleration) in bodies.iter_mut().zip(accelerations) {
            for d in 0..3 {
                body.velocity[d] += acceleration[d] * DT;
                body.position[d] += body.velocity[d] * DT;
            }
        }

        let kinetic: f64 = bodies.iter()
            .map(|body| 0.5 * body.mass * body.velocity.iter().map(|v| v * v).sum::<f64>())
            .sum();
        info!("step {}: kinetic energy {:.6e}", step, kinetic);
        println!("Step {}: kinetic energy = {:.6e}", step, kinetic);
    }

    Ok(())
}
