//! Force-directed node placement for rendering.

use crate::{algorithms::layout::NodeVectors, core::entities::VID, graph::Graph};
use glam::Vec2;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fruchterman-Reingold spring layout without bounding box: repulsion between
/// every node pair, attraction along edges, velocity integration with a
/// cooloff factor. Positions start at small random offsets so coincident
/// nodes separate.
pub fn fruchterman_reingold(
    graph: &Graph,
    iterations: u64,
    scale: f32,
    cooloff_factor: f32,
    dt: f32,
    seed: Option<u64>,
) -> NodeVectors {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut positions = init_node_vectors(graph, &mut rng);
    let mut velocities: NodeVectors = graph.nodes().map(|v| (v, Vec2::ZERO)).collect();

    for _ in 0..iterations {
        positions = update_positions(&positions, &mut velocities, graph, scale, cooloff_factor, dt);
    }

    positions
}

fn update_positions(
    old_positions: &NodeVectors,
    velocities: &mut NodeVectors,
    graph: &Graph,
    scale: f32,
    cooloff_factor: f32,
    dt: f32,
) -> NodeVectors {
    let mut new_positions = NodeVectors::default();

    for (&id, old_position) in old_positions {
        let mut force = Vec2::ZERO;
        force += compute_repulsion(id, scale, old_positions);
        force += compute_attraction(id, scale, old_positions, graph);

        let velocity = velocities.get_mut(&id).expect("every node has a velocity");
        *velocity += force * dt;
        *velocity *= cooloff_factor;

        new_positions.insert(id, *old_position + *velocity * dt);
    }
    new_positions
}

fn compute_repulsion(id: VID, scale: f32, old_positions: &NodeVectors) -> Vec2 {
    let mut force = Vec2::ZERO;
    let position = old_positions[&id];

    for (&alt_id, &alt_position) in old_positions {
        if alt_id != id {
            let distance = position.distance(alt_position).max(f32::EPSILON);
            force += -((scale * scale) / distance) * unit_vector(position, alt_position);
        }
    }

    force
}

fn compute_attraction(
    id: VID,
    scale: f32,
    old_positions: &NodeVectors,
    graph: &Graph,
) -> Vec2 {
    let mut force = Vec2::ZERO;
    let position = old_positions[&id];

    for &alt_id in graph.neighbours(id).keys() {
        let alt_position = old_positions[&alt_id];
        force += (position.distance_squared(alt_position) / scale)
            * unit_vector(position, alt_position);
    }

    force
}

fn unit_vector(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).normalize_or_zero()
}

fn init_node_vectors(graph: &Graph, rng: &mut StdRng) -> NodeVectors {
    graph
        .nodes()
        .map(|v| {
            (
                v,
                Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            )
        })
        .collect()
}
