//! Rendering colored community layouts to an image file.

use crate::{
    algorithms::{community_detection::community::Community, layout::NodeVectors},
    core::{entities::VID, utils::errors::GraphError},
    graph::Graph,
};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const NODE_RADIUS: i32 = 5;

/// Render the graph with one color per community.
pub fn draw_communities<P: AsRef<Path>>(
    graph: &Graph,
    communities: &[Community],
    positions: &NodeVectors,
    out: P,
    width: u32,
    height: u32,
) -> Result<(), GraphError> {
    render(graph, communities, positions, None, out.as_ref(), width, height)
}

/// Render the communities with a walked path overlaid as a polyline.
pub fn draw_random_walk<P: AsRef<Path>>(
    graph: &Graph,
    communities: &[Community],
    positions: &NodeVectors,
    walk: &[String],
    out: P,
    width: u32,
    height: u32,
) -> Result<(), GraphError> {
    render(
        graph,
        communities,
        positions,
        Some(walk),
        out.as_ref(),
        width,
        height,
    )
}

fn render(
    graph: &Graph,
    communities: &[Community],
    positions: &NodeVectors,
    walk: Option<&[String]>,
    out: &Path,
    width: u32,
    height: u32,
) -> Result<(), GraphError> {
    let root = BitMapBackend::new(out, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let to_pixel = pixel_mapper(positions, width, height);

    // edges underneath everything else
    let edge_color = RGBColor(160, 160, 160);
    for a in graph.nodes() {
        for &b in graph.neighbours(a).keys() {
            if a < b {
                root.draw(&PathElement::new(
                    vec![to_pixel(a), to_pixel(b)],
                    edge_color.stroke_width(1),
                ))
                .map_err(render_err)?;
            }
        }
    }

    for (index, community) in communities.iter().enumerate() {
        let color = Palette99::pick(index).mix(0.9);
        for &node in community.total_nodes() {
            root.draw(&Circle::new(to_pixel(node), NODE_RADIUS, color.filled()))
                .map_err(render_err)?;
            let (x, y) = to_pixel(node);
            root.draw(&Text::new(
                graph.name(node).to_string(),
                (x + NODE_RADIUS, y - NODE_RADIUS),
                ("sans-serif", 12).into_font(),
            ))
            .map_err(render_err)?;
        }
    }

    if let Some(walk) = walk {
        let mut points = Vec::with_capacity(walk.len());
        for name in walk {
            points.push(to_pixel(graph.node(name)?));
        }
        root.draw(&PathElement::new(points, BLACK.stroke_width(2)))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    info!(path = %out.display(), communities = communities.len(), "rendered layout");
    Ok(())
}

/// Map layout coordinates into the pixel box, leaving a margin for labels.
fn pixel_mapper(
    positions: &NodeVectors,
    width: u32,
    height: u32,
) -> impl Fn(VID) -> (i32, i32) + '_ {
    let xs = positions.values().map(|p| p.x);
    let ys = positions.values().map(|p| p.y);
    let (min_x, max_x) = bounds(xs);
    let (min_y, max_y) = bounds(ys);
    let span_x = (max_x - min_x).max(f32::EPSILON);
    let span_y = (max_y - min_y).max(f32::EPSILON);
    let margin = 40.0;

    move |node| {
        let p = positions[&node];
        let x = margin + (p.x - min_x) / span_x * (width as f32 - 2.0 * margin);
        let y = margin + (p.y - min_y) / span_y * (height as f32 - 2.0 * margin);
        (x as i32, y as i32)
    }
}

fn bounds(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn render_err<E: std::fmt::Display>(err: E) -> GraphError {
    GraphError::Render(err.to_string())
}
