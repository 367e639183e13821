//! End-to-end runner: load a graph, detect communities, report top users,
//! distribute messages by random walk and optionally render the layout.

use clap::Parser;
use sociogram::{
    algorithms::layout::fruchterman_reingold::fruchterman_reingold,
    core::utils::logging::global_info_logger,
    graph_loader::example::karate_club::karate_club_graph,
    prelude::*,
    vis::{draw_communities, draw_random_walk},
};
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "sociogram", about = "Community detection over an edge list")]
struct Args {
    /// Edge-list file: one `src dst [multiplicity]` row per edge, `#`
    /// comments allowed, `.gz`/`.bz2` supported
    #[arg(long, required_unless_present = "karate", conflicts_with = "karate")]
    edges: Option<PathBuf>,

    /// Use the built-in karate club graph instead of a file
    #[arg(long)]
    karate: bool,

    /// Number of top users to report per community
    #[arg(long, default_value_t = 2)]
    top: usize,

    /// Number of message-distribution walks
    #[arg(long, default_value_t = 3)]
    walks: usize,

    /// RNG seed for walks and layout
    #[arg(long)]
    seed: Option<u64>,

    /// Sweep budget per passage
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Render the colored communities (and the first walk) to this PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print the partition as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    global_info_logger();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GraphError> {
    let graph = match &args.edges {
        Some(path) => EdgeListLoader::new(path).load()?,
        None => karate_club_graph(),
    };

    let result = louvain(&graph, args.max_sweeps)?;

    if args.json {
        let summaries = result.summaries(&graph);
        let payload = serde_json::json!({
            "modularity": result.modularity,
            "levels": result.levels,
            "communities": summaries,
        });
        println!("{}", serde_json::to_string_pretty(&payload).expect("valid json"));
    } else {
        println!(
            "{} communities, modularity {:.4}, {} levels",
            result.communities.len(),
            result.modularity,
            result.levels
        );
        for community in &result.communities {
            println!("  community {}", community.label(&graph));
        }
        for (label, top) in top_users(&graph, &result.communities, args.top) {
            println!("  community {label} top users: {top:?}");
        }
    }

    if args.walks > 0 {
        let walks = distribute_messages(&graph, &result.communities, args.walks, None, args.seed)?;
        if !args.json {
            for walk in &walks {
                println!("  random walk ({} steps): {walk:?}", walk.len() - 1);
            }
        }
        if let Some(out) = &args.png {
            let positions = fruchterman_reingold(&graph, 200, 1.0, 0.95, 0.05, args.seed);
            draw_communities(&graph, &result.communities, &positions, out, 1600, 1600)?;
            let walk_out = out.with_extension("walk.png");
            draw_random_walk(
                &graph,
                &result.communities,
                &positions,
                &walks[0],
                &walk_out,
                1600,
                1600,
            )?;
        }
    } else if let Some(out) = &args.png {
        let positions = fruchterman_reingold(&graph, 200, 1.0, 0.95, 0.05, args.seed);
        draw_communities(&graph, &result.communities, &positions, out, 1600, 1600)?;
    }

    Ok(())
}
