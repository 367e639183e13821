use crate::algorithms::community_detection::community::Community;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed edge record on line {line} of {}: {reason}", path.display())]
    InvalidEdge {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("No node with name {0}")]
    NodeNameError(String),

    #[error("Local-move phase did not converge within {sweeps} sweeps at level {level}")]
    NotConverged {
        level: usize,
        sweeps: usize,
        /// Partition of the last level that did converge (empty when level 0
        /// itself blew the budget).
        last_stable: Vec<Community>,
    },

    #[error("Random walk stranded after {steps} steps with {visited} of {communities} communities reached")]
    StrandedWalk {
        steps: usize,
        visited: usize,
        communities: usize,
        path: Vec<String>,
    },

    #[error("Render error: {0}")]
    Render(String),
}
