//! Algorithms over the loaded graph: the multi-level community detection
//! engine and the collaborators consuming its output.
pub mod centrality;
pub mod community_detection;
pub mod layout;
pub mod pathing;
