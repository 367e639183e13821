pub mod community;
pub mod contraction;
pub mod local_move;
pub mod louvain;
pub mod modularity;
