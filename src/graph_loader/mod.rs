//! Module for loading graphs from external sources.
pub mod edge_list;
pub mod example;
