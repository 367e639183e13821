pub mod degree_centrality;
