//! Loading edge-list files into a [`Graph`].
//!
//! An edge list is one edge per row, `src dst` with an optional third
//! multiplicity column (defaulting to 1), `#` comment lines allowed.
//! Files with a `.gz` or `.bz2` extension are decompressed on the fly.

use crate::{core::utils::errors::GraphError, graph::Graph};
use bzip2::read::BzDecoder;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::info;

/// Edge-list loader with configurable options.
#[derive(Debug)]
pub struct EdgeListLoader {
    /// Path of the edge-list file.
    path: PathBuf,
    /// The delimiter character separating the columns.
    delimiter: u8,
    /// Specifies whether the first row is a header to skip.
    header: bool,
}

impl EdgeListLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b' ',
            header: false,
        }
    }

    /// If the edge-list file has a header, skip it.
    pub fn set_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Specify the delimiter of the file.
    pub fn set_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn reader(&self) -> Result<Box<dyn Read>, GraphError> {
        let file = File::open(&self.path)?;
        let buf = BufReader::new(file);
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        match extension {
            "gz" => Ok(Box::new(GzDecoder::new(buf))),
            "bz2" => Ok(Box::new(BzDecoder::new(buf))),
            _ => Ok(Box::new(buf)),
        }
    }

    /// Parse the file into an undirected multigraph.
    pub fn load(&self) -> Result<Graph, GraphError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(self.header)
            .delimiter(self.delimiter)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(self.reader()?);

        let mut graph = Graph::new();
        let mut record = csv::StringRecord::new();
        while csv_reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            let src = record.get(0).filter(|s| !s.is_empty());
            let dst = record.get(1).filter(|s| !s.is_empty());
            let (src, dst) = match (src, dst) {
                (Some(src), Some(dst)) => (src, dst),
                _ => {
                    return Err(GraphError::InvalidEdge {
                        path: self.path.clone(),
                        line,
                        reason: "expected at least two columns".to_string(),
                    })
                }
            };
            let weight = match record.get(2).filter(|s| !s.is_empty()) {
                None => 1,
                Some(raw) => raw.parse::<u64>().map_err(|e| GraphError::InvalidEdge {
                    path: self.path.clone(),
                    line,
                    reason: format!("bad multiplicity {raw:?}: {e}"),
                })?,
            };
            graph.add_edge(src, dst, weight);
        }
        info!(
            path = %self.path.display(),
            nodes = graph.count_nodes(),
            edges = graph.count_edges(),
            "loaded edge list"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod edge_list_test {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_plain() {
        let file = write_tmp("# a comment\n0 1\n1 2\n0 2 3\n");
        let graph = EdgeListLoader::new(file.path()).load().unwrap();
        assert_eq!(graph.count_nodes(), 3);
        assert_eq!(graph.count_edges(), 5);
        let zero = graph.node("0").unwrap();
        let two = graph.node("2").unwrap();
        assert_eq!(graph.edge_weight(zero, two), 3);
    }

    #[test]
    fn test_load_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"a b\nb c\n").unwrap();
        encoder.finish().unwrap();

        let graph = EdgeListLoader::new(&path).load().unwrap();
        assert_eq!(graph.count_nodes(), 3);
        assert_eq!(graph.count_edges(), 2);
    }

    #[test]
    fn test_bad_multiplicity_is_reported_with_line() {
        let file = write_tmp("0 1\n1 2 nope\n");
        let err = EdgeListLoader::new(file.path()).load().unwrap_err();
        match err {
            GraphError::InvalidEdge { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_is_invalid() {
        let file = write_tmp("0\n");
        assert!(matches!(
            EdgeListLoader::new(file.path()).load(),
            Err(GraphError::InvalidEdge { .. })
        ));
    }
}
