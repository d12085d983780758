// Text format for graphs and matchings.
//
// A graph is a vertex count, an edge count, then one `i j weight` record per
// edge, with 1-based vertex numbers. Any whitespace separates tokens.

use std::fmt::Write as _;
use std::io::Read;
use std::str::SplitWhitespace;

use crate::error::{Error, Result};
use crate::forest::{Forest, Vertex, Weight, WeightedEdge};
use crate::solve::Summary;

/// A parsed graph with 0-based vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub vertex_count: usize,
    pub edges: Vec<WeightedEdge>,
}

impl Graph {
    pub fn forest(&self) -> Forest {
        Forest::new(self.vertex_count, &self.edges)
    }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: impl FnOnce() -> String) -> Result<&'a str> {
        self.inner.next().ok_or_else(|| Error::MissingToken { what: what() })
    }

    fn count(&mut self, what: &'static str) -> Result<usize> {
        let token = self.next(|| what.to_string())?;
        token.parse().map_err(|source| Error::InvalidInteger { what, token: token.to_string(), source })
    }

    fn vertex(&mut self, edge: usize, count: usize) -> Result<Vertex> {
        let token = self.next(|| format!("endpoint of edge {}", edge))?;
        let vertex: usize = token.parse()
                                 .map_err(|source| Error::InvalidInteger { what: "vertex", token: token.to_string(), source })?;
        if vertex == 0 || vertex > count {
            return Err(Error::VertexOutOfRange { edge, vertex, count });
        }
        Ok(vertex - 1)
    }

    fn weight(&mut self, edge: usize) -> Result<Weight> {
        let token = self.next(|| format!("weight of edge {}", edge))?;
        let weight: Weight = token.parse()
                                  .map_err(|source| Error::InvalidWeight { edge, token: token.to_string(), source })?;
        if !weight.is_finite() {
            return Err(Error::NonFiniteWeight { edge, weight });
        }
        Ok(weight)
    }
}

/// Parse a graph from text. Anything after the last edge is ignored.
pub fn parse_graph(text: &str) -> Result<Graph> {
    let mut tokens = Tokens { inner: text.split_whitespace() };
    let vertex_count = tokens.count("vertex count")?;
    let edge_count   = tokens.count("edge count")?;

    let mut edges = Vec::with_capacity(edge_count);
    for edge in 1..=edge_count {
        let i = tokens.vertex(edge, vertex_count)?;
        let j = tokens.vertex(edge, vertex_count)?;
        if i == j {
            return Err(Error::SelfLoop { edge, vertex: i + 1 });
        }
        let wt = tokens.weight(edge)?;
        edges.push((i, j, wt));
    }
    Ok(Graph { vertex_count, edges })
}

pub fn read_graph<R: Read>(mut reader: R) -> Result<Graph> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_graph(&text)
}

/// Render a result: the total weight rounded to an integer, then one
/// `i j` line per matched pair, last edge first.
pub fn format_matching(summary: &Summary, verbose: bool) -> String {
    let mut out = String::new();
    if verbose {
        if !summary.is_complete() {
            out.push_str("Warning: A complete pairing was not found!\n");
        }
        out.push_str("The following edges belong to the pairing:\n");
    }
    let _ = writeln!(out, "{:.0}", summary.weight);
    for &(i, j) in summary.pairs.iter().rev() {
        let _ = writeln!(out, "{} {}", i + 1, j + 1);
    }
    out
}
