//! # Control Flow Analysis

mod failure_paths;
mod graph;
mod labels;

pub use graph::Digraph;
