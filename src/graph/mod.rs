//! Graph Module
//!
//! Data model for reasoning graphs and the pure patch merge.

mod merge;
mod sample;
mod types;

pub use merge::merge_patch;
pub use sample::{challenge_patch_value, sample_graph_value};
pub use types::{
    confidence_label, Answer, Assumption, Citation, Definition, EdgeRelation, GraphEdge, GraphNode,
    NodeType, Patch, ReasoningGraph, Source, SourceQuality,
};
