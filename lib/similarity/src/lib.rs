//! # cbir Similarity
//!
//! Distance metrics and ranking primitives for the cbir image retrieval
//! tool. Metrics compare two equal-length descriptors and return a single
//! dissimilarity score; ranking sorts scored candidates into a top-N
//! result.

pub mod distance;
pub mod rank;

pub use distance::{
    cosine_distance, histogram_intersection_distance, histogram_intersection_similarity,
    ssd_distance, weighted_multi_block_distance,
};
pub use rank::{top_matches, Match};
