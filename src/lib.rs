//! # cbir
//!
//! Content-based image retrieval: given a target image and a directory of
//! candidate images, compute a descriptor per image, score each candidate
//! against the target, and report the top-N closest (or farthest) matches.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cbir target.jpg ./database histogram_rgb histogram_intersection 5
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use cbir::query::{DistanceKind, FeatureKind, Query};
//!
//! let query = Query {
//!     target: "target.jpg".into(),
//!     database_dir: "./database".into(),
//!     feature: FeatureKind::HistogramRgb,
//!     distance: DistanceKind::HistogramIntersection,
//!     top_n: 5,
//!     embeddings_csv: None,
//!     least_similar: false,
//! };
//! let matches = cbir::query::run(&query).unwrap();
//! for m in &matches {
//!     println!("{} {}", m.id, m.distance);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `cbir-core` - descriptor model and feature extraction
//! - `cbir-similarity` - distance metrics and top-N ranking
//! - `cbir-storage` - image decoding, directory listing, descriptor CSVs
//! - `cbir` (this crate) - CLI and query orchestration

pub mod query;

pub use cbir_core::{features, Descriptor, Error, Result};
pub use cbir_similarity::{top_matches, Match};

/// Convenience re-exports for library users.
pub mod prelude {
    pub use crate::query::{run, DistanceKind, FeatureKind, Query};
    pub use cbir_core::{features, Descriptor, Error, Result};
    pub use cbir_similarity::{
        cosine_distance, histogram_intersection_distance, histogram_intersection_similarity,
        ssd_distance, top_matches, weighted_multi_block_distance, Match,
    };
    pub use cbir_storage::{
        basename, list_images, load_image, read_descriptors_csv, read_embeddings_csv,
        write_descriptors_csv,
    };
}
