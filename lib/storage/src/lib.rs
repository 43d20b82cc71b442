//! # cbir Storage
//!
//! External collaborators for the cbir image retrieval tool: image
//! decoding, database directory enumeration, and descriptor CSV
//! persistence. No algorithmic content lives here; the core never touches
//! the filesystem itself.

pub mod csv;
pub mod images;

pub use csv::{read_descriptors_csv, read_embeddings_csv, write_descriptors_csv};
pub use images::{basename, list_images, load_image};
