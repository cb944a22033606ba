//! Batch cosmetic photo edits for website use.
//!
//! Applies a fixed pipeline per image: blur the background outside a
//! feathered center mask, boost contrast and sharpness globally, then
//! composite a logo onto a translucent plate in the bottom-right corner.
//! The mask is purely geometric (a centered rounded rectangle), with no
//! content awareness.
//!
//! # Quick Start
//!
//! ```no_run
//! use photo_polish::{EditEngine, Settings};
//! use std::path::Path;
//!
//! let engine = EditEngine::new(Settings::default(), Some(Path::new("logo.png")))
//!     .expect("failed to init engine");
//! let result = engine.process_file(Path::new("photo.jpg"), Path::new("out/photo.jpg"));
//! assert!(result.success, "{}", result.message);
//! ```
//!
//! # Batch runs
//!
//! Each image is a pure function of (source, logo, settings), so directory
//! processing is embarrassingly parallel; with the `cli` feature enabled
//! batches run on a rayon thread pool.
//!
//! ```no_run
//! use photo_polish::{BatchOptions, EditEngine, Settings};
//! use std::path::Path;
//!
//! let engine = EditEngine::new(Settings::default(), None).unwrap();
//! let results = engine.process_directory(
//!     Path::new("photos"),
//!     Path::new("photos_out"),
//!     &BatchOptions::default(),
//! );
//! for r in &results {
//!     println!("{}: {}", r.path.display(), r.message);
//! }
//! ```

#![deny(missing_docs)]

pub mod enhance;
mod engine;
pub mod error;
pub mod mask;
pub mod overlay;
pub mod settings;

pub use engine::{
    default_output_path, discover_images, is_supported_image, matches_pattern, plan_batch,
    save_image, BatchOptions, BatchPlan, EditEngine, ProcessResult,
};
pub use error::{Error, Result};
pub use settings::{PlateStyle, Settings};
