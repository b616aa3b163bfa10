//! Loading and saving of STAC documents
//!
//! Items and Collections are read from JSON, GeoJSON or YAML files, legacy
//! ML-AOI declarations are migrated, and the result is deserialized into
//! [`StacValue`](crate::stac::StacValue).
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use stac_ml_aoi::loader::StacLoader;
//! use std::path::Path;
//!
//! let loader = StacLoader::new();
//! let item = loader.load_item(Path::new("item.geojson"))?;
//! println!("Loaded item {}", item.id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;
pub mod stac_loader;

pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentParser, Format};
pub use stac_loader::{LoaderConfig, StacLoader};
