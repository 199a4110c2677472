//! Export I/O for the model export pipeline.
//!
//! This crate owns everything that touches bytes on disk:
//!
//! - [`ExportStream`] - a writable sink that commits atomically, so a
//!   crash or failed export never corrupts a pre-existing output file
//! - [`write_be`] / [`write_le`] - endian-aware scalar writing for
//!   binary format fields, independent of host byte order
//! - [`write_lwo`] / [`save_lwo`] - LWO2 serialization of a completed
//!   [`Model`](model_mesh::Model)
//!
//! # Crash Safety
//!
//! All export data goes to a temporary sibling file first. The target
//! path changes only inside [`ExportStream::close`]; an export that
//! errors out beforehand leaves an abandoned `_<filename>` artifact
//! and an untouched target.
//!
//! # Example
//!
//! ```no_run
//! use model_io::save_lwo;
//! use model_mesh::Model;
//!
//! let model = Model::new();
//! save_lwo(&model, "out/models", "crate01.lwo").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod endian;
mod error;
mod lwo;
mod stream;

pub use endian::{write_be, write_le, Scalar};
pub use error::{IoError, IoResult};
pub use lwo::{save_lwo, write_lwo};
pub use stream::ExportStream;
