//! License discovery.
//!
//! - [`classifier`] — the [`Classifier`](classifier::Classifier) seam and the
//!   file-based implementation that finds license files in a directory.
//! - [`spdx`] — identifies a license text by its characteristic phrases.

pub mod classifier;
pub mod spdx;
