//! Layout reconstruction.
//!
//! The passes work on the fragments of one page at a time:
//!
//! - [`ParagraphSegmenter`] groups fragments into paragraphs and headings
//! - [`TableDetector`] finds aligned rows and columns
//! - [`ImageExtractor`] crops placed images out of the page raster
//!
//! [`LayoutReconstructor`] runs them over a whole document.

mod config;
mod images;
mod paragraph;
mod reconstructor;
mod table;

pub use config::{LayoutConfig, TableFragments};
pub use images::{ImageExtractor, ImagePlacement};
pub use paragraph::{reading_order, ParagraphSegmenter};
pub use reconstructor::LayoutReconstructor;
pub use table::{DetectedTable, TableDetector};
