//! Document model types for reconstructed layout.
//!
//! `TextFragment` is the input unit; everything else is derived once per
//! page during reconstruction and never mutated afterwards.

mod document;
mod fragment;
mod page;
mod paragraph;
mod resource;
mod table;

pub use document::{LayoutDocument, Metadata};
pub use fragment::TextFragment;
pub use page::{Block, PageLayout};
pub use paragraph::{HeadingLevel, ParagraphBlock};
pub use resource::ExtractedImage;
pub use table::{Table, TableCell, TableRow};
