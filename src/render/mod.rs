//! Serializers turning a layout document into output formats.

mod images;
mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use images::write_images;
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{LayoutStats, RenderResult};
pub use text::to_text;
