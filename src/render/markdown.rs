//! Markdown rendering for layout documents.

use crate::error::Result;
use crate::model::{Block, ExtractedImage, LayoutDocument, ParagraphBlock, Table};

use super::{LayoutStats, RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &LayoutDocument, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &LayoutDocument, options: &RenderOptions) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &LayoutDocument) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter(doc.page_count));
        }

        for block in &doc.blocks {
            self.render_block(&mut output, block);
        }

        Ok(output.trim().to_string())
    }

    /// Render a document to Markdown with layout statistics.
    pub fn render_with_stats(&self, doc: &LayoutDocument) -> Result<RenderResult> {
        let content = self.render(doc)?;
        Ok(RenderResult::new(
            content,
            doc.metadata.clone(),
            LayoutStats::from_document(doc),
        ))
    }

    fn render_block(&self, output: &mut String, block: &Block) {
        match block {
            Block::Paragraph(p) => self.render_paragraph(output, p),
            Block::Table(t) => self.render_table(output, t),
            Block::Image(image) => self.render_image(output, image),
            Block::PageBreak => {
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push_str("\n\n");
                }
                output.push_str(&self.options.page_break_marker);
                output.push_str("\n\n");
            }
        }
    }

    fn render_paragraph(&self, output: &mut String, para: &ParagraphBlock) {
        if para.is_empty() {
            return;
        }

        let text = self.escape(para.text.trim());

        if let Some(level) = para.heading_level {
            output.push_str(&"#".repeat(level.level() as usize));
            output.push(' ');
            output.push_str(&text);
            output.push_str("\n\n");
            return;
        }

        let styled = match (para.is_bold, para.is_italic) {
            (true, true) => format!("***{}***", text),
            (true, false) => format!("**{}**", text),
            (false, true) => format!("*{}*", text),
            (false, false) if self.options.escape_special_chars => escape_block_start(&text),
            (false, false) => text,
        };
        output.push_str(&styled);
        output.push_str("\n\n");
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if table.is_empty() || col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for col in 0..col_count {
                let text = row.cells.get(col).map(|c| c.text.as_str()).unwrap_or("");
                output.push_str(&format!(" {} |", self.escape_cell(text)));
            }
            output.push('\n');

            // The first row is the header
            if i == 0 {
                output.push('|');
                for _ in 0..col_count {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_image(&self, output: &mut String, image: &ExtractedImage) {
        let path = format!("{}{}", self.options.image_path_prefix, image.file_name());
        output.push_str(&format!("![image]({})\n\n", path));
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }

    fn escape_cell(&self, text: &str) -> String {
        let text = text.replace('\n', " ");
        if self.options.escape_special_chars {
            escape_markdown(&text)
        } else {
            text.replace('|', "\\|")
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misinterpreted as inline syntax are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Escape a leading marker that would turn a paragraph into a heading,
/// list item or quote.
fn escape_block_start(text: &str) -> String {
    if text.starts_with(['#', '-', '+', '>']) {
        return format!("\\{}", text);
    }

    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && text[digits..].starts_with(['.', ')']) {
        return format!("{}\\{}", &text[..digits], &text[digits..]);
    }

    text.to_string()
}
