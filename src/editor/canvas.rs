//! Built-in page builder.
//!
//! Keeps the page as a markup/stylesheet pair. Dropping a block appends its
//! snippet to the markup.

use super::{Block, EditorOptions, PageBuilder};
use crate::models::PageContent;
use crate::render::escape_html;

pub struct CanvasBuilder {
    container: String,
    canvas_styles: Vec<String>,
    presets: Vec<String>,
    blocks: Vec<Block>,
    html: String,
    css: String,
}

impl CanvasBuilder {
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            container: options.container.clone(),
            canvas_styles: options.canvas_styles.clone(),
            presets: options.preset_blocks.clone(),
            blocks: Vec::new(),
            html: String::new(),
            css: String::new(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn presets(&self) -> &[String] {
        &self.presets
    }
}

impl PageBuilder for CanvasBuilder {
    fn add_block(&mut self, block: Block) {
        self.blocks.retain(|existing| existing.id != block.id);
        self.blocks.push(block);
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn drop_block(&mut self, id: &str) -> bool {
        match self.blocks.iter().find(|block| block.id == id) {
            Some(block) => {
                self.html.push_str(&block.content);
                true
            }
            None => false,
        }
    }

    fn load(&mut self, content: &PageContent) {
        self.html = content.html.clone();
        self.css = content.css.clone();
    }

    fn html(&self) -> String {
        self.html.clone()
    }

    fn css(&self) -> String {
        self.css.clone()
    }

    fn inlined_html(&self) -> String {
        let links: String = self
            .canvas_styles
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{}\">", escape_html(href)))
            .collect();

        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">{}<style>{}</style></head><body>{}</body></html>",
            links, self.css, self.html
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::domain_blocks;

    fn builder() -> CanvasBuilder {
        CanvasBuilder::new(&EditorOptions::default())
    }

    #[test]
    fn test_drop_block_appends_snippet() {
        let mut canvas = builder();
        for block in domain_blocks() {
            canvas.add_block(block);
        }

        assert!(canvas.drop_block("unit-selector"));
        assert!(!canvas.drop_block("missing"));
        assert!(canvas.html().starts_with("<div class=\"unit-selector\">"));
    }

    #[test]
    fn test_add_block_replaces_same_id() {
        let mut canvas = builder();
        let mut block = domain_blocks().remove(0);
        canvas.add_block(block.clone());
        block.label = "changed".to_string();
        canvas.add_block(block);

        assert_eq!(canvas.blocks().len(), 1);
        assert_eq!(canvas.blocks()[0].label, "changed");
    }

    #[test]
    fn test_inlined_html_is_standalone() {
        let mut canvas = builder();
        canvas.load(&PageContent {
            html: "<h1>كيان برو</h1>".to_string(),
            css: "h1{color:gold}".to_string(),
        });

        let doc = canvas.inlined_html();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<style>h1{color:gold}</style>"));
        assert!(doc.contains("<body><h1>كيان برو</h1></body>"));
        assert!(doc.contains("family=Cairo"));
        assert_eq!(canvas.container(), "#gjs");
        assert_eq!(canvas.presets().len(), 3);
    }
}
