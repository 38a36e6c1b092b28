//! Page Editor Adapter
//!
//! Glue between the console and an embedded visual page builder. The builder
//! itself sits behind [`PageBuilder`]; the adapter guards a single lazily
//! created instance and turns its output into CMS pages.

mod blocks;
mod canvas;

pub use blocks::{domain_blocks, Block, DOMAIN_CATEGORY, PRESET_BLOCKS};
pub use canvas::CanvasBuilder;

use crate::config::EditorConfig;
use crate::models::{PageContent, SitePage};

/// A visual page builder instance
pub trait PageBuilder: Send {
    /// Register a block in the palette
    fn add_block(&mut self, block: Block);

    fn blocks(&self) -> &[Block];

    /// Place a palette block on the canvas
    fn drop_block(&mut self, id: &str) -> bool;

    /// Replace the canvas with stored content
    fn load(&mut self, content: &PageContent);

    /// Serialized markup
    fn html(&self) -> String;

    /// Serialized stylesheet
    fn css(&self) -> String;

    /// Standalone document with styles inlined, for previews
    fn inlined_html(&self) -> String;
}

/// Builder construction options
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub container: String,
    pub canvas_styles: Vec<String>,
    pub preset_blocks: Vec<String>,
    pub blocks: Vec<Block>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl EditorOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            container: "#gjs".to_string(),
            canvas_styles: config.canvas_styles.clone(),
            preset_blocks: PRESET_BLOCKS.iter().map(|s| s.to_string()).collect(),
            blocks: domain_blocks(),
        }
    }
}

/// Creates builder instances
pub type BuilderFactory = Box<dyn Fn(&EditorOptions) -> Box<dyn PageBuilder> + Send + Sync>;

/// Single-instance handle around the page builder
pub struct EditorAdapter {
    options: EditorOptions,
    factory: BuilderFactory,
    instance: Option<Box<dyn PageBuilder>>,
}

impl EditorAdapter {
    pub fn new(options: EditorOptions, factory: BuilderFactory) -> Self {
        Self {
            options,
            factory,
            instance: None,
        }
    }

    /// Adapter backed by the built-in [`CanvasBuilder`]
    pub fn with_canvas(options: EditorOptions) -> Self {
        Self::new(
            options,
            Box::new(|options: &EditorOptions| -> Box<dyn PageBuilder> {
                Box::new(CanvasBuilder::new(options))
            }),
        )
    }

    /// Create the builder unless one exists; returns whether it was created
    pub fn init(&mut self) -> bool {
        if self.instance.is_some() {
            return false;
        }

        let mut builder = (self.factory)(&self.options);
        for block in &self.options.blocks {
            builder.add_block(block.clone());
        }
        self.instance = Some(builder);

        tracing::debug!(container = %self.options.container, "Page editor initialized");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }

    pub fn builder(&self) -> Option<&dyn PageBuilder> {
        self.instance.as_deref()
    }

    pub fn builder_mut(&mut self) -> Option<&mut dyn PageBuilder> {
        match self.instance.as_mut() {
            Some(builder) => Some(builder.as_mut()),
            None => None,
        }
    }

    /// Current canvas as a page under `slug`
    pub fn snapshot(&self, slug: &str, is_published: bool) -> Option<SitePage> {
        let builder = self.builder()?;
        Some(SitePage {
            slug: slug.to_string(),
            title: None,
            content: PageContent {
                html: builder.html(),
                css: builder.css(),
            },
            is_published,
        })
    }

    /// Standalone preview document
    pub fn preview(&self) -> Option<String> {
        self.builder().map(|builder| builder.inlined_html())
    }

    /// Drop the instance; the next `init` builds a fresh one
    pub fn reset(&mut self) {
        self.instance = None;
    }
}
