#![forbid(unsafe_code)]

//! `arbor` renders mind-map documents into a headless element tree and supports inline topic
//! editing on the result.
//!
//! # Features
//!
//! - `render`: enable visual tree assembly and editing (`arbor::render`)

pub use arbor_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use arbor_render::{
        Assembled, ChildrenLayout, DeterministicTextMeasurer, Direction, Dom, DomId, EdgeLinker,
        EditOutcome, EditSession, ElementFactory, Expander, KeyDown, KeyOutcome, MindMap,
        MindMapOptions, NoopLinker, NoopSink, Operation, OperationSink, SequentialLayout,
        ShapeWarning, TextMeasurer, TextMetrics, TextStyle, Topic, find_ele,
    };
    pub use arbor_render::Error as RenderError;

    use arbor_core::{Config, Document};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Document(#[from] arbor_core::Error),
        #[error(transparent)]
        Render(#[from] arbor_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// A document rendered once into its own element tree.
    #[derive(Debug)]
    pub struct Rendered {
        pub dom: Dom,
        pub map: MindMap,
        pub root: Assembled,
        pub warnings: Vec<ShapeWarning>,
    }

    impl Rendered {
        /// Markup of the mounted map, container included.
        pub fn html(&self) -> String {
            self.dom.outer_html(self.map.container())
        }
    }

    pub fn render_document(doc: &Document, options: MindMapOptions) -> Result<Rendered> {
        let mut dom = Dom::new();
        let body = dom.body();
        let mut map = MindMap::mount(&mut dom, body, options);
        let root = map.render(&mut dom, doc)?;
        let warnings = map.take_warnings();
        Ok(Rendered {
            dom,
            map,
            root,
            warnings,
        })
    }

    /// Parses a JSON document and renders it with options read from `config`.
    pub fn render_json_sync(text: &str, config: &Config) -> Result<Rendered> {
        let doc = Document::from_json(text)?;
        let options = MindMapOptions::from_config(config)?;
        render_document(&doc, options)
    }
}
