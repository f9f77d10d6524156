//! Read-only rendering of JSON rich-text documents.
//!
//! A [`Document`] is an ordered list of block and text nodes as produced by a
//! rich-text editor. [`render`] turns it into a [`RenderedTree`] for a given
//! display [`Mode`]; [`html`] serializes that tree, and
//! [`document_to_pdf`] exports the same document through Typst.

mod block;
mod config;
mod error;
pub mod html;
mod parser;
mod render;
mod tree;
mod typst;

pub use block::{Alignment, Block, BlockKind, Document, NBSP, Node, Text};
pub use config::{
    Config, DEFAULT_CONFIG_FILE, FontConfig, ImageConfig, LinksConfig, Mode, PageConfig, Palette,
    ThemeConfig,
};
pub use error::{Error, Result};
pub use render::{
    DEFAULT_ALT, IMAGE_CLASS, IMAGE_ERROR_CLASS, IMAGE_ERROR_TEXT, LINK_CLASS, PLACEHOLDER_CLASS,
    PLACEHOLDER_TEXT, render, render_with_config, safe_url, split_segments,
};
pub use tree::{Element, RenderNode, RenderedTree, Style, Tag};
pub use typst::document_to_typst;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Render a document straight to an HTML fragment using the default config.
pub fn document_to_html(document: &Document, mode: Mode) -> String {
    html::to_html(&render(document, mode))
}

/// Compile a document to a Typst document.
fn compile_document(
    document: &Document,
    mode: Mode,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument> {
    let typst_content = document_to_typst(document, mode, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{:?}", e)))
}

/// Convert a document to PDF bytes.
pub fn document_to_pdf(document: &Document, mode: Mode, config: &Config) -> Result<Vec<u8>> {
    let doc = compile_document(document, mode, config)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}
