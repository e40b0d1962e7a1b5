//! Core data models used throughout the ingestion pipeline.
//!
//! A parsed document is an ordered list of [`Block`]s. The pipeline groups
//! blocks into [`SectionGroup`]s, extracts [`ExtractedFields`] from each
//! group, and reduces those into one [`RecipeRecord`] per source file.

use serde::Serialize;

/// One top-level structural unit of a parsed Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, children: Vec<Inline> },
    Paragraph { children: Vec<Inline> },
    List { ordered: bool, items: Vec<ListItem> },
    Other(OtherKind),
}

/// Block kinds the extractor never reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Code,
    BlockQuote,
    ThematicBreak,
    Html,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub children: Vec<Block>,
}

/// Phrasing content inside a heading or paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Html(String),
    Break,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Link { url: String, children: Vec<Inline> },
    Image { url: String, alt: String },
}

impl Inline {
    /// The literal text value carried by leaf nodes.
    ///
    /// Container nodes (emphasis, links) and breaks have no value of their
    /// own, even when they wrap text.
    pub fn value(&self) -> Option<&str> {
        match self {
            Inline::Text(v) | Inline::Code(v) | Inline::Html(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl Block {
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Inline children of text-bearing blocks; empty for everything else.
    pub fn inlines(&self) -> &[Inline] {
        match self {
            Block::Heading { children, .. } | Block::Paragraph { children } => children.as_slice(),
            _ => &[],
        }
    }
}

/// A contiguous run of blocks starting at a heading, up to the next heading.
///
/// Only the first group of a document may lack a heading: it holds the
/// content that precedes the first heading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionGroup {
    pub blocks: Vec<Block>,
}

/// Fields pulled out of a single [`SectionGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    pub heading: Option<String>,
    pub paragraph: Vec<String>,
    pub list: Vec<String>,
}

/// The JSON document submitted to the search index, one per source file.
///
/// Fields that no section supplied are omitted from the JSON rather than
/// serialized as `null` or `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecipeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}
