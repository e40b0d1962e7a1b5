//! Markdown sections → recipe record.
//!
//! A recipe document is read by convention: the first section carries the
//! title and summary, and later sections are routed into record fields by
//! the keyword their heading contains.
//!
//! ```text
//! [Block] ──group_sections──▶ [SectionGroup] ──extract_fields──▶ [ExtractedFields]
//!                                                                     │
//!                                                      assemble_record ▼
//!                                                               RecipeRecord
//! ```
//!
//! Heading matching is substring containment: `"## 操作步骤"` matches the
//! `操作` marker. When several sections match the same marker, the last one
//! wins; assignments overwrite, they never merge.

use crate::config::MarkersConfig;
use crate::markdown::parse_document;
use crate::models::{Block, ExtractedFields, RecipeRecord, SectionGroup};

/// Split a document's top-level blocks into heading-led groups.
///
/// Content before the first heading forms a leading group without a
/// heading. Concatenating the groups reproduces `blocks` exactly.
pub fn group_sections(blocks: Vec<Block>) -> Vec<SectionGroup> {
    let mut groups: Vec<SectionGroup> = Vec::new();
    for block in blocks {
        if !block.is_heading() {
            if let Some(group) = groups.last_mut() {
                group.blocks.push(block);
                continue;
            }
        }
        groups.push(SectionGroup {
            blocks: vec![block],
        });
    }
    groups
}

impl SectionGroup {
    /// Text of the first inline child of the group's heading.
    ///
    /// `None` for the leading group, and for headings whose first child has
    /// no text value of its own (e.g. `# *Emphasised*`).
    pub fn heading(&self) -> Option<&str> {
        self.blocks
            .iter()
            .find(|b| b.is_heading())
            .and_then(|h| h.inlines().first())
            .and_then(|inline| inline.value())
            .filter(|v| !v.is_empty())
    }

    /// Text values directly under every paragraph, in order.
    pub fn paragraph_text(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph { .. }))
            .flat_map(|p| p.inlines())
            .filter_map(|inline| inline.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Text values of every list: list → item → item block → inline.
    ///
    /// Nested lists inside an item have no inline children at that depth,
    /// so their content is not collected.
    pub fn list_text(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::List { items, .. } => Some(items),
                _ => None,
            })
            .flatten()
            .flat_map(|item| item.children.iter())
            .flat_map(|child| child.inlines())
            .filter_map(|inline| inline.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub fn extract_fields(group: &SectionGroup) -> ExtractedFields {
    ExtractedFields {
        heading: group.heading().map(str::to_string),
        paragraph: group.paragraph_text(),
        list: group.list_text(),
    }
}

/// Reduce a document's sections, in order, into a record without an id.
pub fn assemble_record(sections: &[ExtractedFields], markers: &MarkersConfig) -> RecipeRecord {
    sections
        .iter()
        .enumerate()
        .fold(RecipeRecord::default(), |mut record, (index, section)| {
            if index == 0 {
                if let Some(heading) = &section.heading {
                    record.title = Some(heading.clone());
                }
                if !section.paragraph.is_empty() {
                    record.summary = Some(section.paragraph.clone());
                }
            }

            let Some(heading) = section.heading.as_deref() else {
                return record;
            };

            if heading.contains(markers.directions.as_str()) {
                record.directions = Some(section.list.clone());
            }
            if heading.contains(markers.ingredients.as_str()) {
                record.ingredients = Some(section.list.clone());
            }
            if heading.contains(markers.notes.as_str()) {
                let mut notes = section.paragraph.clone();
                notes.extend(section.list.iter().cloned());
                record.notes = Some(notes);
            }

            record
        })
}

/// Full per-document transformation: parse, group, extract, assemble.
pub fn recipe_from_markdown(text: &str, markers: &MarkersConfig) -> RecipeRecord {
    let groups = group_sections(parse_document(text));
    let sections: Vec<ExtractedFields> = groups.iter().map(extract_fields).collect();
    assemble_record(&sections, markers)
}
