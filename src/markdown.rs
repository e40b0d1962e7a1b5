//! CommonMark parsing into the [`Block`] tree.
//!
//! Wraps `pulldown-cmark`'s event stream and folds it into an ordered list
//! of top-level blocks. Only plain CommonMark is recognised (no tables,
//! footnotes or other extensions), so every input parses.
//!
//! Two normalisations shape the tree for field extraction:
//!
//! - Adjacent text fragments and soft line breaks collapse into a single
//!   [`Inline::Text`], so a paragraph spanning several lines yields one
//!   value joined by `\n`.
//! - Tight list items carry their text directly in the event stream; the
//!   builder wraps it in an implicit paragraph so that a [`ListItem`] always
//!   holds blocks, whether the list is tight or loose.

use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::models::{Block, Inline, ListItem, OtherKind};

/// Parse Markdown text into its top-level blocks, in document order.
pub fn parse_document(text: &str) -> Vec<Block> {
    let parser = Parser::new_ext(text, Options::empty());
    let mut builder = TreeBuilder::default();
    for event in parser {
        builder.handle_event(event);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy)]
enum SpanKind {
    Emphasis,
    Strong,
    Link,
    Image,
}

/// An element that is still open while events stream in.
enum Frame {
    Heading {
        level: u8,
        children: Vec<Inline>,
    },
    Paragraph {
        children: Vec<Inline>,
        implicit: bool,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Item {
        children: Vec<Block>,
    },
    Span {
        kind: SpanKind,
        url: String,
        children: Vec<Inline>,
    },
    /// A block whose content is never extracted; nested tags are counted
    /// so the matching end event closes it.
    Skip {
        kind: OtherKind,
        depth: usize,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    blocks: Vec<Block>,
}

impl TreeBuilder {
    fn handle_event(&mut self, event: Event<'_>) {
        if let Some(Frame::Skip { .. }) = self.stack.last() {
            self.skip_event(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.push_text(&text),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_inline(Inline::Break),
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::InlineHtml(html) | Event::Html(html) => {
                self.push_inline(Inline::Html(html.to_string()))
            }
            Event::Rule => {
                self.close_implicit_paragraph();
                self.attach_block(Block::Other(OtherKind::ThematicBreak));
            }
            _ => {}
        }
    }

    fn skip_event(&mut self, event: Event<'_>) {
        let Some(Frame::Skip { kind, depth }) = self.stack.last_mut() else {
            return;
        };
        match event {
            Event::Start(_) => *depth += 1,
            Event::End(_) => {
                if *depth > 0 {
                    *depth -= 1;
                    return;
                }
                let kind = *kind;
                self.stack.pop();
                self.attach_block(Block::Other(kind));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Emphasis => self.open_span(SpanKind::Emphasis, String::new()),
            Tag::Strong => self.open_span(SpanKind::Strong, String::new()),
            Tag::Link { dest_url, .. } => self.open_span(SpanKind::Link, dest_url.to_string()),
            Tag::Image { dest_url, .. } => self.open_span(SpanKind::Image, dest_url.to_string()),
            Tag::Heading { level, .. } => self.open_block(Frame::Heading {
                level: level as u8,
                children: Vec::new(),
            }),
            Tag::Paragraph => self.open_block(Frame::Paragraph {
                children: Vec::new(),
                implicit: false,
            }),
            Tag::List(start) => self.open_block(Frame::List {
                ordered: start.is_some(),
                items: Vec::new(),
            }),
            Tag::Item => self.open_block(Frame::Item {
                children: Vec::new(),
            }),
            Tag::CodeBlock(_) => self.open_skip(OtherKind::Code),
            Tag::BlockQuote(_) => self.open_skip(OtherKind::BlockQuote),
            Tag::HtmlBlock => self.open_skip(OtherKind::Html),
            _ => self.open_skip(OtherKind::Unknown),
        }
    }

    fn end_tag(&mut self) {
        self.close_implicit_paragraph();
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Heading { level, children } => {
                self.attach_block(Block::Heading { level, children })
            }
            Frame::Paragraph { children, .. } => self.attach_block(Block::Paragraph { children }),
            Frame::List { ordered, items } => self.attach_block(Block::List { ordered, items }),
            Frame::Item { children } => {
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem { children });
                }
            }
            Frame::Span {
                kind,
                url,
                children,
            } => {
                let inline = match kind {
                    SpanKind::Emphasis => Inline::Emphasis(children),
                    SpanKind::Strong => Inline::Strong(children),
                    SpanKind::Link => Inline::Link { url, children },
                    SpanKind::Image => Inline::Image {
                        url,
                        alt: plain_text(&children),
                    },
                };
                self.push_inline(inline);
            }
            Frame::Skip { .. } => {}
        }
    }

    fn open_block(&mut self, frame: Frame) {
        self.close_implicit_paragraph();
        self.stack.push(frame);
    }

    fn open_skip(&mut self, kind: OtherKind) {
        self.open_block(Frame::Skip { kind, depth: 0 });
    }

    fn open_span(&mut self, kind: SpanKind, url: String) {
        self.ensure_inline_container();
        self.stack.push(Frame::Span {
            kind,
            url,
            children: Vec::new(),
        });
    }

    fn push_text(&mut self, text: &str) {
        self.ensure_inline_container();
        if let Some(children) = self.inline_children() {
            match children.last_mut() {
                Some(Inline::Text(prev)) => prev.push_str(text),
                _ => children.push(Inline::Text(text.to_string())),
            }
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        self.ensure_inline_container();
        if let Some(children) = self.inline_children() {
            children.push(inline);
        }
    }

    fn inline_children(&mut self) -> Option<&mut Vec<Inline>> {
        match self.stack.last_mut() {
            Some(Frame::Heading { children, .. })
            | Some(Frame::Paragraph { children, .. })
            | Some(Frame::Span { children, .. }) => Some(children),
            _ => None,
        }
    }

    /// Tight list items emit phrasing content without a paragraph tag.
    fn ensure_inline_container(&mut self) {
        if self.inline_children().is_none() {
            self.stack.push(Frame::Paragraph {
                children: Vec::new(),
                implicit: true,
            });
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if let Some(Frame::Paragraph { implicit: true, .. }) = self.stack.last() {
            if let Some(Frame::Paragraph { children, .. }) = self.stack.pop() {
                self.attach_block(Block::Paragraph { children });
            }
        }
    }

    fn attach_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Item { children }) => children.push(block),
            _ => self.blocks.push(block),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        while !self.stack.is_empty() {
            self.end_tag();
        }
        self.blocks
    }
}

fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(v) | Inline::Code(v) => out.push_str(v),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Link { children, .. } => out.push_str(&plain_text(children)),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::Html(_) | Inline::Break => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn para(s: &str) -> Block {
        Block::Paragraph {
            children: vec![text(s)],
        }
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = parse_document("# Egg Fried Rice\n\nQuick and easy.\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    children: vec![text("Egg Fried Rice")],
                },
                para("Quick and easy."),
            ]
        );
    }

    #[test]
    fn test_tight_list_items_get_paragraphs() {
        let blocks = parse_document("- eggs\n- rice\n");
        assert_eq!(
            blocks,
            vec![Block::List {
                ordered: false,
                items: vec![
                    ListItem {
                        children: vec![para("eggs")],
                    },
                    ListItem {
                        children: vec![para("rice")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_loose_ordered_list() {
        let blocks = parse_document("1. beat eggs\n\n2. fry rice\n");
        let Block::List { ordered, items } = &blocks[0] else {
            panic!("expected list, got {:?}", blocks);
        };
        assert!(*ordered);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].children, vec![para("fry rice")]);
    }

    #[test]
    fn test_soft_breaks_merge_into_one_text() {
        let blocks = parse_document("line one\nline two\n");
        assert_eq!(blocks, vec![para("line one\nline two")]);
    }

    #[test]
    fn test_emphasis_splits_text() {
        let blocks = parse_document("Serve *very* hot\n");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                children: vec![
                    text("Serve "),
                    Inline::Emphasis(vec![text("very")]),
                    text(" hot"),
                ],
            }]
        );
    }

    #[test]
    fn test_nested_list_stays_inside_item() {
        let blocks = parse_document("- outer\n  - inner\n- second\n");
        assert_eq!(blocks.len(), 1);
        let Block::List { items, .. } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 2);
        assert_eq!(items[0].children[0], para("outer"));
        assert!(matches!(items[0].children[1], Block::List { .. }));
    }

    #[test]
    fn test_other_blocks() {
        let blocks = parse_document("```\nlet x = 1;\n```\n\n> quoted\n\n---\n\n<div>hi</div>\n");
        assert_eq!(
            blocks,
            vec![
                Block::Other(OtherKind::Code),
                Block::Other(OtherKind::BlockQuote),
                Block::Other(OtherKind::ThematicBreak),
                Block::Other(OtherKind::Html),
            ]
        );
    }

    #[test]
    fn test_inline_code_and_link() {
        let blocks = parse_document("Use `wok` or [pan](http://x)\n");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                children: vec![
                    text("Use "),
                    Inline::Code("wok".to_string()),
                    text(" or "),
                    Inline::Link {
                        url: "http://x".to_string(),
                        children: vec![text("pan")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_document("").is_empty());
    }
}
