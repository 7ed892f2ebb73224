//! Markdown Intermediate Representation
//!
//! Folds the flat `pulldown-cmark` event stream into a typed tree.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MarkdownNode {
    Heading(u32, Vec<MarkdownNode>),
    Paragraph(Vec<MarkdownNode>),
    Text(String),
    Strong(Vec<MarkdownNode>),
    Emphasis(Vec<MarkdownNode>),
    InlineCode(String),
    CodeBlock(String, String), // language, content
    List(Option<u64>, Vec<MarkdownNode>), // first number when ordered
    ListItem(Vec<MarkdownNode>),
    Blockquote(Vec<MarkdownNode>),
    Link(String, String),  // url, text
    Image(String, String), // url, alt_text
    LineBreak,
    Rule,
}

impl MarkdownNode {
    /// Nodes that flow inside a line rather than starting a block.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Text(_)
                | Self::Strong(_)
                | Self::Emphasis(_)
                | Self::InlineCode(_)
                | Self::Link(..)
                | Self::Image(..)
                | Self::LineBreak
        )
    }

    /// Concatenated text of this node and its children, without markup.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(t) | Self::InlineCode(t) => t.clone(),
            Self::CodeBlock(_, content) => content.clone(),
            Self::Link(_, text) | Self::Image(_, text) => text.clone(),
            Self::LineBreak => "\n".to_string(),
            Self::Rule => String::new(),
            Self::Heading(_, c)
            | Self::Paragraph(c)
            | Self::Strong(c)
            | Self::Emphasis(c)
            | Self::List(_, c)
            | Self::ListItem(c)
            | Self::Blockquote(c) => c.iter().map(Self::text_content).collect(),
        }
    }
}

/// A container that has started but not yet ended.
enum Open {
    Heading(u32),
    Paragraph,
    Strong,
    Emphasis,
    CodeBlock(String),
    List(Option<u64>),
    Item,
    Blockquote,
    Link(String),
    Image(String),
}

impl Open {
    fn from_tag(tag: &Tag<'_>) -> Option<Self> {
        Some(match tag {
            Tag::Heading(level, _, _) => Self::Heading(*level as u32),
            Tag::Paragraph => Self::Paragraph,
            Tag::Strong => Self::Strong,
            Tag::Emphasis => Self::Emphasis,
            Tag::CodeBlock(CodeBlockKind::Fenced(lang)) => Self::CodeBlock(lang.to_string()),
            Tag::CodeBlock(CodeBlockKind::Indented) => Self::CodeBlock(String::new()),
            Tag::List(start) => Self::List(*start),
            Tag::Item => Self::Item,
            Tag::BlockQuote => Self::Blockquote,
            Tag::Link(_, url, _) => Self::Link(url.to_string()),
            Tag::Image(_, url, _) => Self::Image(url.to_string()),
            _ => return None,
        })
    }

    fn close(self, children: Vec<MarkdownNode>) -> MarkdownNode {
        match self {
            Self::Heading(level) => MarkdownNode::Heading(level, children),
            Self::Paragraph => MarkdownNode::Paragraph(children),
            Self::Strong => MarkdownNode::Strong(children),
            Self::Emphasis => MarkdownNode::Emphasis(children),
            Self::CodeBlock(lang) => MarkdownNode::CodeBlock(lang, plain(&children)),
            Self::List(start) => MarkdownNode::List(start, children),
            Self::Item => MarkdownNode::ListItem(children),
            Self::Blockquote => MarkdownNode::Blockquote(children),
            Self::Link(url) => MarkdownNode::Link(url, plain(&children)),
            Self::Image(url) => MarkdownNode::Image(url, plain(&children)),
        }
    }
}

fn plain(nodes: &[MarkdownNode]) -> String {
    nodes.iter().map(MarkdownNode::text_content).collect()
}

pub struct IrParser;

impl IrParser {
    /// Parses markdown into a list of top-level nodes.
    pub fn parse(markdown: &str) -> Vec<MarkdownNode> {
        let mut root = Vec::new();
        let mut stack: Vec<(Open, Vec<MarkdownNode>)> = Vec::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Start(tag) => {
                    if let Some(open) = Open::from_tag(&tag) {
                        stack.push((open, Vec::new()));
                    }
                }
                Event::End(tag) => {
                    if Open::from_tag(&tag).is_none() {
                        continue;
                    }
                    if let Some((open, children)) = stack.pop() {
                        emit(&mut stack, &mut root, open.close(children));
                    }
                }
                Event::Text(text) | Event::Html(text) => {
                    emit(&mut stack, &mut root, MarkdownNode::Text(text.to_string()))
                }
                Event::Code(code) => {
                    emit(&mut stack, &mut root, MarkdownNode::InlineCode(code.to_string()))
                }
                Event::SoftBreak => emit(&mut stack, &mut root, MarkdownNode::Text(" ".into())),
                Event::HardBreak => emit(&mut stack, &mut root, MarkdownNode::LineBreak),
                Event::Rule => emit(&mut stack, &mut root, MarkdownNode::Rule),
                _ => {}
            }
        }

        // Unbalanced input: flush whatever is still open.
        while let Some((open, children)) = stack.pop() {
            emit(&mut stack, &mut root, open.close(children));
        }
        root
    }
}

/// Appends to the innermost open container, merging adjacent text.
fn emit(stack: &mut [(Open, Vec<MarkdownNode>)], root: &mut Vec<MarkdownNode>, node: MarkdownNode) {
    let target = match stack.last_mut() {
        Some((_, children)) => children,
        None => root,
    };
    if let (Some(MarkdownNode::Text(prev)), MarkdownNode::Text(next)) = (target.last_mut(), &node) {
        prev.push_str(next);
        return;
    }
    target.push(node);
}
