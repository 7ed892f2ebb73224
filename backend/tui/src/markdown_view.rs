//! Markdown IR to styled ratatui lines.

use markdown::MarkdownNode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Styled lines for a parsed reply, blocks separated by a blank line.
pub fn to_lines(nodes: &[MarkdownNode]) -> Vec<Line<'static>> {
    let mut writer = LineWriter::default();
    writer.blocks(nodes, 0);
    writer.finish()
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
}

impl LineWriter {
    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn pad(&mut self, indent: usize) {
        if indent > 0 {
            self.spans.push(Span::raw(" ".repeat(indent)));
        }
    }

    fn blocks(&mut self, nodes: &[MarkdownNode], indent: usize) {
        for node in nodes {
            if node.is_inline() {
                self.inline(node, Style::default());
                continue;
            }
            self.flush();
            match node {
                MarkdownNode::Paragraph(children) => {
                    self.pad(indent);
                    self.inlines(children, Style::default());
                }
                MarkdownNode::Heading(_, children) => {
                    self.pad(indent);
                    let style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    self.inlines(children, style);
                }
                MarkdownNode::CodeBlock(_, content) => {
                    for line in content.trim_end_matches('\n').lines() {
                        self.pad(indent);
                        self.spans
                            .push(Span::styled(line.to_string(), Style::default().fg(Color::Cyan)));
                        self.flush();
                    }
                }
                MarkdownNode::List(start, items) => {
                    for (i, item) in items.iter().enumerate() {
                        let marker = match start {
                            Some(n) => format!("{}. ", n + i as u64),
                            None => "• ".to_string(),
                        };
                        self.pad(indent);
                        self.spans.push(Span::raw(marker.clone()));
                        match item {
                            MarkdownNode::ListItem(children) => {
                                self.list_item(children, indent + marker.chars().count())
                            }
                            other => self.blocks(std::slice::from_ref(other), indent),
                        }
                        self.flush();
                    }
                }
                MarkdownNode::ListItem(children) => self.list_item(children, indent),
                MarkdownNode::Blockquote(children) => {
                    let first = self.lines.len();
                    self.blocks(children, indent);
                    self.flush();
                    let bar = Style::default().fg(Color::DarkGray);
                    for line in &mut self.lines[first..] {
                        line.spans.insert(0, Span::styled("│ ", bar));
                    }
                }
                MarkdownNode::Rule => {
                    self.lines.push(Line::from(Span::styled(
                        "─".repeat(24),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                _ => {}
            }
            self.flush();
            if indent == 0 {
                self.lines.push(Line::default());
            }
        }
        self.flush();
    }

    /// Item content continues on the marker's line.
    fn list_item(&mut self, children: &[MarkdownNode], indent: usize) {
        for (i, child) in children.iter().enumerate() {
            match child {
                MarkdownNode::Paragraph(inner) => {
                    if i > 0 {
                        self.flush();
                        self.pad(indent);
                    }
                    self.inlines(inner, Style::default());
                }
                inline if inline.is_inline() => self.inline(inline, Style::default()),
                block => {
                    self.flush();
                    self.blocks(std::slice::from_ref(block), indent);
                }
            }
        }
    }

    fn inlines(&mut self, nodes: &[MarkdownNode], style: Style) {
        for node in nodes {
            self.inline(node, style);
        }
    }

    fn inline(&mut self, node: &MarkdownNode, style: Style) {
        match node {
            MarkdownNode::Text(text) => self.spans.push(Span::styled(text.clone(), style)),
            MarkdownNode::Strong(children) => {
                self.inlines(children, style.add_modifier(Modifier::BOLD))
            }
            MarkdownNode::Emphasis(children) => {
                self.inlines(children, style.add_modifier(Modifier::ITALIC))
            }
            MarkdownNode::InlineCode(code) => {
                self.spans.push(Span::styled(code.clone(), style.fg(Color::Cyan)))
            }
            MarkdownNode::Link(_, text) => self
                .spans
                .push(Span::styled(text.clone(), style.add_modifier(Modifier::UNDERLINED))),
            MarkdownNode::Image(_, alt) => self.spans.push(Span::styled(format!("[{alt}]"), style)),
            MarkdownNode::LineBreak => self.flush(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
