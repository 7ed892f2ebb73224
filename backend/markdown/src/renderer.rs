//! Renderers for the Markdown IR
//!
//! Turns the tree back into text: plain (markup stripped) or ANSI-styled.

use crate::ir::MarkdownNode;

const BOLD: (&str, &str) = ("\x1b[1m", "\x1b[22m");
const ITALIC: (&str, &str) = ("\x1b[3m", "\x1b[23m");
const CODE: (&str, &str) = ("\x1b[36m", "\x1b[39m");

pub struct Renderer;

impl Renderer {
    /// Renders AST to plain text, stripping all formatting.
    pub fn to_plain_text(nodes: &[MarkdownNode]) -> String {
        render_blocks(nodes, false, "\n\n")
    }

    /// Renders AST with ANSI bold/italic/color escapes for terminals.
    pub fn to_ansi(nodes: &[MarkdownNode]) -> String {
        render_blocks(nodes, true, "\n\n")
    }
}

fn wrap(inner: String, style: (&str, &str), ansi: bool) -> String {
    if ansi {
        format!("{}{inner}{}", style.0, style.1)
    } else {
        inner
    }
}

/// Renders a sequence of nodes, treating each run of inline nodes as one line.
fn render_blocks(nodes: &[MarkdownNode], ansi: bool, separator: &str) -> String {
    let mut blocks = Vec::new();
    let mut inline_run: Vec<MarkdownNode> = Vec::new();

    for node in nodes {
        if node.is_inline() {
            inline_run.push(node.clone());
            continue;
        }
        if !inline_run.is_empty() {
            blocks.push(render_inline(&inline_run, ansi));
            inline_run.clear();
        }
        blocks.push(render_block(node, ansi));
    }
    if !inline_run.is_empty() {
        blocks.push(render_inline(&inline_run, ansi));
    }

    blocks.retain(|b| !b.is_empty());
    blocks.join(separator)
}

fn render_block(node: &MarkdownNode, ansi: bool) -> String {
    match node {
        MarkdownNode::Paragraph(children) => render_inline(children, ansi),
        MarkdownNode::Heading(_, children) => wrap(render_inline(children, ansi), BOLD, ansi),
        MarkdownNode::CodeBlock(_, content) => {
            wrap(content.trim_end_matches('\n').to_string(), CODE, ansi)
        }
        MarkdownNode::List(start, items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = match start {
                    Some(n) => format!("{}. ", n + i as u64),
                    None => "- ".to_string(),
                };
                let body = match item {
                    MarkdownNode::ListItem(children) => render_blocks(children, ansi, "\n"),
                    other => render_block(other, ansi),
                };
                indent_continuation(&marker, &body)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        MarkdownNode::ListItem(children) => render_blocks(children, ansi, "\n"),
        MarkdownNode::Blockquote(children) => render_blocks(children, ansi, "\n\n")
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        MarkdownNode::Rule => "---".to_string(),
        inline => render_inline(std::slice::from_ref(inline), ansi),
    }
}

fn render_inline(nodes: &[MarkdownNode], ansi: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            MarkdownNode::Text(text) => out.push_str(text),
            MarkdownNode::Strong(children) => {
                out.push_str(&wrap(render_inline(children, ansi), BOLD, ansi))
            }
            MarkdownNode::Emphasis(children) => {
                out.push_str(&wrap(render_inline(children, ansi), ITALIC, ansi))
            }
            MarkdownNode::InlineCode(code) => out.push_str(&wrap(code.clone(), CODE, ansi)),
            MarkdownNode::Link(url, text) if url != text => {
                out.push_str(&format!("{text} ({url})"))
            }
            MarkdownNode::Link(_, text) => out.push_str(text),
            MarkdownNode::Image(_, alt) => out.push_str(&format!("[{alt}]")),
            MarkdownNode::LineBreak => out.push('\n'),
            block => out.push_str(&render_block(block, ansi)),
        }
    }
    out
}

/// Prefixes the first line with `marker` and aligns the rest under it.
fn indent_continuation(marker: &str, body: &str) -> String {
    let pad = " ".repeat(marker.chars().count());
    body.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{marker}{line}")
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrParser;

    #[test]
    fn test_plain_text_strips_bold() {
        let nodes = IrParser::parse("**[정답]**: 7\n\n**[해설]**: 3과 4를 더해요.");
        assert_eq!(
            Renderer::to_plain_text(&nodes),
            "[정답]: 7\n\n[해설]: 3과 4를 더해요."
        );
    }

    #[test]
    fn test_ansi_marks_bold() {
        let nodes = IrParser::parse("**[정답]**: 7");
        assert_eq!(Renderer::to_ansi(&nodes), "\x1b[1m[정답]\x1b[22m: 7");
    }

    #[test]
    fn test_lists_render_with_markers() {
        let bullets = IrParser::parse("- 사과\n- 배\n");
        assert_eq!(Renderer::to_plain_text(&bullets), "- 사과\n- 배");

        let ordered = IrParser::parse("3. 셋\n4. 넷\n");
        assert_eq!(Renderer::to_plain_text(&ordered), "3. 셋\n4. 넷");
    }

    #[test]
    fn test_nested_list_is_indented() {
        let nodes = IrParser::parse("- a\n  - b\n");
        assert_eq!(Renderer::to_plain_text(&nodes), "- a\n  - b");
    }

    #[test]
    fn test_blockquote_and_code() {
        let nodes = IrParser::parse("> 주의\n\n```\nx = 1\n```");
        assert_eq!(Renderer::to_plain_text(&nodes), "> 주의\n\nx = 1");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Renderer::to_plain_text(&IrParser::parse("")), "");
    }
}
