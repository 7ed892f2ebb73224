//! TUI Rendering
//!
//! Translates `AppState` into Ratatui widgets and draws to the terminal frame.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{AppState, Field, Output};
use crate::markdown_view::to_lines;

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().title(title).borders(Borders::ALL).border_style(border)
}

/// Main draw function.
pub fn draw_ui(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // API key
            Constraint::Length(3), // Image path
            Constraint::Min(5),    // Preview + output
            Constraint::Length(1), // Key help
        ])
        .split(f.size());

    let header = Paragraph::new(Span::styled(
        "수학 문제 풀이",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(header, chunks[0]);

    let key_widget = Paragraph::new(state.masked_api_key()).block(field_block(
        "OPENAI API KEY를 입력하세요.",
        state.focus == Field::ApiKey,
    ));
    f.render_widget(key_widget, chunks[1]);

    let path_widget = Paragraph::new(state.image_path_input.as_str()).block(field_block(
        "수학 문제 사진만 업로드하세요! (png, jpg, jpeg)",
        state.focus == Field::ImagePath,
    ));
    f.render_widget(path_widget, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);
    draw_preview(f, state, body[0]);
    draw_output(f, state, body[1]);

    let help = Paragraph::new(Line::from(Span::styled(
        "Enter: 입력 · Tab: 이동 · Ctrl-R: 다시 풀기 · Esc: 종료",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(help, chunks[4]);
}

fn draw_preview(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title("사진").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(preview) = &state.preview {
        let lines = preview.lines(inner.width, inner.height);
        f.render_widget(Paragraph::new(Text::from(lines)), inner);
    }
}

fn draw_output(f: &mut Frame, state: &AppState, area: Rect) {
    if state.busy {
        let spinner = Paragraph::new(format!("{} 수학 문제 풀이중...", state.spinner()))
            .block(Block::default().title("풀이").borders(Borders::ALL));
        f.render_widget(spinner, area);
        return;
    }

    let widget = match &state.output {
        Output::Empty => Paragraph::new("").block(Block::default().title("풀이").borders(Borders::ALL)),
        Output::Result(nodes) => Paragraph::new(Text::from(to_lines(nodes)))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("풀이").borders(Borders::ALL)),
        Output::Error(message) => Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("오류")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
    };
    f.render_widget(widget, area);
}
