//! The UI renders the application state into something visible and editable.
//!
//! The outline view draws every visible node below the start node as an
//! indented bullet with its text rendered as inline markdown. The node being
//! edited is drawn by an edtui editor placed over its rows instead.

use crate::app_state::{bullet, AppState, RowHit, View};
use crate::markdown::{Segment, Style as Mark};
use crate::navigation;
use crate::path::Path;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Longest breadcrumb label before it is cut short.
const CRUMB_WIDTH: usize = 24;

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Outline
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_breadcrumb(f, app, chunks[0]);
    match app.view.clone() {
        View::Outline => draw_outline(f, app, chunks[1]),
        View::NotFound(link) => draw_not_found(f, app, &link, chunks[1]),
    }
    draw_help(f, app, chunks[2]);
}

fn label(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() > CRUMB_WIDTH {
        let cut: String = first.chars().take(CRUMB_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}

fn draw_breadcrumb(f: &mut Frame, app: &AppState, area: Rect) {
    let crumbs: Vec<String> = app
        .root()
        .path_items(app.session.start())
        .map(|chain| {
            chain
                .iter()
                .enumerate()
                .map(|(depth, item)| {
                    if depth == 0 {
                        "Home".to_string()
                    } else {
                        label(&item.text)
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let widget = Paragraph::new(crumbs.join(" > "))
        .block(Block::default().borders(Borders::ALL).title("Navigation"));
    f.render_widget(widget, area);
}

fn mark_style(marks: &[Mark]) -> Style {
    marks.iter().fold(Style::default(), |style, mark| match mark {
        Mark::Paragraph => style,
        Mark::Emphasis => style.add_modifier(Modifier::ITALIC),
        Mark::Strong => style.add_modifier(Modifier::BOLD),
        Mark::Code => style.fg(Color::Yellow),
        Mark::Link => style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        Mark::Image => style.fg(Color::Magenta),
    })
}

fn styled_line(segments: &[Segment], base: Style) -> Vec<Span<'static>> {
    segments
        .iter()
        .map(|segment| {
            Span::styled(
                segment.text.clone(),
                base.patch(mark_style(&segment.styles)),
            )
        })
        .collect()
}

/// One outline row before scrolling.
struct Row {
    path: Path,
    line: usize,
    prefix: String,
    spans: Vec<Span<'static>>,
}

/// The bullet on a node's first line, blank padding under it after that.
fn continuation(prefix: &str, line: usize) -> String {
    if line == 0 {
        prefix.to_string()
    } else {
        " ".repeat(prefix.chars().count())
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Lay out every visible node as rows; the edited node gets blank rows for the editor.
fn outline_rows(app: &mut AppState, editing: Option<&Path>, editor_rows: usize) -> Vec<Row> {
    let start = app.session.start().clone();
    let indent = app.indent_width;
    let mut rows = Vec::new();
    for context in navigation::visible_nodes(app.root(), &start) {
        let Some(node) = app.root().find_by_path(&context.path) else {
            continue;
        };
        let is_editing = editing == Some(&context.path);
        let is_selected = editing.is_none() && context.path == app.selected;
        let (prefix, base) = if context.depth == 0 {
            if !node.has_content() && start.is_root() && !is_editing && !is_selected {
                continue;
            }
            (String::new(), Style::default().add_modifier(Modifier::BOLD))
        } else {
            let pad = " ".repeat((context.depth - 1) * indent);
            (format!("{pad}{} ", bullet(node)), Style::default())
        };
        let base = if is_selected {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };

        if is_editing {
            for line in 0..editor_rows {
                rows.push(Row {
                    path: context.path.clone(),
                    line,
                    prefix: continuation(&prefix, line),
                    spans: Vec::new(),
                });
            }
            continue;
        }
        let text = node.text.clone();
        let doc = app.render(&text);
        for (line, segments) in doc.lines().iter().enumerate() {
            rows.push(Row {
                path: context.path.clone(),
                line,
                prefix: continuation(&prefix, line),
                spans: styled_line(segments, base),
            });
        }
    }

    rows
}

fn draw_outline(f: &mut Frame, app: &mut AppState, area: Rect) {
    let editing = app.session.editing().map(|e| e.path.clone());
    let editor_rows = app
        .editor_state
        .as_ref()
        .map_or(1, |state| state.lines.iter_row().count().max(1));
    let rows = outline_rows(app, editing.as_ref(), editor_rows);

    let title = match &editing {
        Some(path) => format!("Outline (editing {path})"),
        None => "Outline".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = usize::from(inner.height);
    let focus = editing.as_ref().unwrap_or(&app.selected);
    if let Some(index) = rows.iter().position(|row| &row.path == focus) {
        if index < app.scroll {
            app.scroll = index;
        } else if height > 0 && index >= app.scroll + height {
            app.scroll = index + 1 - height;
        }
    }
    app.scroll = app.scroll.min(rows.len().saturating_sub(1));

    app.rows.clear();
    let mut lines = Vec::new();
    let mut editor_at = None;
    for (offset, row) in rows.iter().skip(app.scroll).take(height).enumerate() {
        let y = inner.y + to_u16(offset);
        let text_x = inner.x + to_u16(row.prefix.chars().count());
        if editing.as_ref() == Some(&row.path) && row.line == 0 {
            editor_at = Some(Rect {
                x: text_x,
                y,
                width: inner.width.saturating_sub(text_x - inner.x),
                height: to_u16(editor_rows).min(inner.height - to_u16(offset)),
            });
        }
        app.rows.push(RowHit {
            y,
            text_x,
            path: row.path.clone(),
            line: row.line,
        });
        let mut spans = vec![Span::styled(
            row.prefix.clone(),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(row.spans.iter().cloned());
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), inner);

    if let (Some(rect), Some(state)) = (editor_at, app.editor_state.as_mut()) {
        let editor = EditorView::new(state)
            .theme(EditorTheme::default().hide_status_line())
            .syntax_highlighter(Some(SyntaxHighlighter::new("dracula", "md")))
            .wrap(false);
        f.render_widget(editor, rect);
    }
}

fn draw_not_found(f: &mut Frame, app: &mut AppState, link: &str, area: Rect) {
    app.rows.clear();
    let text = vec![
        Line::from(Span::styled(
            "Not Found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("No node matches `{link}`; it may have been removed.")),
    ];
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Outline"));
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let help = if let Some(ref msg) = app.message {
        msg.clone()
    } else if matches!(app.view, View::NotFound(_)) {
        "Esc: Back to Home".to_string()
    } else if app.editor_state.is_some() {
        "↑/↓: Move | Alt+↑/↓: Reorder | Enter: New | Tab/Shift+Tab: Indent | Alt+.: Fold | Esc: Done"
            .to_string()
    } else {
        "↑/↓: Select | Enter: Edit | a: Add | z/u: Zoom In/Out | Alt+.: Fold | q: Quit".to_string()
    };
    let widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}
