//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: the article list (or the empty-state
//!   message) on top, a line with the selected article's URL, and a one-line
//!   status bar at the bottom.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const TITLE: &str = " Guardian News ";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, url_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if app.items.is_empty() {
        draw_empty_state(app, frame, main_area);
    } else {
        draw_article_list(app, frame, main_area);
    }
    draw_selected_url(app, frame, url_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable article list: title, then section.
fn draw_article_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(&item.title, Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", item.section),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(TITLE).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Loading indicator or empty-state text, centred in the list area.
fn draw_empty_state(app: &App, frame: &mut Frame, area: Rect) {
    let text = if app.loading {
        "Loading…"
    } else {
        app.status.as_str()
    };

    let message = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(TITLE).borders(Borders::ALL));
    frame.render_widget(message, area);
}

fn draw_selected_url(app: &App, frame: &mut Frame, area: Rect) {
    let url = app.selected_item().map(|i| i.url.as_str()).unwrap_or("");
    let line = Paragraph::new(Span::styled(
        format!(" {url}"),
        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
    ));
    frame.render_widget(line, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.items.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump  r: reload"),
    ]));
    frame.render_widget(status, area);
}
