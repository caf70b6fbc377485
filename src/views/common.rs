use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
};

use crate::api::Joke;
use crate::app::{App, DETAIL_HEIGHT, Tab};
use crate::theme::ResolvedTheme;
use crate::views::spinner::spinner_frame;

/// Areas shared by both tabs. The fixed rows add up to `LAYOUT_OVERHEAD`
/// once the list borders are counted.
pub struct ScreenLayout {
    pub tabs: Rect,
    pub header: Rect,
    pub list: Rect,
    pub detail: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(DETAIL_HEIGHT),
        Constraint::Length(1),
    ])
    .split(area);
    ScreenLayout {
        tabs: chunks[0],
        header: chunks[1],
        list: chunks[2],
        detail: chunks[3],
        status: chunks[4],
    }
}

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error).style(theme.error_style()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title("Error"),
    );
    frame.render_widget(widget, area);
}

/// Tab bar with the likes badge and the loading spinner.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();
    for tab in Tab::all() {
        let style = if *tab == app.tab {
            theme.active_tab_style()
        } else {
            theme.dim_style()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tab.label(), style));
        let liked = app.feed.liked().len();
        if *tab == Tab::Likes && liked > 0 {
            spans.push(Span::styled(format!(" ({liked})"), theme.badge_style()));
        }
        spans.push(Span::raw(" "));
    }

    if app.load.should_show_spinner() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            spinner_frame(app.load.loading_start),
            theme.spinner_style(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Two rows per joke: the text, then its categories.
pub fn joke_list_item(
    joke: &Joke,
    rank: usize,
    liked: bool,
    matches_filter: bool,
    theme: &ResolvedTheme,
) -> ListItem<'static> {
    let marker = if liked {
        Span::styled("♥ ", theme.liked_style())
    } else {
        Span::raw("  ")
    };
    let text_line = Line::from(vec![
        Span::styled(format!("{:>3}. ", rank), theme.dim_style()),
        marker,
        Span::styled(joke.text.clone(), theme.joke_style(matches_filter)),
    ]);
    let category_style = if matches_filter {
        theme.category_style()
    } else {
        theme.dim_style()
    };
    let meta_line = Line::from(vec![
        Span::raw("       "),
        Span::styled(format!("[{}]", joke.category_label()), category_style),
    ]);
    ListItem::new(vec![text_line, meta_line])
}

/// Full text of the selected joke, wrapped to the pane width.
pub fn render_detail(frame: &mut Frame, joke: Option<&Joke>, theme: &ResolvedTheme, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border_style());
    let width = area.width.saturating_sub(2).max(1) as usize;
    let lines: Vec<Line> = match joke {
        Some(joke) => textwrap::wrap(&joke.text, width)
            .into_iter()
            .map(|line| Line::from(Span::raw(format!(" {line}"))))
            .collect(),
        None => vec![Line::from(Span::styled(" Nothing selected", theme.dim_style()))],
    };
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.foreground))
        .block(block);
    frame.render_widget(paragraph, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
