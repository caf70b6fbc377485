use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;
use crate::help::likes_help;
use crate::keys::{global_keymap, likes_keymap};
use crate::views::common::{joke_list_item, render_detail, render_tabs, screen_layout};
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = screen_layout(area);
    let liked = app.feed.liked();

    render_tabs(frame, app, layout.tabs);

    let header = match liked.len() {
        0 => " Nothing liked yet. Press l on a joke in Home.".to_string(),
        1 => " 1 liked joke, newest first".to_string(),
        n => format!(" {n} liked jokes, newest first"),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(header, app.theme.dim_style()))),
        layout.header,
    );

    let items: Vec<ListItem> = liked
        .iter()
        .enumerate()
        .map(|(i, joke)| joke_list_item(joke, i + 1, true, true, &app.theme))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style())
                .title(" Likes "),
        )
        .highlight_style(app.theme.selection_style())
        .highlight_symbol("▶ ");
    let mut state = ListState::default()
        .with_offset(app.likes.offset)
        .with_selected((!liked.is_empty()).then_some(app.likes.selected));
    frame.render_stateful_widget(list, layout.list, &mut state);

    render_detail(frame, app.selected_joke(), &app.theme, layout.detail);

    let keymap = global_keymap().extend(likes_keymap());
    let help_text = likes_help().format(&keymap, false);
    StatusBar::new(&app.theme)
        .label("Likes")
        .position(app.likes.selected + 1, liked.len())
        .hint(app.show_scroll_top().then_some("g:top"))
        .help(&help_text)
        .render(frame, layout.status);
}
