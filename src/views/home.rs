use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;
use crate::help::home_help;
use crate::keys::{global_keymap, home_keymap};
use crate::views::common::{
    joke_list_item, render_detail, render_error, render_tabs, screen_layout,
};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = screen_layout(area);

    render_tabs(frame, app, layout.tabs);
    render_category_bar(frame, app, layout.header);
    render_joke_list(frame, app, layout.list);
    match &app.load.error {
        Some(err) => render_error(frame, err, &app.theme, layout.detail),
        None => render_detail(frame, app.selected_joke(), &app.theme, layout.detail),
    }
    render_status_bar(frame, app, layout.status);
}

/// One numbered checkbox per category; the number is the toggle key.
fn render_category_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(" Categories: ", theme.dim_style())];

    if app.feed.category_count() == 0 {
        spans.push(Span::styled("none loaded", theme.dim_style()));
    }
    for (i, category) in app.feed.categories().enumerate() {
        let mark = if category.active { "x" } else { " " };
        let style = if category.active {
            theme.category_style()
        } else {
            theme.dim_style()
        };
        // Only the first nine have a key
        let key = if i < 9 {
            format!("{}", i + 1)
        } else {
            " ".to_string()
        };
        spans.push(Span::styled(format!("{key}[{mark}] "), theme.dim_style()));
        spans.push(Span::styled(category.name, style));
        spans.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_joke_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let jokes = app.feed.visible();

    let mut items: Vec<ListItem> = jokes
        .iter()
        .enumerate()
        .map(|(i, joke)| {
            joke_list_item(
                joke,
                i + 1,
                app.feed.is_liked(joke.id),
                app.category_match(joke),
                theme,
            )
        })
        .collect();

    if app.load.paging {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("     {} loading more...", spinner_frame(app.load.loading_start)),
            theme.spinner_style(),
        ))));
    }

    let title = format!(
        " Jokes about {} ({}/{}) ",
        app.feed.name().display(),
        jokes.len(),
        app.feed.jokes().len()
    );
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");

    let selected = (!jokes.is_empty()).then_some(app.home.selected);
    let mut state = ListState::default()
        .with_offset(app.home.offset)
        .with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = global_keymap().extend(home_keymap());
    let help_text = home_help().format(&keymap, false);
    let hint = if app.load.error.is_some() && app.load.surface_errors {
        Some("r:retry")
    } else if app.show_scroll_top() {
        Some("g:top")
    } else {
        None
    };

    let mut bar = StatusBar::new(&app.theme)
        .label("Home")
        .position(app.home.selected + 1, app.feed.visible().len())
        .hint(hint)
        .help(&help_text);
    if app.is_loading() {
        bar = bar.loading("Loading...");
    }
    bar.render(frame, area);
}
