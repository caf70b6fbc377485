use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::app::{App, NameField};
use crate::help::name_editor_help;
use crate::keys::name_editor_keymap;
use crate::views::common::centered_rect;

const POPUP_WIDTH: u16 = 48;
const POPUP_HEIGHT: u16 = 9;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.name_editor else {
        return;
    };
    let theme = &app.theme;

    let popup_area = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
    frame.render_widget(Clear, popup_area);

    let field_line = |label: &'static str, value: &str, field: NameField| {
        let focused = editor.field == field;
        let value_style = if focused {
            theme.selection_style()
        } else {
            theme.joke_style(true)
        };
        let cursor = if focused { "_" } else { " " };
        Line::from(vec![
            Span::styled(format!("{label:<7}"), theme.dim_style()),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    };

    let status = if editor.rejected {
        Span::styled("Both names are required", theme.error_style())
    } else {
        Span::styled(
            name_editor_help().format(&name_editor_keymap(), false),
            theme.dim_style(),
        )
    };

    let lines = vec![
        field_line("First", &editor.first, NameField::First),
        Line::from(""),
        field_line("Last", &editor.last, NameField::Last),
        Line::from(""),
        Line::from(status),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title("Name")
            .title_style(theme.active_tab_style().add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, popup_area);
}
