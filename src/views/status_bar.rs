use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;

/// Builder for the status bar shared by both tabs.
///
/// Layout: `[Label] [Loading?] Position [Hint?] | Help Text`
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    loading_text: Option<&'a str>,
    position: Option<(usize, usize)>,
    hint: Option<&'a str>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            position: None,
            hint: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    /// 1-based position; hidden for empty lists.
    pub fn position(mut self, current: usize, total: usize) -> Self {
        if total > 0 {
            self.position = Some((current, total));
        }
        self
    }

    /// Highlighted hint shown right after the position, e.g. "g:top".
    pub fn hint(mut self, hint: Option<&'a str>) -> Self {
        self.hint = hint;
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading.to_string(), theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total)) = self.position {
            spans.push(Span::styled(
                format!("{}/{}", current, total),
                theme.dim_style(),
            ));
            spans.push(Span::raw(" | "));
        }

        if let Some(hint) = self.hint {
            spans.push(Span::styled(hint.to_string(), theme.active_tab_style()));
            spans.push(Span::raw(" | "));
        }

        spans.push(Span::styled(self.help_text.to_string(), theme.dim_style()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
