//! Test data builders for app and view testing.

use crate::api::{Joke, JokeClient, NameQuery};
use crate::app::{App, AppOptions, DEFAULT_PAGE_DELAY, NameEditor, Phase, Tab};
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};

/// Nothing listens here, so tests never reach a real API by accident.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

pub struct JokeBuilder {
    id: u64,
    text: String,
    categories: Vec<String>,
}

impl Default for JokeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JokeBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            text: "Chuck Norris can divide by zero.".to_string(),
            categories: vec![],
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn build(self) -> Joke {
        Joke {
            id: self.id,
            text: self.text,
            categories: self.categories,
        }
    }
}

/// Jokes with ids `0..count`, each tagged "nerdy".
pub fn numbered_jokes(count: usize) -> Vec<Joke> {
    (0..count as u64)
        .map(|i| {
            JokeBuilder::new()
                .id(i)
                .text(&format!("Joke number {i}"))
                .categories(&["nerdy"])
                .build()
        })
        .collect()
}

pub fn sample_jokes() -> Vec<Joke> {
    vec![
        JokeBuilder::new()
            .id(1)
            .text("Chuck Norris counted to infinity. Twice.")
            .build(),
        JokeBuilder::new()
            .id(2)
            .text("Chuck Norris's keyboard doesn't have a Ctrl key because nothing controls Chuck Norris.")
            .categories(&["nerdy"])
            .build(),
        JokeBuilder::new()
            .id(3)
            .text("When Chuck Norris throws exceptions, it's across the room.")
            .categories(&["nerdy"])
            .build(),
        JokeBuilder::new()
            .id(4)
            .text("Chuck Norris doesn't read books. He stares them down until he gets the information he wants.")
            .categories(&["explicit"])
            .build(),
        JokeBuilder::new()
            .id(5)
            .text("Chuck Norris can slam a revolving door.")
            .build(),
    ]
}

pub struct TestAppBuilder {
    tab: Tab,
    jokes: Vec<Joke>,
    categories: Vec<String>,
    liked: Vec<u64>,
    selected_index: usize,
    loading: bool,
    error: Option<String>,
    help_overlay: bool,
    name_editor: Option<NameEditor>,
    surface_errors: bool,
    api_base: String,
    theme: ResolvedTheme,
    viewport_height: Option<u16>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            tab: Tab::Home,
            jokes: Vec::new(),
            categories: Vec::new(),
            liked: Vec::new(),
            selected_index: 0,
            loading: false,
            error: None,
            help_overlay: false,
            name_editor: None,
            surface_errors: false,
            api_base: UNREACHABLE_API.to_string(),
            theme: default_for_variant(ThemeVariant::Dark),
            viewport_height: None,
        }
    }

    pub fn tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    pub fn with_jokes(mut self, jokes: Vec<Joke>) -> Self {
        self.jokes = jokes;
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Likes the given ids, in order, once the jokes are in place.
    pub fn liked(mut self, ids: Vec<u64>) -> Self {
        self.liked = ids;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn help_overlay(mut self) -> Self {
        self.help_overlay = true;
        self
    }

    pub fn name_editor(mut self, editor: NameEditor) -> Self {
        self.name_editor = Some(editor);
        self
    }

    pub fn surface_errors(mut self) -> Self {
        self.surface_errors = true;
        self
    }

    pub fn api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn build(self) -> App {
        let options = AppOptions {
            client: JokeClient::new(self.api_base).unwrap(),
            name: NameQuery::default(),
            page_delay: DEFAULT_PAGE_DELAY,
            surface_errors: self.surface_errors,
        };
        let mut app = App::new(self.theme, options);

        app.feed.set_jokes(self.jokes);
        app.feed.set_categories(self.categories);
        for id in self.liked {
            app.feed.like(id);
        }

        app.tab = self.tab;
        match self.tab {
            Tab::Home => app.home.selected = self.selected_index,
            Tab::Likes => app.likes.selected = self.selected_index,
        }
        if self.loading {
            app.load.jokes = Phase::Pending;
            app.load.start();
        }
        app.load.error = self.error;
        app.help_overlay = self.help_overlay;
        app.name_editor = self.name_editor;
        app.viewport_height = self.viewport_height;
        app.observe_last_row();
        app
    }
}
