use std::collections::VecDeque;
use std::ops::Range;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Joke, JokeClient, NameQuery};
use crate::feed::JokeFeed;
use crate::theme::ResolvedTheme;
use crate::viewport::{LastRowObserver, ViewportObserver};

/// Rows taken by everything except the joke list: tabs, header, list
/// borders, detail pane and status bar.
pub const LAYOUT_OVERHEAD: u16 = 1 + 1 + 2 + DETAIL_HEIGHT + 1;
pub const DETAIL_HEIGHT: u16 = 5;
/// Each joke takes a text row and a categories row.
pub const JOKE_HEIGHT: u16 = 2;
/// Scroll offset (in jokes) past which the jump-to-top hint is shown.
pub const SCROLL_TOP_THRESHOLD: usize = 5;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

pub enum AsyncResult {
    Jokes {
        generation: u64,
        task_id: u64,
        result: Result<Vec<Joke>, ApiError>,
    },
    Categories {
        task_id: u64,
        result: Result<Vec<String>, ApiError>,
    },
    PageRevealed {
        generation: u64,
        task_id: u64,
    },
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.push(LogLevel::Info, msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.push(LogLevel::Warn, msg.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.log.push_back(LogEntry { level, message });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        debug!(task_id = id, "{desc}");
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            debug!(task_id = id, ?elapsed, "{} {}", task.description, outcome);
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Progress of one kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Done,
    Failed,
}

/// Loading and pagination state.
#[derive(Debug, Default)]
pub struct LoadState {
    pub jokes: Phase,
    pub categories: Phase,
    pub paging: bool,
    pub loading_start: Option<Instant>,
    pub error: Option<String>,
    /// Failures become a visible error with a retry instead of a stuck spinner.
    pub surface_errors: bool,
}

impl LoadState {
    pub fn new(surface_errors: bool) -> Self {
        Self {
            surface_errors,
            ..Default::default()
        }
    }

    pub fn start(&mut self) {
        self.loading_start = Some(Instant::now());
    }

    /// The externally visible loading flag. Without surfaced errors a failed
    /// request leaves it set, matching a spinner that never resolves.
    pub fn is_loading(&self) -> bool {
        let pending = self.jokes == Phase::Pending || self.categories == Phase::Pending;
        let stuck = !self.surface_errors
            && (self.jokes == Phase::Failed || self.categories == Phase::Failed);
        pending || self.paging || stuck
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        if let Some(start) = self.loading_start {
            self.is_loading() || start.elapsed() < MIN_SPINNER_DURATION
        } else {
            false
        }
    }

    pub fn has_failures(&self) -> bool {
        self.jokes == Phase::Failed || self.categories == Phase::Failed
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Likes,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Likes]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Likes => "Likes",
        }
    }
}

/// Selection and scroll position within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListCursor {
    pub selected: usize,
    pub offset: usize,
}

impl ListCursor {
    fn next(&mut self, count: usize) {
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
        }
    }

    fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    fn last(&mut self, count: usize) {
        if count > 0 {
            self.selected = count - 1;
        }
    }

    fn page_down(&mut self, count: usize, step: usize) {
        if count > 0 {
            self.selected = (self.selected + step).min(count - 1);
        }
    }

    fn page_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    fn clamp(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
        self.offset = self.offset.min(self.selected);
    }

    fn scroll_into_view(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + capacity {
            self.offset = self.selected + 1 - capacity;
        }
    }

    fn rows(&self, capacity: usize, count: usize) -> Range<usize> {
        let end = (self.offset + capacity).min(count);
        self.offset.min(end)..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameField {
    #[default]
    First,
    Last,
}

/// State of the name entry popup.
#[derive(Debug, Clone, Default)]
pub struct NameEditor {
    pub first: String,
    pub last: String,
    pub field: NameField,
    pub rejected: bool,
}

impl NameEditor {
    pub fn from_query(name: &NameQuery) -> Self {
        Self {
            first: name.first.clone(),
            last: name.last.clone(),
            ..Default::default()
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            NameField::First => &mut self.first,
            NameField::Last => &mut self.last,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            NameField::First => NameField::Last,
            NameField::Last => NameField::First,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    Like,
    Unlike,
    ToggleCategory(usize),
    SwitchTab(Tab),
    NextTab,
    PrevTab,
    Retry,
    Quit,
    ToggleHelp,
    ToggleDebug,
    UpdateViewportHeight(u16),
    // Name editor
    OpenNameEditor,
    CloseNameEditor,
    NameInput(char),
    NameBackspace,
    NameNextField,
    SubmitName,
}

/// Everything the app needs from configuration.
pub struct AppOptions {
    pub client: JokeClient,
    pub name: NameQuery,
    pub page_delay: Duration,
    pub surface_errors: bool,
}

struct PageTask {
    token: CancellationToken,
    task_id: u64,
}

pub struct App {
    pub tab: Tab,
    pub feed: JokeFeed,
    pub home: ListCursor,
    pub likes: ListCursor,
    pub load: LoadState,
    pub should_quit: bool,
    pub help_overlay: bool,
    pub client: JokeClient,
    pub theme: ResolvedTheme,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    pub generation: u64,
    // Debug pane
    pub debug: DebugState,
    pub viewport_height: Option<u16>,
    pub name_editor: Option<NameEditor>,
    viewport: Box<dyn ViewportObserver>,
    page_delay: Duration,
    lifetime: CancellationToken,
    page_task: Option<PageTask>,
}

impl App {
    pub fn new(theme: ResolvedTheme, options: AppOptions) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        Self {
            tab: Tab::default(),
            feed: JokeFeed::new(options.name),
            home: ListCursor::default(),
            likes: ListCursor::default(),
            load: LoadState::new(options.surface_errors),
            should_quit: false,
            help_overlay: false,
            client: options.client,
            theme,
            result_tx,
            result_rx,
            generation: 0,
            debug: DebugState::new(),
            viewport_height: None,
            name_editor: None,
            viewport: Box::new(LastRowObserver::new()),
            page_delay: options.page_delay,
            lifetime: CancellationToken::new(),
            page_task: None,
        }
    }

    /// Replaces the viewport observer, e.g. with a fake in tests.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_viewport(mut self, viewport: Box<dyn ViewportObserver>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Cancels every background task tied to this app. Results that were
    /// already queued are left in the channel.
    pub fn shutdown(&mut self) {
        self.lifetime.cancel();
        if let Some(task) = self.page_task.take() {
            self.debug.end_task(task.task_id, "cancelled");
        }
        self.viewport.disconnect();
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Jokes {
                generation,
                task_id,
                result,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(jokes) => {
                        info!(count = jokes.len(), "joke batch loaded");
                        self.load.jokes = Phase::Done;
                        self.cancel_page_task();
                        self.feed.set_jokes(jokes);
                        self.home = ListCursor::default();
                        self.window_changed();
                    }
                    Err(e) => {
                        self.load.jokes = Phase::Failed;
                        self.report_failure("jokes", &e);
                        self.window_changed();
                    }
                }
            }
            AsyncResult::Categories { task_id, result } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(categories) => {
                        self.load.categories = Phase::Done;
                        self.feed.set_categories(categories);
                    }
                    Err(e) => {
                        self.load.categories = Phase::Failed;
                        self.report_failure("categories", &e);
                    }
                }
            }
            AsyncResult::PageRevealed {
                generation,
                task_id,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.page_task = None;
                self.load.paging = false;
                let revealed = self.feed.reveal_more();
                self.debug.end_task(task_id, "completed");
                debug!(revealed, visible = self.feed.visible().len(), "page revealed");
                self.window_changed();
            }
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => self.move_cursor(|c, count, _| c.next(count)),
            Message::SelectPrev => self.move_cursor(|c, _, _| c.prev()),
            Message::SelectFirst => self.move_cursor(|c, _, _| c.first()),
            Message::SelectLast => self.move_cursor(|c, count, _| c.last(count)),
            Message::PageDown => self.move_cursor(|c, count, step| c.page_down(count, step)),
            Message::PageUp => self.move_cursor(|c, _, step| c.page_up(step)),
            Message::Like => {
                if let Some(id) = self.selected_joke().map(|j| j.id) {
                    self.like(id);
                }
            }
            Message::Unlike => {
                if let Some(id) = self.selected_joke().map(|j| j.id) {
                    self.unlike(id);
                }
            }
            Message::ToggleCategory(index) => {
                if let Some(name) = self.feed.category_at(index).map(str::to_string) {
                    self.toggle_category(&name);
                }
            }
            Message::SwitchTab(tab) => self.switch_tab(tab),
            Message::NextTab | Message::PrevTab => {
                // Only two tabs, so both directions flip.
                let tab = match self.tab {
                    Tab::Home => Tab::Likes,
                    Tab::Likes => Tab::Home,
                };
                self.switch_tab(tab);
            }
            Message::Retry => self.retry(),
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.help_overlay = !self.help_overlay,
            Message::ToggleDebug => self.debug.toggle(),
            Message::UpdateViewportHeight(height) => {
                self.viewport_height = Some(height);
                self.sync_scroll();
            }
            Message::OpenNameEditor => {
                self.name_editor = Some(NameEditor::from_query(self.feed.name()));
            }
            Message::CloseNameEditor => self.name_editor = None,
            Message::NameInput(c) => {
                if let Some(editor) = &mut self.name_editor {
                    editor.current_mut().push(c);
                    editor.rejected = false;
                }
            }
            Message::NameBackspace => {
                if let Some(editor) = &mut self.name_editor {
                    editor.current_mut().pop();
                    editor.rejected = false;
                }
            }
            Message::NameNextField => {
                if let Some(editor) = &mut self.name_editor {
                    editor.next_field();
                }
            }
            Message::SubmitName => {
                if let Some(editor) = self.name_editor.take() {
                    if !self.submit_name(&editor.first, &editor.last) {
                        self.name_editor = Some(NameEditor {
                            rejected: true,
                            ..editor
                        });
                    }
                }
            }
        }
    }

    /// Fetches jokes for the current name together with the category list.
    pub fn load_initial(&mut self) {
        self.load.clear_error();
        self.spawn_jokes_fetch();
        self.spawn_categories_fetch();
    }

    /// Replaces the name and re-fetches jokes. Blank names are rejected.
    pub fn submit_name(&mut self, first: &str, last: &str) -> bool {
        if !self.feed.set_name(first, last) {
            self.debug.log("Ignored name submission with a blank part");
            return false;
        }
        info!(name = %self.feed.name().display(), "name submitted");
        self.load.clear_error();
        self.spawn_jokes_fetch();
        true
    }

    pub fn like(&mut self, id: u64) -> bool {
        let liked = self.feed.like(id);
        if liked {
            self.likes.first();
        }
        liked
    }

    pub fn unlike(&mut self, id: u64) -> bool {
        let removed = self.feed.unlike(id);
        if removed {
            self.likes.clamp(self.feed.liked().len());
        }
        removed
    }

    pub fn toggle_category(&mut self, name: &str) -> bool {
        self.feed.toggle_category(name)
    }

    /// Whether a joke passes the active category filter.
    pub fn category_match(&self, joke: &Joke) -> bool {
        self.feed.category_match(&joke.categories)
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    pub fn cursor(&self) -> &ListCursor {
        match self.tab {
            Tab::Home => &self.home,
            Tab::Likes => &self.likes,
        }
    }

    /// Jokes shown in the current tab.
    pub fn current_list(&self) -> &[Joke] {
        match self.tab {
            Tab::Home => self.feed.visible(),
            Tab::Likes => self.feed.liked(),
        }
    }

    pub fn selected_joke(&self) -> Option<&Joke> {
        self.current_list().get(self.cursor().selected)
    }

    pub fn list_capacity(&self) -> Option<usize> {
        self.viewport_height
            .map(|h| ((h.saturating_sub(LAYOUT_OVERHEAD) / JOKE_HEIGHT) as usize).max(1))
    }

    /// Rows of the home list currently on screen.
    pub fn visible_rows(&self) -> Option<Range<usize>> {
        let capacity = self.list_capacity()?;
        Some(self.home.rows(capacity, self.feed.visible().len()))
    }

    pub fn show_scroll_top(&self) -> bool {
        self.cursor().offset >= SCROLL_TOP_THRESHOLD
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.sync_scroll();
        }
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut ListCursor, usize, usize)) {
        let count = self.current_list().len();
        let step = self.list_capacity().unwrap_or(10);
        let cursor = match self.tab {
            Tab::Home => &mut self.home,
            Tab::Likes => &mut self.likes,
        };
        f(cursor, count, step);
        self.sync_scroll();
    }

    fn sync_scroll(&mut self) {
        if let Some(capacity) = self.list_capacity() {
            self.home.scroll_into_view(capacity);
            self.likes.scroll_into_view(capacity);
        }
        self.check_viewport();
    }

    /// Re-registers the observer on the last revealed joke.
    pub(crate) fn observe_last_row(&mut self) {
        match self.feed.visible().len() {
            0 => self.viewport.disconnect(),
            n => self.viewport.observe(n - 1),
        }
    }

    fn window_changed(&mut self) {
        self.observe_last_row();
        self.sync_scroll();
    }

    fn can_load_more(&self) -> bool {
        !self.load.paging && self.load.jokes != Phase::Pending && self.feed.has_more()
    }

    fn check_viewport(&mut self) {
        // The home list is hidden on the likes tab, so nothing intersects.
        if self.tab != Tab::Home || !self.can_load_more() {
            return;
        }
        let Some(rows) = self.visible_rows() else {
            return;
        };
        if self.viewport.notify(rows).is_some() {
            self.load_more();
        }
    }

    fn load_more(&mut self) {
        if !self.can_load_more() {
            return;
        }
        self.load.paging = true;
        self.load.start();
        self.spawn_page_reveal();
    }

    fn retry(&mut self) {
        if !self.load.surface_errors || !self.load.has_failures() {
            return;
        }
        self.load.clear_error();
        if self.load.jokes == Phase::Failed {
            self.spawn_jokes_fetch();
        }
        if self.load.categories == Phase::Failed {
            self.spawn_categories_fetch();
        }
    }

    fn report_failure(&mut self, what: &str, err: &ApiError) {
        warn!(request = what, error = %err, "fetch failed");
        self.debug.warn(format!("Failed to load {}: {}", what, err));
        if self.load.surface_errors {
            self.load.set_error(err.user_message());
        }
    }

    fn cancel_page_task(&mut self) {
        if let Some(task) = self.page_task.take() {
            task.token.cancel();
            self.debug.end_task(task.task_id, "cancelled");
        }
        self.load.paging = false;
    }

    /// Spawn an async task to fetch the joke batch for the current name.
    /// Bumps the generation so older batches still in flight are discarded.
    fn spawn_jokes_fetch(&mut self) {
        self.generation += 1;
        self.cancel_page_task();
        self.load.jokes = Phase::Pending;
        self.load.start();

        let client = self.client.clone();
        let name = self.feed.name().clone();
        let tx = self.result_tx.clone();
        let generation = self.generation;
        let token = self.lifetime.child_token();
        let task_id = self
            .debug
            .start_task(format!("Load jokes for {}", name.display()));

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = client.fetch_jokes(&name) => {
                    let _ = tx
                        .send(AsyncResult::Jokes {
                            generation,
                            task_id,
                            result,
                        })
                        .await;
                }
            }
        });
    }

    fn spawn_categories_fetch(&mut self) {
        self.load.categories = Phase::Pending;
        self.load.start();

        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let token = self.lifetime.child_token();
        let task_id = self.debug.start_task("Load categories");

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = client.fetch_categories() => {
                    let _ = tx.send(AsyncResult::Categories { task_id, result }).await;
                }
            }
        });
    }

    /// Spawn the artificial pagination delay. The whole list is already in
    /// memory; the delay only paces the reveal.
    fn spawn_page_reveal(&mut self) {
        let token = self.lifetime.child_token();
        let tx = self.result_tx.clone();
        let generation = self.generation;
        let delay = self.page_delay;
        let task_id = self.debug.start_task(format!(
            "Reveal jokes after {}",
            self.feed.visible().len()
        ));
        self.page_task = Some(PageTask {
            token: token.clone(),
            task_id,
        });

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(AsyncResult::PageRevealed { generation, task_id }).await;
                }
            }
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

fn outcome<T>(result: &Result<T, ApiError>) -> &'static str {
    if result.is_ok() { "completed" } else { "failed" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JokeBuilder, TestAppBuilder, numbered_jokes};
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn pump(app: &mut App) {
        let result = app.result_rx.recv().await.unwrap();
        app.handle_async_result(result);
    }

    /// Fake observer that records registrations and fires on demand.
    #[derive(Clone, Default)]
    struct FakeViewport {
        observed: Arc<Mutex<Vec<usize>>>,
        fire: Arc<Mutex<bool>>,
    }

    impl ViewportObserver for FakeViewport {
        fn observe(&mut self, element: usize) {
            self.observed.lock().unwrap().push(element);
        }

        fn notify(&mut self, _visible: Range<usize>) -> Option<usize> {
            let mut fire = self.fire.lock().unwrap();
            if *fire {
                *fire = false;
                Some(self.observed.lock().unwrap().last().copied().unwrap_or(0))
            } else {
                None
            }
        }

        fn disconnect(&mut self) {}
    }

    async fn mock_api(jokes: usize, categories: &[&str]) -> MockServer {
        let server = MockServer::start().await;
        let value: Vec<_> = (0..jokes)
            .map(|i| serde_json::json!({"id": i, "joke": format!("Joke {i}"), "categories": ["nerdy"]}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/jokes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"type": "success", "value": value})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"type": "success", "value": categories})),
            )
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_new_app() {
        let app = TestAppBuilder::new().build();
        assert_eq!(app.tab, Tab::Home);
        assert!(!app.should_quit);
        assert!(!app.is_loading());
        assert!(app.feed.visible().is_empty());
    }

    #[tokio::test]
    async fn load_initial_populates_feed() {
        let server = mock_api(25, &["nerdy", "explicit"]).await;
        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();

        app.load_initial();
        assert!(app.is_loading());

        pump(&mut app).await;
        pump(&mut app).await;

        assert!(!app.is_loading());
        assert_eq!(app.feed.jokes().len(), 25);
        assert_eq!(app.feed.visible().len(), 10);
        assert_eq!(app.feed.active_filter(), &["nerdy", "explicit"]);
    }

    #[tokio::test]
    async fn failed_categories_leave_loading_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jokes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"type": "success", "value": [{"id": 1, "joke": "x", "categories": []}]}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();

        app.load_initial();
        pump(&mut app).await;
        pump(&mut app).await;

        assert_eq!(app.feed.jokes().len(), 1);
        assert!(app.is_loading());
        assert!(app.load.error.is_none());
        assert!(
            app.debug
                .log
                .iter()
                .any(|e| e.level == LogLevel::Warn && e.message.contains("categories"))
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_prior_jokes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_jokes(numbered_jokes(12))
            .build();

        assert!(app.submit_name("Bruce", "Lee"));
        pump(&mut app).await;

        assert_eq!(app.feed.jokes().len(), 12);
        assert_eq!(app.load.jokes, Phase::Failed);
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn surfaced_errors_allow_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"type": "success", "value": ["nerdy"]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jokes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"type": "success", "value": []})),
            )
            .mount(&server)
            .await;
        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .surface_errors()
            .build();

        app.load_initial();
        pump(&mut app).await;
        pump(&mut app).await;

        assert!(!app.is_loading());
        assert!(app.load.error.as_deref().unwrap().contains("Server error"));

        app.update(Message::Retry);
        assert!(app.load.error.is_none());
        assert_eq!(app.load.categories, Phase::Pending);
        pump(&mut app).await;
        assert_eq!(app.feed.active_filter(), &["nerdy"]);
        assert!(!app.is_loading());
    }

    #[test]
    fn retry_is_ignored_without_surfaced_errors() {
        let mut app = TestAppBuilder::new().build();
        app.load.categories = Phase::Failed;
        app.update(Message::Retry);
        assert_eq!(app.load.categories, Phase::Failed);
        assert_eq!(app.generation, 0);
    }

    #[test]
    fn blank_name_performs_no_fetch() {
        let mut app = TestAppBuilder::new().build();
        assert!(!app.submit_name("", "Norris"));
        assert_eq!(app.generation, 0);
        assert_eq!(app.load.jokes, Phase::Idle);
        assert_eq!(app.feed.name(), &NameQuery::default());
    }

    #[tokio::test]
    async fn submit_name_refetches_jokes_only() {
        let server = mock_api(3, &["nerdy"]).await;
        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();

        assert!(app.submit_name("Bruce", "Lee"));
        assert_eq!(app.load.jokes, Phase::Pending);
        assert_eq!(app.load.categories, Phase::Idle);
        pump(&mut app).await;

        assert_eq!(app.feed.name().first, "Bruce");
        assert_eq!(app.feed.jokes().len(), 3);
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.url.path() == "/jokes"));
        assert!(
            requests[0]
                .url
                .query()
                .unwrap()
                .contains("firstName=Bruce")
        );
    }

    #[tokio::test]
    async fn stale_joke_batches_are_discarded() {
        let server = mock_api(3, &[]).await;
        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();

        app.submit_name("A", "B");
        app.submit_name("C", "D");
        pump(&mut app).await;
        pump(&mut app).await;

        assert_eq!(app.generation, 2);
        assert_eq!(app.load.jokes, Phase::Done);
        assert!(
            app.debug
                .log
                .iter()
                .any(|e| e.message.contains("discarded (stale)"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn load_more_reveals_after_delay() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24) // (24 - 10) / 2 = 7 rows
            .build();

        assert_eq!(app.visible_rows(), Some(0..7));
        app.update(Message::SelectLast);
        assert_eq!(app.home.selected, 9);
        assert!(app.load.paging);
        assert!(app.is_loading());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(app.result_rx.try_recv().is_err());
        assert_eq!(app.feed.visible().len(), 10);

        pump(&mut app).await;
        assert_eq!(app.feed.visible().len(), 20);
        assert!(!app.load.paging);
    }

    #[tokio::test(start_paused = true)]
    async fn pagination_scenario_clamps_at_list_end() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .build();

        app.update(Message::SelectLast);
        pump(&mut app).await;
        assert_eq!(app.feed.visible().len(), 20);

        app.update(Message::SelectLast);
        pump(&mut app).await;
        assert_eq!(app.feed.visible().len(), 25);

        app.update(Message::SelectLast);
        assert!(!app.load.paging);
        assert!(!app.feed.has_more());
    }

    #[tokio::test(start_paused = true)]
    async fn paging_is_not_reentrant() {
        let viewport = FakeViewport::default();
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(40))
            .viewport_height(24)
            .build()
            .with_viewport(Box::new(viewport.clone()));

        *viewport.fire.lock().unwrap() = true;
        app.update(Message::SelectNext);
        assert!(app.load.paging);

        *viewport.fire.lock().unwrap() = true;
        app.update(Message::SelectNext);
        // Second trigger is held back while the first page is pending.
        assert!(*viewport.fire.lock().unwrap());

        pump(&mut app).await;
        assert_eq!(app.feed.visible().len(), 20);
        assert_eq!(viewport.observed.lock().unwrap().last(), Some(&19));
        // The held-back trigger fires as soon as the new last row is observed.
        assert!(app.load.paging);
        assert!(!*viewport.fire.lock().unwrap());
    }

    // Real sockets, so the clock is left running for the request timeout.
    #[tokio::test]
    async fn name_fetch_in_flight_holds_pagination() {
        let server = mock_api(30, &["nerdy"]).await;
        let viewport = FakeViewport::default();
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .api_base(&server.uri())
            .build()
            .with_viewport(Box::new(viewport.clone()));

        *viewport.fire.lock().unwrap() = true;
        assert!(app.submit_name("Bruce", "Lee"));
        assert_eq!(app.load.jokes, Phase::Pending);
        app.update(Message::SelectLast);

        assert!(!app.load.paging);
        assert!(*viewport.fire.lock().unwrap());

        pump(&mut app).await;
        assert_eq!(app.load.jokes, Phase::Done);
        assert_eq!(app.feed.jokes().len(), 30);
        assert_eq!(app.feed.visible().len(), 10);
        assert_eq!(app.home, ListCursor::default());
        assert_eq!(viewport.observed.lock().unwrap().last(), Some(&9));
        // The held trigger goes to the fresh batch once the fetch resolves.
        assert!(app.load.paging);
        assert!(!*viewport.fire.lock().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn pending_categories_do_not_hold_pagination() {
        let viewport = FakeViewport::default();
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .build()
            .with_viewport(Box::new(viewport.clone()));
        app.load.categories = Phase::Pending;

        *viewport.fire.lock().unwrap() = true;
        app.update(Message::SelectNext);

        assert!(app.load.paging);
        pump(&mut app).await;
        assert_eq!(app.feed.visible().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn tall_viewport_fills_itself() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(80) // 35 rows
            .build();

        app.update(Message::UpdateViewportHeight(80));
        pump(&mut app).await;
        pump(&mut app).await;

        assert_eq!(app.feed.visible().len(), 25);
        assert!(!app.load.paging);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_reveal() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .build();

        app.update(Message::SelectLast);
        assert!(app.load.paging);
        app.shutdown();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(app.result_rx.try_recv().is_err());
        assert_eq!(app.feed.visible().len(), 10);
        assert!(app.debug.running_tasks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn new_batch_cancels_pending_reveal() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .build();

        app.update(Message::SelectLast);
        assert!(app.load.paging);

        app.handle_async_result(AsyncResult::Jokes {
            generation: app.generation,
            task_id: 99,
            result: Ok(numbered_jokes(30)),
        });
        assert!(!app.load.paging);
        assert_eq!(app.home, ListCursor::default());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(app.result_rx.try_recv().is_err());
        assert_eq!(app.feed.visible().len(), 10);
    }

    #[test]
    fn likes_tab_hides_home_list_from_observer() {
        let viewport = FakeViewport::default();
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(25))
            .viewport_height(24)
            .tab(Tab::Likes)
            .build()
            .with_viewport(Box::new(viewport.clone()));

        *viewport.fire.lock().unwrap() = true;
        app.update(Message::SelectNext);
        assert!(!app.load.paging);
    }

    #[test]
    fn like_and_unlike_selected() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(10))
            .build();

        app.update(Message::SelectNext);
        app.update(Message::Like);
        app.update(Message::Like);
        assert_eq!(app.feed.liked().len(), 1);
        assert_eq!(app.feed.liked()[0].id, 1);

        app.update(Message::Unlike);
        assert!(app.feed.liked().is_empty());
    }

    #[test]
    fn unlike_in_likes_tab_clamps_selection() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(10))
            .build();
        app.like(1);
        app.like(2);
        app.update(Message::SwitchTab(Tab::Likes));
        app.update(Message::SelectLast);
        assert_eq!(app.likes.selected, 1);

        app.update(Message::Unlike);
        assert_eq!(app.feed.liked().len(), 1);
        assert_eq!(app.likes.selected, 0);
        assert_eq!(app.selected_joke().map(|j| j.id), Some(2));
    }

    #[test]
    fn toggle_category_by_index() {
        let mut app = TestAppBuilder::new()
            .with_categories(&["nerdy", "explicit"])
            .build();

        app.update(Message::ToggleCategory(0));
        assert_eq!(app.feed.active_filter(), &["explicit"]);
        app.update(Message::ToggleCategory(0));
        assert!(app.feed.is_active("nerdy"));
        app.update(Message::ToggleCategory(7));
        assert_eq!(app.feed.active_filter().len(), 2);
    }

    #[test]
    fn category_match_uses_active_filter() {
        let mut app = TestAppBuilder::new()
            .with_categories(&["nerdy", "explicit"])
            .build();
        let nerdy = JokeBuilder::new().categories(&["nerdy"]).build();

        assert!(app.category_match(&nerdy));
        app.toggle_category("nerdy");
        assert!(!app.category_match(&nerdy));
    }

    #[test]
    fn tabs_cycle() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::NextTab);
        assert_eq!(app.tab, Tab::Likes);
        app.update(Message::PrevTab);
        assert_eq!(app.tab, Tab::Home);
    }

    #[test]
    fn scroll_top_hint_after_threshold() {
        let mut app = TestAppBuilder::new()
            .with_jokes(numbered_jokes(10))
            .viewport_height(14) // 2 rows
            .build();
        assert!(!app.show_scroll_top());

        for _ in 0..7 {
            app.update(Message::SelectNext);
        }
        assert_eq!(app.home.offset, 6);
        assert!(app.show_scroll_top());

        app.update(Message::SelectFirst);
        assert!(!app.show_scroll_top());
    }

    #[test]
    fn name_editor_edits_fields() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::OpenNameEditor);
        let editor = app.name_editor.as_ref().unwrap();
        assert_eq!(editor.first, "Chuck");

        for _ in 0.."Chuck".len() {
            app.update(Message::NameBackspace);
        }
        app.update(Message::SubmitName);
        let editor = app.name_editor.as_ref().unwrap();
        assert!(editor.rejected);
        assert_eq!(app.generation, 0);

        app.update(Message::NameInput('J'));
        app.update(Message::NameNextField);
        app.update(Message::NameInput('r'));
        let editor = app.name_editor.as_ref().unwrap();
        assert_eq!(editor.first, "J");
        assert_eq!(editor.last, "Norrisr");
        assert!(!editor.rejected);

        app.update(Message::CloseNameEditor);
        assert!(app.name_editor.is_none());
        assert_eq!(app.feed.name(), &NameQuery::default());
    }

    #[tokio::test]
    async fn name_editor_submit_closes_and_fetches() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::OpenNameEditor);
        app.update(Message::SubmitName);
        assert!(app.name_editor.is_none());
        assert_eq!(app.generation, 1);
        assert_eq!(app.load.jokes, Phase::Pending);
        app.shutdown();
    }

    #[test]
    fn list_cursor_scrolls_selection_into_view() {
        let mut cursor = ListCursor::default();
        cursor.last(20);
        cursor.scroll_into_view(5);
        assert_eq!(cursor.offset, 15);
        assert_eq!(cursor.rows(5, 20), 15..20);

        cursor.first();
        cursor.scroll_into_view(5);
        assert_eq!(cursor.rows(5, 20), 0..5);
    }
}
