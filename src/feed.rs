//! Joke feed state: the fetched list, the revealed prefix, likes and category filters.
//!
//! `JokeFeed` holds no I/O. The app spawns fetches and timers and feeds their
//! results back through the transition methods here.

use crate::api::{Joke, NameQuery};

/// Number of jokes revealed initially and on each pagination trigger.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct JokeFeed {
    jokes: Vec<Joke>,
    visible: usize,
    liked: Vec<Joke>,
    categories: Vec<String>,
    active: Vec<String>,
    name: NameQuery,
}

impl JokeFeed {
    pub fn new(name: NameQuery) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &NameQuery {
        &self.name
    }

    /// Replaces the name query. Returns false (and keeps the old one) when
    /// either part is blank.
    pub fn set_name(&mut self, first: &str, last: &str) -> bool {
        match NameQuery::parse(first, last) {
            Some(name) => {
                self.name = name;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole joke list and resets the window to the first page.
    pub fn set_jokes(&mut self, jokes: Vec<Joke>) {
        self.visible = PAGE_SIZE.min(jokes.len());
        self.jokes = jokes;
    }

    pub fn jokes(&self) -> &[Joke] {
        &self.jokes
    }

    /// The revealed prefix of the joke list.
    pub fn visible(&self) -> &[Joke] {
        &self.jokes[..self.visible]
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.jokes.len()
    }

    /// Grows the window by one page, clamped to the list length.
    /// Returns the number of newly revealed jokes.
    pub fn reveal_more(&mut self) -> usize {
        let before = self.visible;
        self.visible = (self.visible + PAGE_SIZE).min(self.jokes.len());
        self.visible - before
    }

    pub fn liked(&self) -> &[Joke] {
        &self.liked
    }

    pub fn is_liked(&self, id: u64) -> bool {
        self.liked.iter().any(|j| j.id == id)
    }

    /// Likes a joke from the visible window, placing it first.
    /// Already-liked and not-yet-revealed ids are ignored.
    pub fn like(&mut self, id: u64) -> bool {
        if self.is_liked(id) {
            return false;
        }
        let Some(joke) = self.visible().iter().find(|j| j.id == id).cloned() else {
            return false;
        };
        self.liked.insert(0, joke);
        true
    }

    pub fn unlike(&mut self, id: u64) -> bool {
        let before = self.liked.len();
        self.liked.retain(|j| j.id != id);
        self.liked.len() != before
    }

    /// Replaces the category set and re-activates every category.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.active = categories.clone();
        self.categories = categories;
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|name| Category {
            name: name.clone(),
            active: self.is_active(name),
        })
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_at(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }

    pub fn is_active(&self, category: &str) -> bool {
        self.active.iter().any(|c| c == category)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn active_filter(&self) -> &[String] {
        &self.active
    }

    /// Flips a category in the active filter. Unknown names are ignored so the
    /// filter never leaves the category set.
    pub fn toggle_category(&mut self, name: &str) -> bool {
        if !self.categories.iter().any(|c| c == name) {
            return false;
        }
        if let Some(pos) = self.active.iter().position(|c| c == name) {
            self.active.remove(pos);
        } else {
            self.active.push(name.to_string());
        }
        true
    }

    /// True when any of the joke's categories is in the active filter.
    pub fn category_match(&self, categories: &[String]) -> bool {
        categories.iter().any(|c| self.is_active(c))
    }
}
