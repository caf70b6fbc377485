use serde::{Deserialize, Serialize};

/// Envelope shared by every endpoint: `{ "type": "success", "value": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JokeItem {
    pub id: u64,
    pub joke: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Joke {
    pub id: u64,
    pub text: String,
    pub categories: Vec<String>,
}

impl Joke {
    pub fn from_item(item: JokeItem) -> Self {
        Joke {
            id: item.id,
            text: html_escape::decode_html_entities(&item.joke).to_string(),
            categories: item.categories,
        }
    }

    /// Categories joined for display, or "uncategorized".
    pub fn category_label(&self) -> String {
        if self.categories.is_empty() {
            "uncategorized".to_string()
        } else {
            self.categories.join(", ")
        }
    }
}

/// The name pair substituted into every joke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    pub first: String,
    pub last: String,
}

impl NameQuery {
    /// Builds a query from raw input. Returns None when either part is blank.
    pub fn parse(first: &str, last: &str) -> Option<Self> {
        let (first, last) = (first.trim(), last.trim());
        if first.is_empty() || last.is_empty() {
            return None;
        }
        Some(Self {
            first: first.to_string(),
            last: last.to_string(),
        })
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

impl Default for NameQuery {
    fn default() -> Self {
        Self {
            first: "Chuck".to_string(),
            last: "Norris".to_string(),
        }
    }
}
