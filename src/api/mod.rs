mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_BASE, JokeClient};
pub use error::ApiError;
pub use types::{Joke, NameQuery};
