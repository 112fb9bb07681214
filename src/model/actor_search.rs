//! Typeahead search for accounts
//!
//! Every edit of the query asks for a new lookup. Results carry the query they answer, so a
//! slow answer to an older query never replaces the results of the current one.

use crate::domain::post::Author;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Typed(char),
    Erased,
    ResultsLoaded { query: String, actors: Vec<Author> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorSearch {
    query: String,
    results: Vec<Author>,
}

impl ActorSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Author] {
        &self.results
    }

    /// Returns the query to look up when the input changed
    pub fn update(&mut self, message: Message) -> Option<String> {
        match message {
            Message::Typed(c) => {
                self.query.push(c);
                self.lookup()
            }
            Message::Erased => {
                self.query.pop()?;
                self.lookup()
            }
            Message::ResultsLoaded { query, actors } => {
                if query == self.query.trim() {
                    self.results = actors;
                } else {
                    log::debug!("dropping results for `{query}`, query is now `{}`", self.query);
                }
                None
            }
        }
    }

    fn lookup(&mut self) -> Option<String> {
        let query = self.query.trim();
        if query.is_empty() {
            self.results.clear();
            return None;
        }
        Some(query.to_string())
    }
}
