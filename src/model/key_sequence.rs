//! Pending-key buffer for multi-key bindings such as `gg` and `dd`
//!
//! Keys accumulate until they resolve to a binding, stop being a prefix of one, exceed the
//! maximum sequence length, or the time window between two keys runs out. Nothing blocks:
//! every key is resolved immediately, possibly to `Match::Prefix`.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<A> {
    Exact(A),
    /// The keys so far start at least one longer binding
    Prefix,
    NoMatch,
}

#[derive(Debug, Clone)]
pub struct KeySequence {
    keys: Vec<KeyEvent>,
    last_at: Option<Instant>,
    window: Duration,
    max_len: usize,
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_LEN)
    }
}

impl KeySequence {
    pub fn new(window: Duration, max_len: usize) -> Self {
        Self {
            keys: Vec::with_capacity(max_len),
            last_at: None,
            window,
            max_len: max_len.max(1),
        }
    }

    pub fn pending(&self) -> &[KeyEvent] {
        &self.keys
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.last_at = None;
    }

    pub fn push<A>(
        &mut self,
        key: KeyEvent,
        now: Instant,
        resolve: impl Fn(&[KeyEvent]) -> Match<A>,
    ) -> Match<A> {
        // Drop kind/state so that bindings compare on code and modifiers only
        let key = KeyEvent::new(key.code, key.modifiers);

        let expired = self
            .last_at
            .is_some_and(|last| now.saturating_duration_since(last) > self.window);
        if expired || self.keys.len() >= self.max_len {
            self.clear();
        }

        self.keys.push(key);
        match resolve(&self.keys) {
            Match::Exact(action) => {
                self.clear();
                Match::Exact(action)
            }
            Match::Prefix if self.keys.len() < self.max_len => {
                self.last_at = Some(now);
                Match::Prefix
            }
            _ if self.keys.len() > 1 => {
                // The pending prefix went nowhere; start over from this key alone
                self.clear();
                self.push(key, now, resolve)
            }
            _ => {
                self.clear();
                Match::NoMatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// `gg` -> "top", `dd` -> "delete", `j` -> "down"
    fn resolve(keys: &[KeyEvent]) -> Match<&'static str> {
        match keys {
            [k] if *k == key('j') => Match::Exact("down"),
            [k] if *k == key('g') || *k == key('d') => Match::Prefix,
            [a, b] if *a == key('g') && *b == key('g') => Match::Exact("top"),
            [a, b] if *a == key('d') && *b == key('d') => Match::Exact("delete"),
            _ => Match::NoMatch,
        }
    }

    #[test]
    fn test_two_key_sequence() {
        let mut seq = KeySequence::default();
        let now = Instant::now();

        assert_eq!(seq.push(key('g'), now, resolve), Match::Prefix);
        assert_eq!(seq.pending(), &[key('g')]);
        assert_eq!(seq.push(key('g'), now, resolve), Match::Exact("top"));
        assert!(seq.pending().is_empty());
    }

    #[test]
    fn test_single_key_binding() {
        let mut seq = KeySequence::default();
        assert_eq!(seq.push(key('j'), Instant::now(), resolve), Match::Exact("down"));
    }

    #[test]
    fn test_broken_prefix_retries_last_key() {
        let mut seq = KeySequence::default();
        let now = Instant::now();

        seq.push(key('g'), now, resolve);
        assert_eq!(seq.push(key('j'), now, resolve), Match::Exact("down"));

        seq.push(key('g'), now, resolve);
        assert_eq!(seq.push(key('d'), now, resolve), Match::Prefix);
        assert_eq!(seq.push(key('d'), now, resolve), Match::Exact("delete"));
    }

    #[test]
    fn test_window_expiry_forgets_pending_key() {
        let mut seq = KeySequence::new(Duration::from_millis(100), 2);
        let start = Instant::now();

        seq.push(key('d'), start, resolve);
        let late = start + Duration::from_millis(500);
        assert_eq!(seq.push(key('d'), late, resolve), Match::Prefix);
        assert_eq!(
            seq.push(key('d'), late + Duration::from_millis(50), resolve),
            Match::Exact("delete")
        );
    }

    #[test]
    fn test_unbound_key() {
        let mut seq = KeySequence::default();
        assert_eq!(seq.push(key('z'), Instant::now(), resolve), Match::NoMatch);
        assert!(seq.pending().is_empty());
    }
}
