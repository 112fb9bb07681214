//! Feed synchronizer
//!
//! Decides when the newest page and the next older page are requested. It never talks to the
//! network itself: `update` answers with the request to issue, and the outcome comes back as
//! another message.
//!
//! ```text
//! Idle --tick--> Fetching --page--> Merging --merged--> Idle
//!                   |
//!                   +--transient error--> Failed --tick (backoff allows)--> Fetching
//!                   +--auth error-------> Halted --reauthenticated--> Idle
//! ```
//!
//! At most one head request and one older-page request are in flight at any time.

use std::fmt::Debug;

use crate::infrastructure::api::{Cursor, ErrorKind};

/// Retry policy after a failed head request
pub trait Backoff: Debug + Send {
    /// `attempts` consecutive failures so far, `ticks` ticks since the last one
    fn ready(&self, attempts: u32, ticks: u32) -> bool;
}

/// Retry on the very next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextTick;

impl Backoff for NextTick {
    fn ready(&self, _attempts: u32, _ticks: u32) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Merging,
    Failed {
        kind: ErrorKind,
        attempts: u32,
        ticks: u32,
    },
    /// Authentication was rejected; nothing happens until the session is renewed
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Head,
    Older(Cursor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Ticked,
    HeadReceived,
    Merged {
        next_cursor: Option<Cursor>,
        was_empty: bool,
    },
    HeadFailed(ErrorKind),
    OlderRequested,
    OlderReceived {
        next_cursor: Option<Cursor>,
    },
    OlderFailed(ErrorKind),
    Reauthenticated,
}

#[derive(Debug, Clone)]
pub struct FeedSync<B = NextTick> {
    state: SyncState,
    backoff: B,
    /// Head failures since the last merged page
    failures: u32,
    older_cursor: Option<Cursor>,
    loading_older: bool,
    exhausted: bool,
}

impl Default for FeedSync<NextTick> {
    fn default() -> Self {
        Self::new(NextTick)
    }
}

impl<B: Backoff> FeedSync<B> {
    pub fn new(backoff: B) -> Self {
        Self {
            state: SyncState::Idle,
            backoff,
            failures: 0,
            older_cursor: None,
            loading_older: false,
            exhausted: false,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == SyncState::Halted
    }

    pub fn is_loading_older(&self) -> bool {
        self.loading_older
    }

    /// The server reported that there are no older posts
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn older_cursor(&self) -> Option<&Cursor> {
        self.older_cursor.as_ref()
    }

    pub fn update(&mut self, message: Message) -> Option<Request> {
        match message {
            Message::Ticked => match &mut self.state {
                SyncState::Idle => {
                    self.state = SyncState::Fetching;
                    Some(Request::Head)
                }
                SyncState::Failed {
                    attempts, ticks, ..
                } => {
                    *ticks += 1;
                    if self.backoff.ready(*attempts, *ticks) {
                        self.state = SyncState::Fetching;
                        Some(Request::Head)
                    } else {
                        None
                    }
                }
                SyncState::Fetching | SyncState::Merging | SyncState::Halted => None,
            },
            Message::HeadReceived => {
                if self.state == SyncState::Fetching {
                    self.state = SyncState::Merging;
                }
                None
            }
            Message::Merged {
                next_cursor,
                was_empty,
            } => {
                if self.state == SyncState::Merging {
                    self.state = SyncState::Idle;
                    self.failures = 0;
                }
                if was_empty && self.older_cursor.is_none() {
                    self.exhausted = next_cursor.is_none();
                    self.older_cursor = next_cursor;
                }
                None
            }
            Message::HeadFailed(kind) => {
                self.state = match (kind, &self.state) {
                    (ErrorKind::Auth, _) | (_, SyncState::Halted) => SyncState::Halted,
                    (kind, _) => {
                        self.failures += 1;
                        SyncState::Failed {
                            kind,
                            attempts: self.failures,
                            ticks: 0,
                        }
                    }
                };
                None
            }
            Message::OlderRequested => {
                if self.loading_older || self.exhausted || self.is_halted() {
                    return None;
                }
                let cursor = self.older_cursor.clone()?;
                self.loading_older = true;
                Some(Request::Older(cursor))
            }
            Message::OlderReceived { next_cursor } => {
                self.loading_older = false;
                self.exhausted = next_cursor.is_none();
                self.older_cursor = next_cursor;
                None
            }
            Message::OlderFailed(kind) => {
                self.loading_older = false;
                if kind == ErrorKind::Auth {
                    self.state = SyncState::Halted;
                }
                None
            }
            Message::Reauthenticated => {
                if self.is_halted() {
                    self.state = SyncState::Idle;
                    self.failures = 0;
                }
                None
            }
        }
    }
}
