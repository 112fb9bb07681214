//! Selection cursor over one frame's visible list
//!
//! Elm-style: the cursor changes only through `update`, and messages are named in past tense.
//! The cursor never knows what it points at; list lengths are handed in with the messages.

use crate::model::timeline::MergeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A specific item was selected by index
    ItemSelected { index: usize, len: usize },
    /// The selection was cleared
    SelectionCleared,
    PreviousItemSelected,
    NextItemSelected { len: usize },
    FirstItemSelected { len: usize },
    LastItemSelected { len: usize },
    /// Items were merged into the list this cursor points into
    ItemsMerged(MergeResult),
    /// The list was replaced or shrank
    LengthChanged { len: usize },
}

/// `None` for an empty list, otherwise clamped to `0..len`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected_index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self {
            selected_index: None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn is_selected(&self) -> bool {
        self.selected_index.is_some()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::ItemSelected { index, len } => {
                self.selected_index = match len {
                    0 => None,
                    len => Some(index.min(len - 1)),
                };
            }
            Message::SelectionCleared => {
                self.selected_index = None;
            }
            Message::PreviousItemSelected => {
                if let Some(index) = self.selected_index {
                    self.selected_index = Some(index.saturating_sub(1));
                }
            }
            Message::NextItemSelected { len } => match self.selected_index {
                Some(index) if index + 1 < len => {
                    self.selected_index = Some(index + 1);
                }
                None if len > 0 => {
                    self.selected_index = Some(0);
                }
                _ => {}
            },
            Message::FirstItemSelected { len } => {
                self.selected_index = (len > 0).then_some(0);
            }
            Message::LastItemSelected { len } => {
                self.selected_index = len.checked_sub(1);
            }
            Message::ItemsMerged(result) => {
                self.selected_index = match self.selected_index {
                    Some(index) => Some(result.remap(index)),
                    // Only an empty list is unselected, so the first page lands on its top
                    None => (result.inserted > 0).then_some(0),
                };
            }
            Message::LengthChanged { len } => {
                self.selected_index = match (self.selected_index, len) {
                    (_, 0) => None,
                    (Some(index), len) => Some(index.min(len - 1)),
                    (None, _) => Some(0),
                };
            }
        }
    }
}
