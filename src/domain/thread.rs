use std::{cmp::Ordering, iter};

use crate::domain::post::PostId;

/// Flattened render order of a post thread
///
/// Ancestors come first (oldest to newest), then the root, then the replies depth-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView {
    pub root: PostId,
    pub parents: Vec<PostId>,
    pub replies: Vec<PostId>,
}

impl ThreadView {
    pub fn new(root: PostId) -> Self {
        Self {
            root,
            parents: vec![],
            replies: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len() + 1 + self.replies.len()
    }

    /// Never empty: a thread always holds its root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn root_index(&self) -> usize {
        self.parents.len()
    }

    pub fn get(&self, index: usize) -> Option<&PostId> {
        let root = self.root_index();
        match index.cmp(&root) {
            Ordering::Less => self.parents.get(index),
            Ordering::Equal => Some(&self.root),
            Ordering::Greater => self.replies.get(index - root - 1),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostId> {
        self.parents
            .iter()
            .chain(iter::once(&self.root))
            .chain(self.replies.iter())
    }
}
