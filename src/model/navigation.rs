//! Stack of navigable views
//!
//! The feed frame sits at the bottom and can never be popped, so the stack is never empty.
//! Every frame gets a `FrameId` when pushed; asynchronous results carry the id of the frame
//! that asked for them and are dropped once that frame is gone.

use std::fmt;

use crate::{
    domain::{
        post::{Author, PostId},
        profile::Profile,
        thread::ThreadView,
    },
    model::{actor_search::ActorSearch, composer::Composer, selection::Selection},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Profile header plus the author feed shown below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContent {
    pub profile: Profile,
    pub posts: Vec<PostId>,
}

#[derive(Debug, Clone)]
pub enum FrameKind {
    Feed,
    Thread {
        root: PostId,
        view: Option<ThreadView>,
    },
    Profile {
        actor: String,
        content: Option<ProfileContent>,
    },
    Notifications,
    Composer(Box<Composer>),
    Search(ActorSearch),
    /// Accounts that liked a post
    Likes {
        post: PostId,
        likers: Option<Vec<Author>>,
    },
}

impl FrameKind {
    pub fn title(&self) -> &'static str {
        match self {
            FrameKind::Feed => "Feed",
            FrameKind::Thread { .. } => "Thread",
            FrameKind::Profile { .. } => "Profile",
            FrameKind::Notifications => "Notifications",
            FrameKind::Composer(_) => "Compose",
            FrameKind::Search(_) => "Search",
            FrameKind::Likes { .. } => "Likes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ViewFrame {
    pub id: FrameId,
    pub kind: FrameKind,
    pub selection: Selection,
    pub status: FrameStatus,
}

impl ViewFrame {
    pub fn is_feed_like(&self) -> bool {
        matches!(self.kind, FrameKind::Feed | FrameKind::Notifications)
    }

    pub fn composer(&self) -> Option<&Composer> {
        match &self.kind {
            FrameKind::Composer(composer) => Some(composer),
            _ => None,
        }
    }

    pub fn composer_mut(&mut self) -> Option<&mut Composer> {
        match &mut self.kind {
            FrameKind::Composer(composer) => Some(composer),
            _ => None,
        }
    }

    /// Accounts listed by a likes or search frame
    pub fn actors(&self) -> Option<&[Author]> {
        match &self.kind {
            FrameKind::Search(search) => Some(search.results()),
            FrameKind::Likes { likers, .. } => Some(likers.as_deref().unwrap_or_default()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Popped {
    Frame(ViewFrame),
    /// Only the feed frame is left
    Rejected,
}

#[derive(Debug, Clone)]
pub struct NavigationStack {
    frames: Vec<ViewFrame>,
    next_id: u64,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStack {
    pub fn new() -> Self {
        let mut stack = Self {
            frames: Vec::new(),
            next_id: 0,
        };
        stack.push_with_status(FrameKind::Feed, FrameStatus::Ready);
        stack
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> &ViewFrame {
        // The feed frame is pushed in `new` and never popped
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut ViewFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn feed(&self) -> &ViewFrame {
        &self.frames[0]
    }

    pub fn get(&self, id: FrameId) -> Option<&ViewFrame> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    pub fn get_mut(&mut self, id: FrameId) -> Option<&mut ViewFrame> {
        self.frames.iter_mut().find(|frame| frame.id == id)
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewFrame> {
        self.frames.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ViewFrame> {
        self.frames.iter_mut()
    }

    /// Titles from the bottom of the stack to the top
    pub fn breadcrumb(&self) -> Vec<&'static str> {
        self.frames.iter().map(|frame| frame.kind.title()).collect()
    }

    /// Push a frame that still has to load its content
    pub fn push(&mut self, kind: FrameKind) -> FrameId {
        let status = match kind {
            FrameKind::Thread { view: None, .. }
            | FrameKind::Profile { content: None, .. }
            | FrameKind::Likes { likers: None, .. } => FrameStatus::Loading,
            _ => FrameStatus::Ready,
        };
        self.push_with_status(kind, status)
    }

    fn push_with_status(&mut self, kind: FrameKind, status: FrameStatus) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.frames.push(ViewFrame {
            id,
            kind,
            selection: Selection::new(),
            status,
        });
        id
    }

    pub fn pop(&mut self) -> Popped {
        if self.frames.len() <= 1 {
            return Popped::Rejected;
        }
        match self.frames.pop() {
            Some(frame) => Popped::Frame(frame),
            None => Popped::Rejected,
        }
    }

    /// Remove a specific frame, e.g. a composer whose post went through while it was covered
    pub fn remove(&mut self, id: FrameId) -> Option<ViewFrame> {
        let index = self.frames.iter().position(|frame| frame.id == id)?;
        (index > 0).then(|| self.frames.remove(index))
    }
}
