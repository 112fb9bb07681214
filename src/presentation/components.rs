//! Frame components
//!
//! Components are stateless renderers: every draw reads the whole `AppState`.

use ratatui::{prelude::*, widgets::*};

use crate::{
    core::state::AppState,
    domain::post::{Post, PostId},
    model::{
        navigation::{FrameKind, FrameStatus, ViewFrame},
        post_store::PostStore,
    },
    presentation::widgets::{
        breadcrumb::BreadcrumbWidget,
        status_bar::{StatusBarWidget, ViewContext as StatusBarViewContext},
    },
};

pub mod actor_list;
pub mod composer;
pub mod notifications;
pub mod post_list;
pub mod profile;

pub use actor_list::ActorListComponent;
pub use composer::ComposerComponent;
pub use notifications::NotificationsComponent;
pub use post_list::PostListComponent;
pub use profile::ProfileComponent;

/// Collection of all components
#[derive(Debug, Clone, Default)]
pub struct Components {
    pub posts: PostListComponent,
    pub profile: ProfileComponent,
    pub notifications: NotificationsComponent,
    pub composer: ComposerComponent,
    pub actors: ActorListComponent,
}

fn resolve<'a>(store: &'a PostStore, ids: impl Iterator<Item = &'a PostId>) -> Vec<&'a Post> {
    ids.filter_map(|id| store.post(id)).collect()
}

fn placeholder(status: &FrameStatus, title: &str) -> Paragraph<'static> {
    let (text, style) = match status {
        FrameStatus::Loading => (
            format!("Loading {title}..."),
            Style::default().fg(Color::DarkGray),
        ),
        FrameStatus::Failed(e) => (
            format!("Failed to load {title}: {e}"),
            Style::default().fg(Color::Red),
        ),
        FrameStatus::Ready => (
            String::from("Nothing to show"),
            Style::default().fg(Color::DarkGray),
        ),
    };
    Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the whole screen: breadcrumb, the top frame and the status bar
    pub fn render(&self, frame: &mut Frame, state: &AppState) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1), // Breadcrumb
                Constraint::Min(0),    // Top frame
                Constraint::Length(2), // Status bar (2 rows)
            ])
            .split(area);

        frame.render_widget(BreadcrumbWidget::new(state.nav.breadcrumb()), layout[0]);

        // A composer is drawn over the frame it was opened from
        let base = state
            .nav
            .iter()
            .filter(|view| view.composer().is_none())
            .last()
            .unwrap_or_else(|| state.nav.feed());
        self.view_frame(state, base, frame, layout[1]);

        if let Some(composer) = state.nav.top().composer() {
            let mut input_area = layout[1];
            if input_area.height >= 12 {
                input_area.height /= 2;
                input_area.y += input_area.height;
            }
            self.composer.view(composer, frame, input_area);
        }

        let status_bar_ctx = StatusBarViewContext {
            handle: state.handle.as_deref(),
            sync: &state.sync,
            pending_keys: state.pending_keys.pending(),
            unread: state.unread_notifications,
        };
        let status_bar = StatusBarWidget::new(state.status_bar.notice(), status_bar_ctx);
        frame.render_widget(status_bar, layout[2]);
    }

    fn view_frame(&self, state: &AppState, view: &ViewFrame, frame: &mut Frame, area: Rect) {
        let store = &state.store;
        let selected = view.selection.selected_index();

        match &view.kind {
            FrameKind::Feed => {
                let posts = resolve(store, store.feed().iter());
                self.posts.view(&posts, selected, "No posts yet", frame, area);
            }
            FrameKind::Thread {
                view: Some(thread), ..
            } => {
                let posts = resolve(store, thread.iter());
                self.posts.view(&posts, selected, "Thread is empty", frame, area);
            }
            FrameKind::Profile {
                content: Some(content),
                ..
            } => {
                let posts = resolve(store, content.posts.iter());
                self.profile
                    .view(&content.profile, &posts, selected, frame, area);
            }
            FrameKind::Notifications if !store.notifications().is_empty() => {
                let notifications: Vec<_> = (0..store.notifications().len())
                    .filter_map(|index| store.notification_at(index))
                    .map(|notification| {
                        let subject = notification.target().and_then(|id| store.post(id));
                        (notification, subject)
                    })
                    .collect();
                self.notifications
                    .view(&notifications, selected, frame, area);
            }
            FrameKind::Search(search) => {
                self.actors
                    .view_search(search.query(), search.results(), selected, frame, area);
            }
            FrameKind::Likes {
                likers: Some(likers),
                ..
            } => {
                self.actors
                    .view(likers, selected, "No likes yet", frame, area);
            }
            FrameKind::Thread { .. }
            | FrameKind::Profile { .. }
            | FrameKind::Notifications
            | FrameKind::Likes { .. } => {
                let title = view.kind.title().to_lowercase();
                frame.render_widget(placeholder(&view.status, &title), area);
            }
            FrameKind::Composer(_) => {}
        }
    }
}
