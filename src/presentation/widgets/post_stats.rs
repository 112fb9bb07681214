use ratatui::prelude::*;
use thousands::Separable;

use crate::domain::post::Post;

/// Reply, repost, quote and like counters of a post
///
/// Counters the viewer contributed to are shown in bold.
pub struct PostStats {
    replies: u32,
    reposts: u32,
    quotes: u32,
    likes: u32,
    reposted: bool,
    liked: bool,
}

impl PostStats {
    pub fn new(post: &Post) -> Self {
        Self {
            replies: post.reply_count,
            reposts: post.repost.count,
            quotes: post.quote_count,
            likes: post.like.count,
            reposted: post.repost.is_active(),
            liked: post.like.is_active(),
        }
    }
}

fn counter(count: u32, label: &str, color: Color, active: bool) -> Span<'static> {
    let style = Style::default().fg(color);
    let style = if active { style.bold() } else { style };
    Span::styled(format!("{}{label}", count.separate_with_commas()), style)
}

impl From<PostStats> for Line<'_> {
    fn from(value: PostStats) -> Self {
        Line::from(vec![
            counter(value.replies, "Replies", Color::LightBlue, false),
            Span::raw(" "),
            counter(value.reposts, "Reposts", Color::LightGreen, value.reposted),
            Span::raw(" "),
            counter(value.quotes, "Quotes", Color::LightYellow, false),
            Span::raw(" "),
            counter(value.likes, "Likes", Color::LightRed, value.liked),
        ])
    }
}
