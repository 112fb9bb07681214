mod common;

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;

use common::{code, key, page, post, FakeApi, Harness};
use skytui::{
    domain::{
        embed::{ImageAttachment, ImageRef, LinkRef, OpenKind, PostEmbed},
        post::Post,
    },
    model::composer::ComposerError,
};

async fn harness_with_feed(posts: Vec<Post>) -> Harness {
    let api = FakeApi::default();
    api.push_feed(Ok(page(posts, None)));
    let mut harness = Harness::new(api);
    harness.start().await;
    harness
}

#[tokio::test]
async fn test_like_then_unlike() {
    let mut harness = harness_with_feed(vec![post("p1", 10)]).await;

    harness.press(key(' ')).await;
    let liked = harness.state.selected_post().expect("selected").like.clone();
    assert_eq!(liked.count, 1);
    assert_eq!(
        liked.viewer.as_deref(),
        Some("at://did:plc:me/app.bsky.feed.like/p1")
    );

    harness.press(key(' ')).await;
    let unliked = harness.state.selected_post().expect("selected").like.clone();
    assert_eq!(unliked.count, 0);
    assert_eq!(unliked.viewer, None);

    assert_eq!(
        harness.api.calls(),
        vec![
            "feed -",
            "like p1",
            "unlike at://did:plc:me/app.bsky.feed.like/p1"
        ]
    );
}

#[tokio::test]
async fn test_repost_marks_the_post() {
    let mut harness = harness_with_feed(vec![post("p1", 10)]).await;

    harness.press(key('o')).await;

    let repost = &harness.state.selected_post().expect("selected").repost;
    assert!(repost.is_active());
    assert_eq!(repost.count, 1);
}

#[tokio::test]
async fn test_new_post_lands_on_top_of_the_feed() {
    let mut harness = harness_with_feed(vec![post("p1", 10)]).await;

    harness.press(key('n')).await;
    assert_eq!(harness.state.nav.breadcrumb(), vec!["Feed", "Compose"]);

    harness.type_keys("ihello").await;
    harness.press(code(KeyCode::Esc)).await;
    harness.press(code(KeyCode::Enter)).await;

    let state = &harness.state;
    assert_eq!(state.nav.breadcrumb(), vec!["Feed"]);
    assert_eq!(state.store.feed_len(), 2);
    assert_eq!(
        state.store.feed_post_at(0).map(|post| post.text.as_str()),
        Some("hello")
    );
    assert_eq!(harness.selected_text().as_deref(), Some("post p1"));
    assert_eq!(harness.api.calls(), vec!["feed -", "post hello"]);
}

#[tokio::test]
async fn test_empty_draft_is_not_sent() {
    let mut harness = harness_with_feed(vec![]).await;

    harness.press(key('n')).await;
    harness.press(code(KeyCode::Enter)).await;

    let composer = harness.state.nav.top().composer().expect("composer open");
    assert!(matches!(composer.error(), Some(ComposerError::Validation(_))));
    assert!(!composer.is_submitting());

    harness.press(code(KeyCode::Backspace)).await;

    assert_eq!(harness.state.nav.breadcrumb(), vec!["Feed"]);
    assert_eq!(harness.api.calls(), vec!["feed -"]);
}

#[tokio::test]
async fn test_picked_image_is_attached_and_sent() {
    let mut harness = harness_with_feed(vec![]).await;
    *harness.launcher.attachment.lock().expect("lock") = Some(ImageAttachment::new(
        "cat.png",
        vec![0x89, b'P', b'N', b'G'],
    ));

    harness.press(key('n')).await;
    // Text -> languages -> attachments
    harness.press(code(KeyCode::Tab)).await;
    harness.press(code(KeyCode::Tab)).await;
    harness.press(key('a')).await;

    let composer = harness.state.nav.top().composer().expect("composer open");
    assert_eq!(composer.embeds().len(), 1);
    assert_eq!(
        harness.launcher.opened.lock().expect("lock").clone(),
        vec![(OpenKind::FilePicker, String::new())]
    );

    harness.press(code(KeyCode::Enter)).await;

    assert_eq!(harness.state.nav.breadcrumb(), vec!["Feed"]);
    assert_eq!(harness.api.calls(), vec!["feed -", "post "]);
}

#[tokio::test]
async fn test_open_media_and_link() {
    let mut with_images = post("p2", 20);
    with_images.embed = Some(PostEmbed::Images(vec![
        ImageRef {
            thumb: String::from("https://cdn.test/thumb/1"),
            fullsize: String::from("https://cdn.test/full/1"),
            alt: String::new(),
        },
        ImageRef {
            thumb: String::from("https://cdn.test/thumb/2"),
            fullsize: String::from("https://cdn.test/full/2"),
            alt: String::from("a cat"),
        },
    ]));
    let mut with_link = post("p1", 10);
    with_link.embed = Some(PostEmbed::External(LinkRef {
        uri: String::from("https://example.com/article"),
        title: String::from("Article"),
        description: String::new(),
    }));
    let mut harness = harness_with_feed(vec![with_images, with_link]).await;

    harness.press(key('m')).await;
    harness.press(key('j')).await;
    harness.press(key('l')).await;
    // No media on the second post
    harness.press(key('m')).await;

    // Both images are opened by concurrent tasks
    let mut opened = harness.launcher.opened.lock().expect("lock").clone();
    opened.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        opened,
        vec![
            (OpenKind::Image, String::from("https://cdn.test/full/1")),
            (OpenKind::Image, String::from("https://cdn.test/full/2")),
            (OpenKind::Link, String::from("https://example.com/article")),
        ]
    );
    assert!(harness.state.status_bar.notice().is_some());
}
