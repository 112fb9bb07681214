use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::post::{Author, PostId};

/// Kinds of things the launcher collaborator knows how to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum OpenKind {
    Image,
    Video,
    Link,
    FilePicker,
    ClipboardImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub thumb: String,
    pub fullsize: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub playlist: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub uri: String,
    pub title: String,
    pub description: String,
}

/// A post quoted inside another post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotedRecord {
    Post {
        id: PostId,
        author: Author,
        text: String,
    },
    NotFound,
    Blocked,
}

/// Media or references attached to a fetched post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostEmbed {
    Images(Vec<ImageRef>),
    Video(VideoRef),
    External(LinkRef),
    Record(QuotedRecord),
    RecordWithMedia(QuotedRecord, Box<PostEmbed>),
}

impl PostEmbed {
    /// Everything in this embed that can be handed to the launcher
    pub fn open_targets(&self) -> Vec<(OpenKind, String)> {
        match self {
            PostEmbed::Images(images) => images
                .iter()
                .map(|image| (OpenKind::Image, image.fullsize.clone()))
                .collect(),
            PostEmbed::Video(video) => vec![(OpenKind::Video, video.playlist.clone())],
            PostEmbed::External(link) => vec![(OpenKind::Link, link.uri.clone())],
            PostEmbed::Record(_) => vec![],
            PostEmbed::RecordWithMedia(_, media) => media.open_targets(),
        }
    }

    pub fn quoted(&self) -> Option<&QuotedRecord> {
        match self {
            PostEmbed::Record(record) | PostEmbed::RecordWithMedia(record, _) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for PostEmbed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostEmbed::Images(images) if images.len() == 1 => write!(f, "[image]"),
            PostEmbed::Images(images) => write!(f, "[{} images]", images.len()),
            PostEmbed::Video(_) => write!(f, "[video]"),
            PostEmbed::External(link) if link.title.is_empty() => write!(f, "[link] {}", link.uri),
            PostEmbed::External(link) => write!(f, "[link] {}", link.title),
            PostEmbed::Record(QuotedRecord::Post { author, .. }) => {
                write!(f, "[quote] {}", author.name())
            }
            PostEmbed::Record(QuotedRecord::NotFound) => write!(f, "[quote] (deleted post)"),
            PostEmbed::Record(QuotedRecord::Blocked) => write!(f, "[quote] (blocked)"),
            PostEmbed::RecordWithMedia(record, media) => {
                write!(f, "{media} {}", PostEmbed::Record(record.clone()))
            }
        }
    }
}

/// Raw image bytes attached to a draft
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

impl ImageAttachment {
    /// Guess the mime type from magic bytes, falling back to the file extension
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime = match data.as_slice() {
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [0xff, 0xd8, 0xff, ..] => "image/jpeg",
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
            [b'G', b'I', b'F', ..] => "image/gif",
            [b'B', b'M', ..] => "image/bmp",
            _ if name.ends_with(".png") => "image/png",
            _ => "image/jpeg",
        }
        .to_string();
        Self { name, mime, data }
    }
}

/// One attachment of a draft, in the order the user added them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedItem {
    Image(ImageAttachment),
    LinkCard { uri: String },
    QuotedPost { id: PostId, cid: String },
}

impl EmbedItem {
    pub fn label(&self) -> String {
        match self {
            EmbedItem::Image(image) => format!("image: {}", image.name),
            EmbedItem::LinkCard { uri } => format!("link: {uri}"),
            EmbedItem::QuotedPost { id, .. } => format!("quote: {id}"),
        }
    }
}
