//! Post composer
//!
//! A modal, vim-flavoured editor for one draft. The draft is the text buffer plus selected
//! languages, ordered embeds and an optional reply target. Keys are fed one at a time through
//! `update`; multi-key commands such as `dd` go through a pending-key buffer with a time
//! window instead of blocking for the next key.
//!
//! Modes:
//! - `Normal`: motions and commands; `Tab` cycles focus between text, languages and embeds;
//!   `Enter` submits; `Backspace` closes the composer
//! - `Insert`: keys go straight into the text buffer until `Esc`
//! - `LangSelect`: type to filter languages, `Enter` toggles, `Esc` leaves
//! - `EmbedPicker`: waiting for the external file picker

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use tui_textarea::{CursorMove, TextArea};

use crate::{
    domain::{
        embed::{EmbedItem, ImageAttachment, OpenKind},
        langs,
        post::{CreatePostRequest, PostId, ReplyRef},
        text::{char_count, find_urls},
    },
    model::{
        key_sequence::{KeySequence, Match},
        selection::{Message as SelectionMessage, Selection},
    },
};

pub const MAX_CHARS: usize = 300;
pub const MAX_LANGS: usize = 3;
pub const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Normal,
    Insert,
    EmbedPicker,
    LangSelect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Text,
    Lang,
    Embed,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Text => Focus::Lang,
            Focus::Lang => Focus::Embed,
            Focus::Embed => Focus::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nothing to post")]
    Empty,
    #[error("post is {len} characters long (max {})", MAX_CHARS)]
    TooLong { len: usize },
    #[error("at most {} languages", MAX_LANGS)]
    TooManyLanguages,
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("at most {} images", MAX_IMAGES)]
    TooManyImages,
    #[error("only one link card")]
    DuplicateLink,
    #[error("only one quoted post")]
    DuplicateQuote,
    #[error("images and a link card cannot be combined")]
    MixedMedia,
    #[error("no link in text")]
    NoLinkInText,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot attach: {0}")]
    Attachment(String),
    #[error("cannot post: {0}")]
    Submit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPressed { key: KeyEvent, at: Instant },
    /// Bracketed paste from the terminal
    Pasted(String),
    AttachmentLoaded(ImageAttachment),
    AttachmentFailed(String),
    /// The picker or clipboard returned nothing
    PickerClosed,
    SubmitFailed(String),
}

/// What the host has to do after a message was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    None,
    Close,
    Submit(CreatePostRequest),
    Open(OpenKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Motion),
    Insert(InsertAt),
    DeleteChar,
    DeleteLine,
    Undo,
    Redo,
    SelectPrevious,
    SelectNext,
    RemoveEmbed,
    PasteImage,
    PickFile,
    AddLink,
    EditLangs,
    RemoveLastLang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Back,
    Forward,
    Up,
    Down,
    WordForward,
    WordBack,
    WordEnd,
    Head,
    End,
    Top,
    Bottom,
}

impl From<Motion> for CursorMove {
    fn from(motion: Motion) -> Self {
        match motion {
            Motion::Back => CursorMove::Back,
            Motion::Forward => CursorMove::Forward,
            Motion::Up => CursorMove::Up,
            Motion::Down => CursorMove::Down,
            Motion::WordForward => CursorMove::WordForward,
            Motion::WordBack => CursorMove::WordBack,
            Motion::WordEnd => CursorMove::WordEnd,
            Motion::Head => CursorMove::Head,
            Motion::End => CursorMove::End,
            Motion::Top => CursorMove::Top,
            Motion::Bottom => CursorMove::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertAt {
    Cursor,
    After,
    LineEnd,
    LineBelow,
    LineAbove,
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    textarea: TextArea<'static>,
    mode: EditMode,
    focus: Focus,
    langs: Vec<String>,
    lang_query: String,
    lang_selection: Selection,
    embeds: Vec<EmbedItem>,
    embed_selection: Selection,
    reply_to: Option<ReplyRef>,
    pending: KeySequence,
    error: Option<ComposerError>,
    submitting: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft that quotes `id`
    pub fn quote(id: PostId, cid: String) -> Self {
        let mut composer = Self::new();
        composer.embeds.push(EmbedItem::QuotedPost { id, cid });
        composer
            .embed_selection
            .update(SelectionMessage::FirstItemSelected { len: 1 });
        composer
    }

    pub fn reply(reply_to: ReplyRef) -> Self {
        Self {
            reply_to: Some(reply_to),
            ..Self::default()
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn langs(&self) -> &[String] {
        &self.langs
    }

    pub fn lang_query(&self) -> &str {
        &self.lang_query
    }

    pub fn lang_candidates(&self) -> Vec<(&'static str, &'static str)> {
        langs::filter(&self.lang_query)
    }

    pub fn selected_lang_candidate(&self) -> Option<usize> {
        self.lang_selection.selected_index()
    }

    pub fn embeds(&self) -> &[EmbedItem] {
        &self.embeds
    }

    pub fn selected_embed(&self) -> Option<usize> {
        self.embed_selection.selected_index()
    }

    pub fn reply_to(&self) -> Option<&ReplyRef> {
        self.reply_to.as_ref()
    }

    pub fn error(&self) -> Option<&ComposerError> {
        self.error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn remaining_chars(&self) -> isize {
        MAX_CHARS as isize - char_count(&self.text()) as isize
    }

    pub fn update(&mut self, message: Message) -> Outcome {
        match message {
            Message::KeyPressed { key, at } => {
                if self.submitting {
                    return Outcome::None;
                }
                match self.mode {
                    EditMode::Insert => self.handle_insert_key(key),
                    EditMode::LangSelect => self.handle_lang_select_key(key),
                    EditMode::EmbedPicker => {
                        if key.code == KeyCode::Esc {
                            self.mode = EditMode::Normal;
                        }
                        Outcome::None
                    }
                    EditMode::Normal => self.handle_normal_key(key, at),
                }
            }
            Message::Pasted(text) => {
                if self.focus == Focus::Text && !self.submitting {
                    self.textarea.insert_str(text);
                }
                Outcome::None
            }
            Message::AttachmentLoaded(image) => {
                if self.mode == EditMode::EmbedPicker {
                    self.mode = EditMode::Normal;
                }
                if let Err(e) = self.add_embed(EmbedItem::Image(image)) {
                    self.error = Some(e.into());
                }
                Outcome::None
            }
            Message::AttachmentFailed(reason) => {
                if self.mode == EditMode::EmbedPicker {
                    self.mode = EditMode::Normal;
                }
                self.error = Some(ComposerError::Attachment(reason));
                Outcome::None
            }
            Message::PickerClosed => {
                if self.mode == EditMode::EmbedPicker {
                    self.mode = EditMode::Normal;
                }
                Outcome::None
            }
            Message::SubmitFailed(reason) => {
                self.submitting = false;
                self.error = Some(ComposerError::Submit(reason));
                Outcome::None
            }
        }
    }

    /// Turn the draft into a request, leaving the draft untouched on failure
    pub fn submit(&self) -> Result<CreatePostRequest, ValidationError> {
        let text = self.text();
        let text = text.trim_end();
        if text.trim().is_empty() && self.embeds.is_empty() {
            return Err(ValidationError::Empty);
        }

        let len = char_count(text);
        if len > MAX_CHARS {
            return Err(ValidationError::TooLong { len });
        }

        if self.langs.len() > MAX_LANGS {
            return Err(ValidationError::TooManyLanguages);
        }
        if let Some(unknown) = self.langs.iter().find(|lang| !langs::is_known(lang)) {
            return Err(ValidationError::UnknownLanguage(unknown.clone()));
        }

        Ok(CreatePostRequest {
            text: text.to_string(),
            langs: self.langs.clone(),
            embeds: self.embeds.clone(),
            reply: self.reply_to.clone(),
        })
    }

    pub fn add_embed(&mut self, item: EmbedItem) -> Result<(), ValidationError> {
        let images = self
            .embeds
            .iter()
            .filter(|embed| matches!(embed, EmbedItem::Image(_)))
            .count();
        let has_link = self
            .embeds
            .iter()
            .any(|embed| matches!(embed, EmbedItem::LinkCard { .. }));

        match &item {
            EmbedItem::Image(_) if has_link => return Err(ValidationError::MixedMedia),
            EmbedItem::Image(_) if images >= MAX_IMAGES => {
                return Err(ValidationError::TooManyImages)
            }
            EmbedItem::LinkCard { .. } if has_link => return Err(ValidationError::DuplicateLink),
            EmbedItem::LinkCard { .. } if images > 0 => return Err(ValidationError::MixedMedia),
            EmbedItem::QuotedPost { .. }
                if self
                    .embeds
                    .iter()
                    .any(|embed| matches!(embed, EmbedItem::QuotedPost { .. })) =>
            {
                return Err(ValidationError::DuplicateQuote)
            }
            _ => {}
        }

        self.embeds.push(item);
        let len = self.embeds.len();
        self.embed_selection
            .update(SelectionMessage::ItemSelected { index: len - 1, len });
        Ok(())
    }

    pub fn remove_selected_embed(&mut self) -> Option<EmbedItem> {
        let index = self.embed_selection.selected_index()?;
        if index >= self.embeds.len() {
            return None;
        }
        let removed = self.embeds.remove(index);
        self.embed_selection.update(SelectionMessage::LengthChanged {
            len: self.embeds.len(),
        });
        Some(removed)
    }

    fn handle_insert_key(&mut self, key: KeyEvent) -> Outcome {
        if key.code == KeyCode::Esc {
            self.mode = EditMode::Normal;
            // Leave the cursor on the last inserted character like vim does
            if self.textarea.cursor().1 > 0 {
                self.textarea.move_cursor(CursorMove::Back);
            }
            return Outcome::None;
        }
        self.error = None;
        self.textarea.input(key);
        Outcome::None
    }

    fn handle_lang_select_key(&mut self, key: KeyEvent) -> Outcome {
        let candidates = self.lang_candidates();
        let len = candidates.len();
        match key.code {
            KeyCode::Esc => {
                self.mode = EditMode::Normal;
                self.lang_query.clear();
                self.lang_selection.update(SelectionMessage::SelectionCleared);
            }
            KeyCode::Enter => {
                let selected = self
                    .lang_selection
                    .selected_index()
                    .and_then(|index| candidates.get(index));
                if let Some(&(code, _)) = selected {
                    if let Err(e) = self.toggle_lang(code) {
                        self.error = Some(e.into());
                    }
                }
            }
            KeyCode::Up => self.lang_selection.update(SelectionMessage::PreviousItemSelected),
            KeyCode::Down => self
                .lang_selection
                .update(SelectionMessage::NextItemSelected { len }),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.lang_selection.update(SelectionMessage::PreviousItemSelected)
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => self
                .lang_selection
                .update(SelectionMessage::NextItemSelected { len }),
            KeyCode::Backspace => {
                self.lang_query.pop();
                self.reset_lang_selection();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.lang_query.push(c);
                self.reset_lang_selection();
            }
            _ => {}
        }
        Outcome::None
    }

    fn reset_lang_selection(&mut self) {
        let len = self.lang_candidates().len();
        self.lang_selection
            .update(SelectionMessage::FirstItemSelected { len });
    }

    fn toggle_lang(&mut self, code: &str) -> Result<(), ValidationError> {
        if let Some(index) = self.langs.iter().position(|lang| lang == code) {
            self.langs.remove(index);
            return Ok(());
        }
        if !langs::is_known(code) {
            return Err(ValidationError::UnknownLanguage(code.to_string()));
        }
        if self.langs.len() >= MAX_LANGS {
            return Err(ValidationError::TooManyLanguages);
        }
        self.langs.push(code.to_string());
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent, at: Instant) -> Outcome {
        match key.code {
            KeyCode::Tab => {
                self.pending.clear();
                self.focus = self.focus.next();
                return Outcome::None;
            }
            KeyCode::Enter => {
                self.pending.clear();
                return match self.submit() {
                    Ok(request) => {
                        self.error = None;
                        self.submitting = true;
                        Outcome::Submit(request)
                    }
                    Err(e) => {
                        self.error = Some(e.into());
                        Outcome::None
                    }
                };
            }
            KeyCode::Backspace => {
                self.pending.clear();
                return Outcome::Close;
            }
            _ => {}
        }

        let focus = self.focus;
        match self.pending.push(key, at, |keys| normal_binding(focus, keys)) {
            Match::Exact(command) => self.run(command),
            Match::Prefix | Match::NoMatch => Outcome::None,
        }
    }

    fn run(&mut self, command: Command) -> Outcome {
        match command {
            Command::Move(motion) => self.textarea.move_cursor(motion.into()),
            Command::Insert(at) => {
                match at {
                    InsertAt::Cursor => {}
                    InsertAt::After => {
                        if !self.cursor_at_line_end() {
                            self.textarea.move_cursor(CursorMove::Forward);
                        }
                    }
                    InsertAt::LineEnd => self.textarea.move_cursor(CursorMove::End),
                    InsertAt::LineBelow => {
                        self.textarea.move_cursor(CursorMove::End);
                        self.textarea.insert_newline();
                    }
                    InsertAt::LineAbove => {
                        self.textarea.move_cursor(CursorMove::Head);
                        self.textarea.insert_newline();
                        self.textarea.move_cursor(CursorMove::Up);
                    }
                }
                self.mode = EditMode::Insert;
            }
            Command::DeleteChar => {
                self.textarea.delete_next_char();
            }
            Command::DeleteLine => self.delete_current_line(),
            Command::Undo => {
                self.textarea.undo();
            }
            Command::Redo => {
                self.textarea.redo();
            }
            Command::SelectPrevious => self
                .embed_selection
                .update(SelectionMessage::PreviousItemSelected),
            Command::SelectNext => self.embed_selection.update(SelectionMessage::NextItemSelected {
                len: self.embeds.len(),
            }),
            Command::RemoveEmbed => {
                self.remove_selected_embed();
            }
            Command::PasteImage => return Outcome::Open(OpenKind::ClipboardImage),
            Command::PickFile => {
                self.mode = EditMode::EmbedPicker;
                return Outcome::Open(OpenKind::FilePicker);
            }
            Command::AddLink => {
                let result = match find_urls(&self.text()).into_iter().next() {
                    Some(uri) => self.add_embed(EmbedItem::LinkCard { uri }),
                    None => Err(ValidationError::NoLinkInText),
                };
                if let Err(e) = result {
                    self.error = Some(e.into());
                }
            }
            Command::EditLangs => {
                self.mode = EditMode::LangSelect;
                self.lang_query.clear();
                self.reset_lang_selection();
            }
            Command::RemoveLastLang => {
                self.langs.pop();
            }
        }
        Outcome::None
    }

    fn cursor_at_line_end(&self) -> bool {
        let (row, col) = self.textarea.cursor();
        self.textarea
            .lines()
            .get(row)
            .is_none_or(|line| col >= line.chars().count())
    }

    fn delete_current_line(&mut self) {
        let (row, _) = self.textarea.cursor();
        let last_row = self.textarea.lines().len().saturating_sub(1);

        if row < last_row {
            // Line plus its trailing newline
            self.textarea.move_cursor(CursorMove::Head);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::Down);
            self.textarea.move_cursor(CursorMove::Head);
        } else if row > 0 {
            // Last line: take the newline in front of it instead
            self.textarea.move_cursor(CursorMove::Up);
            self.textarea.move_cursor(CursorMove::End);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::Down);
            self.textarea.move_cursor(CursorMove::End);
        } else {
            self.textarea.move_cursor(CursorMove::Head);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::End);
        }
        self.textarea.cut();
        self.textarea.move_cursor(CursorMove::Head);
    }
}

/// Character of a key without modifiers other than shift
fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if (key.modifiers - KeyModifiers::SHIFT).is_empty() => Some(c),
        _ => None,
    }
}

fn normal_binding(focus: Focus, keys: &[KeyEvent]) -> Match<Command> {
    let chars: Option<Vec<char>> = keys.iter().map(plain_char).collect();
    let Some(chars) = chars else {
        return match keys {
            [key] if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::CONTROL => {
                if focus == Focus::Text {
                    Match::Exact(Command::Redo)
                } else {
                    Match::NoMatch
                }
            }
            [key] => arrow_binding(focus, key.code),
            _ => Match::NoMatch,
        };
    };

    let command = match (focus, chars.as_slice()) {
        (Focus::Text, ['h']) => Command::Move(Motion::Back),
        (Focus::Text, ['l']) => Command::Move(Motion::Forward),
        (Focus::Text, ['j']) => Command::Move(Motion::Down),
        (Focus::Text, ['k']) => Command::Move(Motion::Up),
        (Focus::Text, ['w']) => Command::Move(Motion::WordForward),
        (Focus::Text, ['b']) => Command::Move(Motion::WordBack),
        (Focus::Text, ['e']) => Command::Move(Motion::WordEnd),
        (Focus::Text, ['0']) => Command::Move(Motion::Head),
        (Focus::Text, ['$']) => Command::Move(Motion::End),
        (Focus::Text, ['G']) => Command::Move(Motion::Bottom),
        (Focus::Text, ['g', 'g']) => Command::Move(Motion::Top),
        (Focus::Text, ['i']) => Command::Insert(InsertAt::Cursor),
        (Focus::Text, ['a']) => Command::Insert(InsertAt::After),
        (Focus::Text, ['A']) => Command::Insert(InsertAt::LineEnd),
        (Focus::Text, ['o']) => Command::Insert(InsertAt::LineBelow),
        (Focus::Text, ['O']) => Command::Insert(InsertAt::LineAbove),
        (Focus::Text, ['x']) => Command::DeleteChar,
        (Focus::Text, ['u']) => Command::Undo,
        (Focus::Text, ['d', 'd']) => Command::DeleteLine,
        (Focus::Text, ['g' | 'd']) => return Match::Prefix,

        (Focus::Lang, ['i' | 'a']) => Command::EditLangs,
        (Focus::Lang, ['x']) => Command::RemoveLastLang,

        (Focus::Embed, ['k']) => Command::SelectPrevious,
        (Focus::Embed, ['j']) => Command::SelectNext,
        (Focus::Embed, ['d', 'd']) => Command::RemoveEmbed,
        (Focus::Embed, ['d']) => return Match::Prefix,
        (Focus::Embed, ['p']) => Command::PasteImage,
        (Focus::Embed, ['a']) => Command::PickFile,
        (Focus::Embed, ['l']) => Command::AddLink,

        _ => return Match::NoMatch,
    };
    Match::Exact(command)
}

fn arrow_binding(focus: Focus, code: KeyCode) -> Match<Command> {
    let command = match (focus, code) {
        (Focus::Text, KeyCode::Left) => Command::Move(Motion::Back),
        (Focus::Text, KeyCode::Right) => Command::Move(Motion::Forward),
        (Focus::Text, KeyCode::Up) => Command::Move(Motion::Up),
        (Focus::Text, KeyCode::Down) => Command::Move(Motion::Down),
        (Focus::Embed, KeyCode::Up) => Command::SelectPrevious,
        (Focus::Embed, KeyCode::Down) => Command::SelectNext,
        _ => return Match::NoMatch,
    };
    Match::Exact(command)
}
