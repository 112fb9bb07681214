#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    InfoPosted { label: String, message: String },
    ErrorPosted { label: String, message: String },
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

/// Last message shown at the bottom of the screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    notice: Option<Notice>,
}

impl StatusBar {
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn post(&mut self, level: Level, label: &str, message: &str) {
        let message = message.replace('\n', " ");
        let text = match level {
            Level::Info => format!("[{label}] {message}"),
            Level::Error => format!("[ERR: {label}] {message}"),
        };
        self.notice = Some(Notice { level, text });
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::InfoPosted { label, message } => self.post(Level::Info, &label, &message),
            Message::ErrorPosted { label, message } => self.post(Level::Error, &label, &message),
            Message::Cleared => self.notice = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_info_posted() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::InfoPosted {
            label: "Like".to_string(),
            message: "Liked @alice.bsky.social".to_string(),
        });
        assert_eq!(
            status_bar.notice(),
            Some(&Notice {
                level: Level::Info,
                text: "[Like] Liked @alice.bsky.social".to_string(),
            })
        );
    }

    #[test]
    fn test_error_posted_flattens_newlines() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::ErrorPosted {
            label: "Sync".to_string(),
            message: "connection reset\nretrying".to_string(),
        });
        assert_eq!(
            status_bar.notice().map(|notice| notice.text.as_str()),
            Some("[ERR: Sync] connection reset retrying")
        );
    }

    #[test]
    fn test_cleared() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::InfoPosted {
            label: "Info".to_string(),
            message: "hello".to_string(),
        });
        status_bar.update(Message::Cleared);
        assert_eq!(status_bar, StatusBar::default());
    }
}
