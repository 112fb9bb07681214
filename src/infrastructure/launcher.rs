//! External programs that open media and pick files
//!
//! Each [`OpenKind`] maps to a configurable command line. Viewers get the URL appended and are
//! left running; the file picker and clipboard reader are awaited and their output is read back.

use std::{
    io,
    path::Path,
    process::{Output, Stdio},
};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::{fs, process::Command};

use crate::domain::embed::{ImageAttachment, OpenKind};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no command configured for {0}")]
    NotConfigured(OpenKind),
    #[error("cannot parse `{command}`: {source}")]
    Parse {
        command: String,
        source: shell_words::ParseError,
    },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: io::Error,
    },
}

#[async_trait]
pub trait Launcher: Send + Sync {
    /// Open `payload` with the program configured for `kind`
    ///
    /// Returns image data for `FilePicker` and `ClipboardImage`, `None` otherwise or when the
    /// user picked nothing.
    async fn open(
        &self,
        kind: OpenKind,
        payload: &str,
    ) -> Result<Option<ImageAttachment>, LaunchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_video")]
    pub video: String,
    #[serde(default = "default_browser")]
    pub browser: String,
    #[serde(default = "default_file_picker")]
    pub file_picker: String,
    #[serde(default = "default_clipboard")]
    pub clipboard: String,
}

fn default_image() -> String {
    String::from("xdg-open")
}

fn default_video() -> String {
    String::from("mpv")
}

fn default_browser() -> String {
    String::from("xdg-open")
}

fn default_file_picker() -> String {
    String::from(r#"zenity --file-selection "--file-filter=*.png *.jpg *.jpeg *.gif *.webp""#)
}

fn default_clipboard() -> String {
    String::from("wl-paste --type image/png")
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            video: default_video(),
            browser: default_browser(),
            file_picker: default_file_picker(),
            clipboard: default_clipboard(),
        }
    }
}

impl LauncherConfig {
    pub fn command_for(&self, kind: OpenKind) -> &str {
        match kind {
            OpenKind::Image => &self.image,
            OpenKind::Video => &self.video,
            OpenKind::Link => &self.browser,
            OpenKind::FilePicker => &self.file_picker,
            OpenKind::ClipboardImage => &self.clipboard,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandLauncher {
    config: LauncherConfig,
}

impl CommandLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    fn command(&self, kind: OpenKind) -> Result<(String, Command), LaunchError> {
        let line = self.config.command_for(kind);
        let mut words = shell_words::split(line)
            .map_err(|source| LaunchError::Parse {
                command: line.to_string(),
                source,
            })?
            .into_iter();
        let program = words.next().ok_or(LaunchError::NotConfigured(kind))?;
        let mut command = Command::new(&program);
        command.args(words).stdin(Stdio::null()).stderr(Stdio::null());
        Ok((line.to_string(), command))
    }

    async fn capture(&self, kind: OpenKind) -> Result<(String, Output), LaunchError> {
        let (line, mut command) = self.command(kind)?;
        let output = command
            .stdout(Stdio::piped())
            .output()
            .await
            .map_err(|source| LaunchError::Spawn {
                command: line.clone(),
                source,
            })?;
        Ok((line, output))
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    async fn open(
        &self,
        kind: OpenKind,
        payload: &str,
    ) -> Result<Option<ImageAttachment>, LaunchError> {
        match kind {
            OpenKind::Image | OpenKind::Video | OpenKind::Link => {
                let (line, mut command) = self.command(kind)?;
                command
                    .arg(payload)
                    .stdout(Stdio::null())
                    .spawn()
                    .map_err(|source| LaunchError::Spawn {
                        command: line,
                        source,
                    })?;
                Ok(None)
            }
            OpenKind::FilePicker => {
                let (line, output) = self.capture(kind).await?;
                // Pickers exit non-zero when the dialog is cancelled
                if !output.status.success() {
                    log::debug!("`{line}` exited with {}", output.status);
                    return Ok(None);
                }
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if path.is_empty() {
                    return Ok(None);
                }
                let data = fs::read(&path).await.map_err(|source| LaunchError::Read {
                    path: path.clone(),
                    source,
                })?;
                let name = Path::new(&path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or(path);
                Ok(Some(ImageAttachment::new(name, data)))
            }
            OpenKind::ClipboardImage => {
                let (line, output) = self.capture(kind).await?;
                if !output.status.success() {
                    return Err(LaunchError::Failed {
                        command: line,
                        status: output.status.to_string(),
                    });
                }
                if output.stdout.is_empty() {
                    return Ok(None);
                }
                Ok(Some(ImageAttachment::new("clipboard.png", output.stdout)))
            }
        }
    }
}
