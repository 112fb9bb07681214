use std::path::{Path, PathBuf};

use config::ConfigError;
use secrecy::SecretString;
use serde::Deserialize;

use crate::{
    infrastructure::{api::Credentials, launcher::LauncherConfig},
    presentation::config::keybindings::KeyBindings,
    utils,
};

const CONFIG: &str = include_str!("../../.config/config.json5");

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
pub const DEFAULT_SYNC_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_NOTIFICATION_INTERVAL_MS: u64 = 10_000;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,
    #[serde(default = "default_notification_interval_ms")]
    pub notification_interval_ms: u64,
    #[serde(default)]
    pub launcher: LauncherConfig,
}

fn default_service() -> String {
    String::from(DEFAULT_SERVICE)
}

fn default_sync_interval_ms() -> u64 {
    DEFAULT_SYNC_INTERVAL_MS
}

fn default_notification_interval_ms() -> u64 {
    DEFAULT_NOTIFICATION_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            keybindings: KeyBindings::default(),
            service: default_service(),
            identifier: None,
            password: None,
            sync_interval_ms: default_sync_interval_ms(),
            notification_interval_ms: default_notification_interval_ms(),
            launcher: LauncherConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(&utils::get_config_dir(), &utils::get_data_dir())
    }

    /// Layer the user's config file (if any) in `config_dir` over the built-in defaults
    pub fn load(config_dir: &Path, data_dir: &Path) -> Result<Self, ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))?;
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!(
                "No configuration file found in {}, using defaults",
                config_dir.display()
            );
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // Merge default keybindings into user config (flat mapping)
        for (keyseq, action) in default_config.keybindings.iter() {
            cfg.keybindings
                .entry(keyseq.clone())
                .or_insert_with(|| *action);
        }

        if cfg.sync_interval_ms == 0 {
            return Err(ConfigError::Message(String::from(
                "sync_interval_ms must be positive",
            )));
        }
        if cfg.notification_interval_ms == 0 {
            return Err(ConfigError::Message(String::from(
                "notification_interval_ms must be positive",
            )));
        }

        Ok(cfg)
    }

    /// Identifier and app password, when both are configured
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            identifier: self.identifier.clone()?,
            password: self.password.clone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::core::action::Action;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("skytui-config-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    fn key(c: char) -> Vec<KeyEvent> {
        vec![KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)]
    }

    #[test]
    fn test_defaults_without_user_file() {
        let dir = temp_dir("defaults");

        let cfg = Config::load(&dir, &dir).expect("defaults load");

        assert_eq!(cfg.service, DEFAULT_SERVICE);
        assert_eq!(cfg.sync_interval_ms, DEFAULT_SYNC_INTERVAL_MS);
        assert_eq!(cfg.notification_interval_ms, DEFAULT_NOTIFICATION_INTERVAL_MS);
        assert_eq!(cfg.identifier, None);
        assert_eq!(cfg.config._config_dir, dir);
        assert_eq!(cfg.keybindings.get(&key('q')), Some(&Action::Quit));
        assert_eq!(cfg.keybindings.get(&key('j')), Some(&Action::ScrollDown));
        assert_eq!(cfg.launcher, LauncherConfig::default());
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = temp_dir("user");
        fs::write(
            dir.join("config.json5"),
            r#"{
                identifier: "alice.test",
                password: "hunter2",
                sync_interval_ms: 5000,
                launcher: { video: "vlc" },
                keybindings: { "<x>": "Quit", "<j>": "ScrollUp" },
            }"#,
        )
        .expect("written");

        let cfg = Config::load(&dir, &dir).expect("user config loads");

        assert_eq!(cfg.identifier.as_deref(), Some("alice.test"));
        assert_eq!(
            cfg.password.as_ref().map(|p| p.expose_secret().to_string()),
            Some(String::from("hunter2"))
        );
        assert_eq!(cfg.sync_interval_ms, 5000);
        assert_eq!(cfg.launcher.video, "vlc");
        assert_eq!(cfg.launcher.browser, "xdg-open");
        // user bindings win, defaults fill the rest
        assert_eq!(cfg.keybindings.get(&key('x')), Some(&Action::Quit));
        assert_eq!(cfg.keybindings.get(&key('j')), Some(&Action::ScrollUp));
        assert_eq!(cfg.keybindings.get(&key('q')), Some(&Action::Quit));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let dir = temp_dir("zero");
        fs::write(dir.join("config.json5"), "{ sync_interval_ms: 0 }").expect("written");

        assert!(Config::load(&dir, &dir).is_err());
    }

    #[test]
    fn test_zero_notification_interval_is_rejected() {
        let dir = temp_dir("zero-poll");
        fs::write(dir.join("config.json5"), "{ notification_interval_ms: 0 }").expect("written");

        assert!(Config::load(&dir, &dir).is_err());
    }
}
