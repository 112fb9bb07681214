use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::infrastructure::api::{Api, Credentials, Session};

pub const SESSION_FILE: &str = "session.json";

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
}

/// Session persisted as JSON in the data directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("reading {}", self.path.display()))
            }
        };
        let session = serde_json::from_str(&json)
            .wrap_err_with(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)
            .wrap_err_with(|| format!("writing {}", self.path.display()))
    }
}

/// Resume the stored session, falling back to a fresh login with `credentials`
///
/// The session in use is written back to `store` so tokens refreshed here survive a restart.
pub async fn sign_in(
    api: &dyn Api,
    store: &dyn SessionStore,
    credentials: Option<&Credentials>,
) -> Result<Session> {
    let stored = store.load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable session: {e:#}");
        None
    });

    let resumed = match stored {
        Some(session) => match api.resume_session(session).await {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("stored session rejected: {e}");
                None
            }
        },
        None => None,
    };

    let session = match (resumed, credentials) {
        (Some(session), _) => session,
        (None, Some(credentials)) => api
            .authenticate(credentials)
            .await
            .wrap_err_with(|| format!("signing in as {}", credentials.identifier))?,
        (None, None) => {
            return Err(eyre!(
                "no usable session: set `identifier` and `password` in the config file"
            ))
        }
    };
    log::info!("signed in as {}", session.handle);

    if let Err(e) = store.save(&session) {
        log::warn!("failed to save session: {e:#}");
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::env;

    use pretty_assertions::assert_eq;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;

    fn temp_store(name: &str) -> FileSessionStore {
        let dir = env::temp_dir().join(format!("skytui-session-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        FileSessionStore::in_dir(&dir)
    }

    #[test]
    fn test_missing_file_is_no_session() {
        let store = temp_store("missing");
        assert!(store.load().expect("no error").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store("roundtrip");
        let session = Session {
            did: "did:plc:alice".into(),
            handle: "alice.test".into(),
            access_jwt: SecretString::from("a"),
            refresh_jwt: SecretString::from("r"),
        };

        store.save(&session).expect("saved");
        let loaded = store.load().expect("readable").expect("present");

        assert_eq!(loaded.handle, "alice.test");
        assert_eq!(loaded.access_jwt.expose_secret(), "a");
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = temp_store("corrupt");
        if let Some(parent) = store.path().parent() {
            fs::create_dir_all(parent).expect("temp dir");
        }
        fs::write(store.path(), "{ not json").expect("written");

        assert!(store.load().is_err());
        let _ = fs::remove_file(store.path());
    }
}
