//! Login session and dashboard access gate
//!
//! Credentials are never checked locally: an [`IdentityProvider`] (the
//! forecast backend by default) decides. What is persisted is only the
//! role flag used to gate the dashboard.

use crate::api::BackendClient;
use crate::{Result, SkyviewError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Username/password pair sent to the identity provider
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    /// Interpret a role flag; unknown flags get the least privilege
    #[must_use]
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Viewer,
        }
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Coarse gate in front of the dashboard; not a security boundary
    #[must_use]
    pub fn can_view_dashboard(&self) -> bool {
        self.role == Role::Admin
    }

    /// Single-letter avatar shown next to the user name
    #[must_use]
    pub fn avatar(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

/// Something that can turn credentials into a session
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;
}

#[async_trait]
impl IdentityProvider for BackendClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        self.login(credentials).await
    }
}

/// File-backed store for the persisted session flag
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user config directory (`.../skyview/role.json`)
    pub fn in_config_dir() -> Result<Self> {
        crate::config::SkyviewConfig::config_dir()
            .map(|dir| Self::new(dir.join("role.json")))
            .ok_or_else(|| SkyviewError::config("Unable to determine config directory"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session; a missing or unreadable file means logged out
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&text) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(session)
            .map_err(|e| SkyviewError::general(format!("Failed to encode session: {e}")))?;
        std::fs::write(&self.path, text)?;
        info!("Session saved for '{}'", session.username);
        Ok(())
    }

    /// Logout: forget the stored session
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Authenticate and persist the resulting session
pub async fn login(
    provider: &dyn IdentityProvider,
    store: &SessionStore,
    credentials: &Credentials,
) -> Result<Session> {
    if credentials.username.trim().is_empty() {
        return Err(SkyviewError::validation("Username cannot be empty"));
    }
    let session = provider.authenticate(credentials).await?;
    store.save(&session)?;
    Ok(session)
}

/// Session from the store, if it is allowed to open the dashboard
pub fn require_dashboard_access(store: &SessionStore) -> Result<Session> {
    match store.load() {
        Some(session) if session.can_view_dashboard() => Ok(session),
        Some(_) => Err(SkyviewError::auth("This account cannot open the dashboard")),
        None => Err(SkyviewError::auth("Not logged in. Run `skyview login` first")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProvider(Option<Role>);

    #[async_trait]
    impl IdentityProvider for StaticProvider {
        async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
            match self.0 {
                Some(role) => Ok(Session {
                    username: credentials.username.clone(),
                    role,
                }),
                None => Err(SkyviewError::auth("invalid credentials")),
            }
        }
    }

    fn credentials(username: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_role_from_flag() {
        assert_eq!(Role::from_flag("admin"), Role::Admin);
        assert_eq!(Role::from_flag(" ADMIN "), Role::Admin);
        assert_eq!(Role::from_flag("guest"), Role::Viewer);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", credentials("ana"));
        assert!(debug.contains("ana"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_avatar() {
        let session = Session {
            username: "maria".to_string(),
            role: Role::Admin,
        };
        assert_eq!(session.avatar(), "M");
    }

    #[tokio::test]
    async fn test_login_persists_and_gates() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("role.json"));

        assert!(require_dashboard_access(&store).is_err());

        let session = login(&StaticProvider(Some(Role::Admin)), &store, &credentials("ana"))
            .await
            .unwrap();
        assert!(session.can_view_dashboard());
        assert_eq!(require_dashboard_access(&store).unwrap().username, "ana");

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[tokio::test]
    async fn test_viewer_is_gated() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("role.json"));
        login(&StaticProvider(Some(Role::Viewer)), &store, &credentials("bo"))
            .await
            .unwrap();
        let err = require_dashboard_access(&store).unwrap_err();
        assert!(matches!(err, SkyviewError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("role.json"));
        let err = login(&StaticProvider(None), &store, &credentials("ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkyviewError::Auth { .. }));
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_empty_username_rejected_before_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("role.json"));
        let err = login(&StaticProvider(Some(Role::Admin)), &store, &credentials("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, SkyviewError::Validation { .. }));
    }

    #[test]
    fn test_corrupt_session_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("role.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::new(path).load().is_none());
    }
}
