//! Demo user directory and persisted sessions.
//!
//! Authentication here is a stand-in: passwords are kept in plaintext and
//! compared verbatim. It exists so that the role-based history view has a
//! viewer role to work with, nothing more.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::analysis::AnalysisResult;
use crate::error::{CoreError, CoreResult};

/// Viewer role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// The logged-in user as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub role: Role,
}

/// Stored login credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    fn user(&self) -> SessionUser {
        SessionUser {
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// The set of known users.
///
/// Always seeded with one admin and one regular demo account. When opened
/// from a file, registrations are written back to it.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<Credential>,
    path: Option<PathBuf>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl UserDirectory {
    /// In-memory directory holding the two demo accounts.
    pub fn with_defaults() -> Self {
        Self {
            users: Self::seed(),
            path: None,
        }
    }

    fn seed() -> Vec<Credential> {
        vec![
            Credential::new("admin@example.com", "password", Role::Admin),
            Credential::new("user@example.com", "password", Role::User),
        ]
    }

    /// Open a file-backed directory.
    ///
    /// A missing file yields the seeded defaults. Seed accounts absent from
    /// the file are added back.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut users: Vec<Credential> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        for seed in Self::seed() {
            if !users.iter().any(|u| same_email(&u.email, &seed.email)) {
                users.push(seed);
            }
        }

        debug!(path = %path.display(), users = users.len(), "Opened user directory");
        Ok(Self {
            users,
            path: Some(path),
        })
    }

    /// Check credentials. Email comparison ignores case; the password must match exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<SessionUser> {
        let found = self
            .users
            .iter()
            .find(|u| same_email(&u.email, email) && u.password == password)
            .map(Credential::user);
        if found.is_none() {
            warn!(email = %email.trim(), "Login rejected");
        }
        found
    }

    /// Register a new regular user.
    pub fn register(&mut self, email: &str, password: &str) -> CoreResult<SessionUser> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::Validation(format!("Invalid email: {email}")));
        }
        if password.is_empty() {
            return Err(CoreError::Validation("Password cannot be empty.".to_string()));
        }
        if self.contains(email) {
            return Err(CoreError::UserExists(email.to_string()));
        }

        let credential = Credential::new(email, password, Role::User);
        let user = credential.user();
        self.users.push(credential);
        // An account that could not be saved must not stay usable.
        if let Err(e) = self.persist() {
            self.users.pop();
            return Err(e);
        }

        info!(email = %email, "Registered user");
        Ok(user)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.users.iter().any(|u| same_email(&u.email, email))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn persist(&self) -> CoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.users)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Session state remembered between CLI invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub wallet: Option<Address>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Analysis of the last submission, shown on the matching history record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_analysis: Option<LatestAnalysis>,
}

/// Analysis produced for a session's last submission, waiting to be shown
/// next to the newest history record from the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestAnalysis {
    /// Account the job was logged from.
    pub submitter: Address,
    pub analysis: AnalysisResult,
}

/// File-backed [`StoredSession`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.qchain/session.json`, or `./.qchain/session.json` without a home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".qchain")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session. A missing or unreadable file is an empty session.
    pub fn load(&self) -> StoredSession {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return StoredSession::default();
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                StoredSession::default()
            }
        }
    }

    /// Write the session, readable by the owner only on Unix.
    pub fn save(&self, session: &StoredSession) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    /// Remove the session file.
    pub fn clear(&self) -> CoreResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts() {
        let dir = UserDirectory::with_defaults();
        assert_eq!(dir.len(), 2);
        let admin = dir.authenticate("admin@example.com", "password").unwrap();
        assert_eq!(admin.role, Role::Admin);
        let user = dir.authenticate("USER@example.com", "password").unwrap();
        assert_eq!(user.role, Role::User);
        assert!(dir.authenticate("admin@example.com", "wrong").is_none());
        assert!(dir.authenticate("nobody@example.com", "password").is_none());
    }

    #[test]
    fn test_register() {
        let mut dir = UserDirectory::with_defaults();
        let user = dir.register("new@example.com", "secret").unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(dir.len(), 3);
        assert!(dir.authenticate("new@example.com", "secret").is_some());
    }

    #[test]
    fn test_register_duplicate() {
        let mut dir = UserDirectory::with_defaults();
        let err = dir.register("Admin@Example.com", "x").unwrap_err();
        assert!(matches!(err, CoreError::UserExists(_)));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_register_rejects_bad_input() {
        let mut dir = UserDirectory::with_defaults();
        assert!(dir.register("not-an-email", "x").is_err());
        assert!(dir.register("a@b.c", "").is_err());
    }

    #[test]
    fn test_directory_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("users.json");

        let mut dir = UserDirectory::open(&path).unwrap();
        dir.register("carol@example.com", "pw").unwrap();

        let reopened = UserDirectory::open(&path).unwrap();
        assert_eq!(reopened.len(), 3);
        assert!(reopened.authenticate("carol@example.com", "pw").is_some());
    }

    #[test]
    fn test_register_rolls_back_when_save_fails() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the directory should be makes every write fail.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut dir = UserDirectory::open(blocker.join("users.json")).unwrap();
        let before = dir.len();

        assert!(matches!(
            dir.register("new@example.com", "pw"),
            Err(CoreError::Io(_))
        ));
        assert_eq!(dir.len(), before);
        assert!(!dir.contains("new@example.com"));
        assert!(dir.authenticate("new@example.com", "pw").is_none());

        // A retry fails the same way instead of reporting a duplicate.
        assert!(matches!(
            dir.register("new@example.com", "pw"),
            Err(CoreError::Io(_))
        ));
    }

    #[test]
    fn test_credential_debug_redacts_password() {
        let c = Credential::new("a@b.c", "hunter2", Role::User);
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_session_store_roundtrip_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("nested").join("session.json"));
        assert_eq!(store.load(), StoredSession::default());

        let session = StoredSession {
            user: Some(SessionUser {
                email: "user@example.com".into(),
                role: Role::User,
            }),
            wallet: Some(Address::parse("0x00000000000000000000000000000000000000aa").unwrap()),
            chain_id: Some(9000),
            latest_analysis: None,
        };
        store.save(&session).unwrap();
        assert_eq!(store.load(), session);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load(), StoredSession::default());
    }

    #[test]
    fn test_session_store_ignores_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SessionStore::new(path).load(), StoredSession::default());
    }
}
