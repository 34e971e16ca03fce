//! Session context owned by the client shell.
//!
//! The scorer never reads this directly: the shell hands it an
//! [`ActiveSession`] per submission. Lifecycle is explicit: [`SessionContext::restore`]
//! at startup, [`SessionContext::clear`] on logout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api_client::{ApiError, ScoringApiClient};
use crate::models::user::{Profile, ProfileCreate, UserRegistration};

pub const PROFILE_UNAVAILABLE: &str = "Unable to fetch profile. Please sign in again.";

/// Persisted credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub token: String,
    pub email: String,
}

/// What the scorer needs to attempt a remote evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub token: String,
    pub profile_id: String,
}

/// JSON file holding the last signed-in session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing is stored. A file that does not parse is removed.
    pub fn load(&self) -> Result<Option<UserSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session file {}", self.path.display())
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Failed to restore session: {e}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &UserSession) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_string(session)?;
        fs::write(&self.path, body)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session file {}", self.path.display())
            }),
        }
    }
}

/// First profile of the account, creating the default one when there is none.
pub async fn bootstrap_profile(api: &ScoringApiClient, token: &str) -> Result<Profile, ApiError> {
    let profiles = api.list_profiles(token).await?;
    match profiles.into_iter().next() {
        Some(profile) => Ok(profile),
        None => {
            info!("No profile on account, creating default profile");
            api.create_profile(token, &ProfileCreate::default()).await
        }
    }
}

pub fn ready_message(profile: &Profile) -> String {
    format!(
        "Ready to score for {}.",
        profile
            .target_role
            .as_deref()
            .unwrap_or("your selected role")
    )
}

/// Signed-in state of the shell: credentials, the profile scored against,
/// and the last status line.
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    session: Option<UserSession>,
    profile: Option<Profile>,
    status: Option<String>,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            session: None,
            profile: None,
            status: None,
        }
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && self.profile.is_some()
    }

    /// Credentials for the scorer, present only with both a session and a profile.
    pub fn active(&self) -> Option<ActiveSession> {
        match (&self.session, &self.profile) {
            (Some(session), Some(profile)) => Some(ActiveSession {
                token: session.token.clone(),
                profile_id: profile.id.clone(),
            }),
            _ => None,
        }
    }

    /// Startup: reload the stored session and re-fetch its profile. A stale
    /// or rejected session is cleared rather than reported as an error. The
    /// session file is left untouched when the session is still good.
    pub async fn restore(&mut self, api: &ScoringApiClient) -> Result<()> {
        let Some(stored) = self.store.load()? else {
            return Ok(());
        };

        match bootstrap_profile(api, &stored.token).await {
            Ok(profile) => {
                info!(email = %stored.email, "Restored session");
                self.adopt(stored, profile);
            }
            Err(e) => {
                warn!("Stored session rejected: {e}");
                self.clear()?;
                self.status = Some(PROFILE_UNAVAILABLE.to_string());
            }
        }
        Ok(())
    }

    /// Restore for a scoring run. Any failure, including an unusable session
    /// file, leaves the shell signed out so scoring falls back to local.
    pub async fn restore_for_scoring(&mut self, api: &ScoringApiClient) -> Option<ActiveSession> {
        if let Err(e) = self.restore(api).await {
            warn!("Session restore failed, scoring locally: {e:#}");
            self.session = None;
            self.profile = None;
            return None;
        }
        self.active()
    }

    pub async fn sign_in(
        &mut self,
        api: &ScoringApiClient,
        email: &str,
        password: &str,
    ) -> Result<&Profile> {
        let token = api
            .login(email, password)
            .await
            .context("Unable to authenticate")?;
        let session = UserSession {
            token: token.access_token,
            email: email.to_string(),
        };
        let profile = bootstrap_profile(api, &session.token)
            .await
            .context("Unable to load profile")?;

        info!(%email, "Signed in");
        self.accept(session, profile)?;
        self.profile.as_ref().context("profile missing after sign-in")
    }

    pub async fn register(
        &mut self,
        api: &ScoringApiClient,
        registration: &UserRegistration,
    ) -> Result<&Profile> {
        api.register(registration)
            .await
            .context("Unable to register")?;
        self.sign_in(api, &registration.email, &registration.password)
            .await
    }

    /// Logout: forget everything, in memory and on disk.
    pub fn clear(&mut self) -> Result<()> {
        self.session = None;
        self.profile = None;
        self.status = None;
        self.store.clear()?;
        info!("Session cleared");
        Ok(())
    }

    fn accept(&mut self, session: UserSession, profile: Profile) -> Result<()> {
        self.store.save(&session)?;
        self.adopt(session, profile);
        Ok(())
    }

    fn adopt(&mut self, session: UserSession, profile: Profile) {
        self.status = Some(ready_message(&profile));
        self.session = Some(session);
        self.profile = Some(profile);
    }
}
