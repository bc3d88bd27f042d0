//! A Google session (access + refresh token) for one account.
//!
//! Stored per account at:
//!   ~/.config/classcal/providers/google/session/{account}.toml

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::app_config::{AppConfig, base_dir};

/// Refresh a little before Google's expiry so a request never races it.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

impl SessionData {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

fn slug(account_email: &str) -> String {
    account_email.replace(['/', '\\', ':'], "_")
}

impl Session {
    fn path_for_account_email(account_email: &str) -> Result<std::path::PathBuf> {
        Ok(base_dir()?
            .join("session")
            .join(format!("{}.toml", slug(account_email))))
    }

    pub fn new(account_email: &str, data: SessionData) -> Self {
        Session {
            account_email: account_email.to_string(),
            data,
        }
    }

    pub fn account_email(&self) -> &str {
        &self.account_email
    }

    pub fn client(&self) -> Result<Client> {
        let app_config = AppConfig::load()?;

        Ok(Client::new(
            app_config.client_id,
            app_config.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    /// Load a session and refresh it if expired.
    pub async fn load_valid(account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.data.is_expired(Utc::now()) {
            log::info!("Access token for {account_email} expired, refreshing");
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = Self::path_for_account_email(account_email)?;

        if !path.exists() {
            anyhow::bail!(
                "Google session for {} not found. Run `classcal auth` first.",
                account_email
            );
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google session from {}", path.display())
        })?;

        Ok(Session::new(account_email, data))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path_for_account_email(&self.account_email)?;
        write_session(&path, &self.data)
    }

    async fn refresh(&mut self) -> Result<()> {
        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}

/// Replace the session file in one rename, so a provider process that
/// reads it while another one refreshes never sees a partial file.
fn write_session(path: &Path, data: &SessionData) -> Result<()> {
    let contents = toml::to_string_pretty(data).context("Failed to serialize session")?;

    let parent = path
        .parent()
        .with_context(|| format!("Invalid session path {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create a temporary file in {}", parent.display()))?;

    // Owner-only (0600): the file holds OAuth tokens
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    file.write_all(contents.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .with_context(|| format!("Failed to write session to {}", path.display()))?;

    file.persist(path)
        .with_context(|| format!("Failed to write session to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(expires_at: DateTime<Utc>) -> SessionData {
        SessionData {
            access_token: "ya29.token".into(),
            refresh_token: "1//refresh".into(),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_uses_margin() {
        let now = Utc::now();
        assert!(data(now + Duration::seconds(30)).is_expired(now));
        assert!(data(now - Duration::seconds(1)).is_expired(now));
        assert!(!data(now + Duration::minutes(30)).is_expired(now));
    }

    #[test]
    fn test_account_slug_is_path_safe() {
        assert_eq!(slug("a/b\\c:d@example.com"), "a_b_c_d@example.com");
    }

    #[test]
    fn test_session_data_toml_round_trip() {
        let original = data(Utc::now());
        let text = toml::to_string_pretty(&original).unwrap();
        let parsed: SessionData = toml::from_str(&text).unwrap();
        assert_eq!(parsed.access_token, original.access_token);
        assert_eq!(parsed.expires_at, original.expires_at);
    }

    #[test]
    fn test_write_session_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session/sv@example.com.toml");

        write_session(&path, &data(Utc::now())).unwrap();
        let mut newer = data(Utc::now());
        newer.access_token = "ya29.newer".into();
        write_session(&path, &newer).unwrap();

        let parsed: SessionData = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.access_token, "ya29.newer");

        // Only the session itself is left behind
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
