use log::*;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::*;

/// Storage key the auth layer persists the session token under.
pub const AUTH_TOKEN_KEY: &str = "sb-jmfwsnwrjdahhxvtvqgq-auth-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionUser {
  pub id: String,
}

/// Persisted token structure.  Only the fields this panel needs.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
  pub access_token: String,
  pub user: SessionUser,
}

/// Client-side key/value storage persisted as one JSON file.
pub struct SessionStore {
  entries: HashMap<String, serde_json::Value>,
}

impl SessionStore {
  pub fn load(path: &Path) -> Result<SessionStore> {
    let raw = std::fs::read_to_string(path)
      .map_err(|err| Error::Session(format!("can't read {}: {}", path.display(), err)))?;
    Self::parse(&raw)
  }

  pub fn parse(raw: &str) -> Result<SessionStore> {
    let entries = serde_json::from_str(raw)
      .map_err(|err| Error::Session(format!("malformed storage: {}", err)))?;
    Ok(SessionStore { entries })
  }

  pub fn get_item(&self, key: &str) -> Option<&serde_json::Value> {
    self.entries.get(key)
  }

  /// Logged in user's id.  Absence or malformed content is fatal for the
  /// panel; there is no empty state to fall back to.
  pub fn current_user_id(&self) -> Result<String> {
    let value = self
      .get_item(AUTH_TOKEN_KEY)
      .ok_or_else(|| Error::Session(format!("missing {}", AUTH_TOKEN_KEY)))?;
    let token: AuthToken = serde_json::from_value(value.clone())
      .map_err(|err| Error::Session(format!("malformed auth token: {}", err)))?;
    debug!("session user: {}", token.user.id);
    Ok(token.user.id)
  }
}
