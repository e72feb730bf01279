use crate::ui::AvatarFile;

pub const USERNAME_MIN_LENGTH: usize = 6;
pub const USERNAME_MAX_LENGTH: usize = 12;

/// One combined change request.  Fields may be independently absent;
/// absent means "no change requested".
#[derive(Debug, Default, Clone)]
pub struct UpdateProfile {
  pub username: Option<String>,
  pub avatar: Option<AvatarFile>,
}

impl UpdateProfile {
  pub fn is_empty(&self) -> bool {
    self.username.is_none() && self.avatar.is_none()
  }
}

/// Field rules for a new username.  Empty input means "no change requested"
/// and is skipped by the caller before it gets here.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
  let len = username.chars().count();
  if len < USERNAME_MIN_LENGTH {
    return Err("at least 6 characters");
  }
  if len > USERNAME_MAX_LENGTH {
    return Err("6-12 characters only");
  }
  if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err("alphanumeric only");
  }
  Ok(())
}
