use futures::future::LocalBoxFuture;

use crate::error::*;
use crate::forms::UpdateProfile;
use crate::models::Profile;

mod memory;
pub use self::memory::*;

/// Narrow contracts over the remote data service.
pub trait ProfileGateway {
  /// Fetch the profile for a user id.
  fn fetch_profile(&self, id: &str) -> LocalBoxFuture<'_, Result<Profile>>;

  /// Apply one combined change request.  May reject.
  fn update_profile(&self, change: UpdateProfile) -> LocalBoxFuture<'_, Result<Profile>>;

  /// Compensating rollback write.  The service does not roll anything back
  /// on its own; the caller must restore the previous values explicitly.
  fn restore_profile(&self, username: &str, avatar: &str) -> LocalBoxFuture<'_, Result<()>>;

  /// Refresh the sibling posts collection.
  fn fetch_posts(&self) -> LocalBoxFuture<'_, Result<()>>;
}

/// How an update failure should be presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateFailure {
  UsernameTaken,
  Other,
}

/// Check a gateway message for the username uniqueness violation.  The
/// service reports it with the backing database's duplicate-key text.
pub fn username_exists(message: &str) -> bool {
  message.contains("duplicate key value violates unique constraint")
    && message.contains("username")
}

pub fn classify_update_error(err: &Error) -> UpdateFailure {
  if username_exists(&err.to_string()) {
    UpdateFailure::UsernameTaken
  } else {
    UpdateFailure::Other
  }
}
