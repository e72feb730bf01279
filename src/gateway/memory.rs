use log::*;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use futures::future::LocalBoxFuture;

use crate::error::*;
use crate::forms::UpdateProfile;
use crate::models::Profile;

use super::ProfileGateway;

/// In-memory stand-in for the remote data service.  Behaves like the real
/// one where the panel can tell: usernames are unique across users and a
/// conflict is reported with the backing database's duplicate-key text.
pub struct MemoryGateway {
  profile: RefCell<Profile>,
  taken_usernames: RefCell<HashSet<String>>,
  posts_refreshed: Cell<u64>,
}

impl MemoryGateway {
  pub fn new(profile: Profile) -> Self {
    Self {
      profile: RefCell::new(profile),
      taken_usernames: RefCell::new(HashSet::new()),
      posts_refreshed: Cell::new(0),
    }
  }

  /// Mark a username as belonging to some other user.
  pub fn reserve_username(&self, username: &str) {
    self.taken_usernames.borrow_mut().insert(username.to_string());
  }

  pub fn posts_refreshed(&self) -> u64 {
    self.posts_refreshed.get()
  }

  fn apply(&self, change: UpdateProfile) -> Result<Profile> {
    if let Some(ref username) = change.username {
      if self.taken_usernames.borrow().contains(username) {
        return Err(Error::Gateway(
          r#"duplicate key value violates unique constraint "users_username_key""#.to_string(),
        ));
      }
      self.profile.borrow_mut().username = username.clone();
    }
    if let Some(ref file) = change.avatar {
      // "upload": the stored avatar points into the bucket.
      self.profile.borrow_mut().avatar = format!("avatars/{}", file.name);
    }
    Ok(self.profile.borrow().clone())
  }
}

impl ProfileGateway for MemoryGateway {
  fn fetch_profile(&self, id: &str) -> LocalBoxFuture<'_, Result<Profile>> {
    let id = id.to_string();
    Box::pin(async move {
      let profile = self.profile.borrow();
      if profile.id != id {
        return Err(Error::Gateway(format!("no profile for user {}", id)));
      }
      Ok(profile.clone())
    })
  }

  fn update_profile(&self, change: UpdateProfile) -> LocalBoxFuture<'_, Result<Profile>> {
    Box::pin(async move {
      debug!("update profile: {:?}", change);
      self.apply(change)
    })
  }

  fn restore_profile(&self, username: &str, avatar: &str) -> LocalBoxFuture<'_, Result<()>> {
    let username = username.to_string();
    let avatar = avatar.to_string();
    Box::pin(async move {
      debug!("restore profile: {} {}", username, avatar);
      let mut profile = self.profile.borrow_mut();
      profile.username = username;
      profile.avatar = avatar;
      Ok(())
    })
  }

  fn fetch_posts(&self) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(async move {
      self.posts_refreshed.set(self.posts_refreshed.get() + 1);
      Ok(())
    })
  }
}
