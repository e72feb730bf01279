use log::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::forms::{validate_username, UpdateProfile};
use crate::gateway::{classify_update_error, UpdateFailure};
use crate::query::{Mutation, MutationState, USER_INFO_KEY};

use super::avatar::{AvatarFile, AvatarPreview};
use super::panel::PanelContext;
use super::view::EditView;

/// Editable username/avatar form.  Owns the pending edit and the
/// save/rollback state machine.
pub struct EditForm {
  ctx: PanelContext,

  // last acknowledged values, restored on a failed update.
  current_username: String,
  current_avatar: String,

  username: RefCell<String>,
  username_error: Cell<Option<&'static str>>,
  avatar: RefCell<Option<AvatarFile>>,
  preview: AvatarPreview,
  mutation: Mutation,
}

impl EditForm {
  pub fn mount(ctx: PanelContext, current_username: &str, current_avatar: &str) -> Rc<Self> {
    let preview = AvatarPreview::mount(ctx.reader.clone(), ctx.spawner.clone(), current_avatar);
    Rc::new(Self {
      ctx,
      current_username: current_username.to_string(),
      current_avatar: current_avatar.to_string(),
      username: RefCell::new(String::new()),
      username_error: Cell::new(None),
      avatar: RefCell::new(None),
      preview,
      mutation: Mutation::new(),
    })
  }

  pub fn is_pending(&self) -> bool {
    self.mutation.is_pending()
  }

  pub fn mutation_state(&self) -> MutationState {
    self.mutation.state()
  }

  /// Username field input.
  pub fn set_username(&self, text: &str) {
    *self.username.borrow_mut() = text.to_string();
  }

  /// The not-yet-uploaded file waiting to be submitted.
  pub fn pending_avatar(&self) -> Option<AvatarFile> {
    self.avatar.borrow().clone()
  }

  /// File picker change event.  A cancelled picker selects nothing and
  /// changes nothing.
  pub fn select_avatar(&self, file: Option<AvatarFile>) {
    let file = match file {
      Some(file) => file,
      None => return,
    };
    self.preview.load(file.clone());
    *self.avatar.borrow_mut() = Some(file);
  }

  fn pending_change(&self) -> Result<UpdateProfile, &'static str> {
    let username = self.username.borrow().clone();
    let username = if username.is_empty() {
      None
    } else {
      validate_username(&username)?;
      Some(username)
    };
    Ok(UpdateProfile {
      username,
      avatar: self.avatar.borrow().clone(),
    })
  }

  /// Submit the pending edit.  At most one request is outstanding; extra
  /// submits while pending are ignored.
  pub async fn submit(&self) {
    if self.mutation.is_pending() {
      debug!("submit ignored, mutation pending");
      return;
    }

    let change = match self.pending_change() {
      Ok(change) => change,
      Err(message) => {
        self.username_error.set(Some(message));
        return;
      },
    };
    self.username_error.set(None);

    if change.is_empty() {
      // nothing changed: leave edit mode without a network call.
      debug!("no-op submit, leaving edit mode");
      self.ctx.ui.set_editing_user_info(false);
      return;
    }

    if !self.mutation.begin() {
      return;
    }
    match self.ctx.gateway.update_profile(change).await {
      Ok(profile) => {
        debug!("update ok: {}", profile.username);
        *self.avatar.borrow_mut() = None;
        self.username.borrow_mut().clear();
        self.ctx.ui.set_editing_user_info(false);
        self.ctx.queries.invalidate(USER_INFO_KEY);
        self.ctx.notifier.success("Update Successful");
        self.mutation.succeed();
      },
      Err(err) => {
        // the service keeps whatever half of the change it applied; put
        // the previous values back before surfacing the failure.
        if let Err(err) = self
          .ctx
          .gateway
          .restore_profile(&self.current_username, &self.current_avatar)
          .await
        {
          error!("restore after failed update also failed: {}", err);
        }
        let message = err.to_string();
        match classify_update_error(&err) {
          UpdateFailure::UsernameTaken => self.ctx.notifier.error("Username is Taken"),
          UpdateFailure::Other => self.ctx.notifier.error(&message),
        }
        self.mutation.fail(message);
      },
    }
  }

  pub fn render(&self) -> EditView {
    EditView {
      heading: "Edit Profile",
      username_label: "new username",
      username: self.username.borrow().clone(),
      username_error: self.username_error.get(),
      preview_src: self.preview.src(),
      submit_label: "Update",
      pending: self.mutation.is_pending(),
    }
  }
}
