use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared UI flags as an explicit context handle.  The panel reads and
/// toggles these but does not own their lifecycle; other parts of the
/// application hold clones of the same handle.
#[derive(Clone, Default)]
pub struct UiState {
  inner: Rc<UiFlags>,
}

#[derive(Default)]
struct UiFlags {
  editing_user_info: Cell<bool>,
  image_modal: RefCell<Option<String>>,
}

impl UiState {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn is_editing_user_info(&self) -> bool {
    self.inner.editing_user_info.get()
  }

  pub fn toggle_edit_user_info(&self) {
    let flag = &self.inner.editing_user_info;
    flag.set(!flag.get());
  }

  pub fn set_editing_user_info(&self, editing: bool) {
    self.inner.editing_user_info.set(editing);
  }

  pub fn is_image_modal(&self) -> bool {
    self.inner.image_modal.borrow().is_some()
  }

  /// Image the modal is showing, when open.
  pub fn image_modal(&self) -> Option<String> {
    self.inner.image_modal.borrow().clone()
  }

  /// Open the modal on an image, or close it when already open.
  pub fn toggle_image_modal(&self, image: &str) {
    let mut modal = self.inner.image_modal.borrow_mut();
    if modal.is_some() {
      *modal = None;
    } else {
      *modal = Some(image.to_string());
    }
  }
}
