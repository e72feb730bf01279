use crate::models::Profile;
use crate::util;

/// The two navigation targets under the profile card.
pub const NAV_LINKS: [&str; 2] = ["Profile", "Explore"];

/// Read-only profile display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
  pub avatar: String,
  pub username: String,
  pub posts_label: String,
  pub joined_label: String,
  pub nav_links: [&'static str; 2],
}

impl ProfileView {
  pub fn new(profile: &Profile) -> Self {
    Self {
      avatar: profile.avatar.clone(),
      username: util::display_username(&profile.username),
      posts_label: util::posts_label(profile.num_posts),
      joined_label: util::joined_label(&profile.created_at),
      nav_links: NAV_LINKS,
    }
  }
}

/// Edit form display.
#[derive(Debug, Clone, PartialEq)]
pub struct EditView {
  pub heading: &'static str,
  pub username_label: &'static str,
  pub username: String,
  pub username_error: Option<&'static str>,
  pub preview_src: String,
  pub submit_label: &'static str,
  pub pending: bool,
}

/// What the panel shows.  Exactly one per render.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRender {
  Loading,
  View(ProfileView),
  Error { message: String },
  Edit(EditView),
}
