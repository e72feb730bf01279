use chrono::NaiveDateTime;

// profile display helpers.

/// Username the way the view shows it: stray quotes stripped, "@" prefixed.
pub fn display_username(username: &str) -> String {
  format!("@{}", username.replace('"', ""))
}

pub fn posts_label(num_posts: u64) -> String {
  if num_posts == 1 {
    format!("{} Post", num_posts)
  } else {
    format!("{} Posts", num_posts)
  }
}

/// "Joined Jan 1, 2023" (medium date style).
pub fn joined_label(created_at: &NaiveDateTime) -> String {
  format!("Joined {}", created_at.format("%b %-d, %Y"))
}
