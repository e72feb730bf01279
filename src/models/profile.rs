use chrono::NaiveDateTime;

use serde::{Deserialize, Serialize};

/// Fetched user record.  Immutable snapshot per render cycle: every change
/// goes through the gateway and a re-fetch, never through this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
  pub id: String,
  pub username: String,
  pub avatar: String,
  pub num_posts: u64,
  pub created_at: NaiveDateTime,
}
