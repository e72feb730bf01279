use log::*;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::executor::LocalPool;

use chrono::NaiveDate;
use crossbeam_channel::Receiver;

use crate::error::*;
use crate::gateway::MemoryGateway;
use crate::models::Profile;
use crate::query::QueryClient;
use crate::session::{AuthToken, SessionStore, SessionUser, AUTH_TOKEN_KEY};
use crate::ui::{
  notifications, DiskReader, Notification, PanelContext, PanelRender, UiState, UserInfoPanel,
};

use crate::app::AppConfig;

/// Walk the panel through its full flow against the in-memory gateway:
/// load, view, edit, conflict + rollback, retry, success.
pub fn execute(config: AppConfig) -> Result<()> {
  let debug = config.get_bool("debug")?.unwrap_or(false);
  debug!("Debug = {:?}", debug);

  let user_id = config.get_str("demo.user_id")?.unwrap_or_else(|| "u1".to_string());

  // the auth layer normally persists this; seed one for the demo.
  let session_path = config
    .get_path("session.path")?
    .unwrap_or_else(|| PathBuf::from("demo-session.json"));
  if !session_path.exists() {
    seed_session(&session_path, &user_id)?;
  }
  let session = SessionStore::load(&session_path)?;

  let profile = Profile {
    id: user_id,
    username: config.get_str("demo.username")?.unwrap_or_else(|| "alice1".to_string()),
    avatar: config.get_str("demo.avatar")?.unwrap_or_else(|| "a.png".to_string()),
    num_posts: config.get_int("demo.num_posts")?.unwrap_or(3) as u64,
    created_at: NaiveDate::from_ymd(2023, 1, 1).and_hms(0, 0, 0),
  };
  let gateway = Rc::new(MemoryGateway::new(profile));
  let taken = config
    .get_str("demo.taken_username")?
    .unwrap_or_else(|| "bob_jones1".to_string());
  gateway.reserve_username(&taken);

  let mut pool = LocalPool::new();
  let (notifier, toasts) = notifications();
  let ctx = PanelContext {
    gateway: gateway.clone(),
    queries: QueryClient::new(),
    ui: UiState::new(),
    notifier,
    reader: Rc::new(DiskReader),
    spawner: Rc::new(pool.spawner()),
  };
  let panel = UserInfoPanel::new(ctx, &session)?;

  show("before activation", &panel.render());

  pool.run_until(panel.sync());
  show("after fetch", &panel.render());

  // open the edit form and try a username some other user holds.
  panel.toggle_edit();
  let form = panel.edit_form().expect("edit form mounted");
  form.set_username(&taken);
  pool.run_until(form.submit());
  drain_toasts(&toasts);
  show("after conflict", &panel.render());

  // correct the username and go again.
  let fresh = config
    .get_str("demo.new_username")?
    .unwrap_or_else(|| "alice_01".to_string());
  form.set_username(&fresh);
  pool.run_until(form.submit());
  drain_toasts(&toasts);

  // the cache was invalidated; the next read re-fetches.
  pool.run_until(panel.sync());
  show("after update", &panel.render());

  info!("posts refreshed {} times", gateway.posts_refreshed());
  Ok(())
}

fn show(stage: &str, render: &PanelRender) {
  println!("-- {} --", stage);
  match render {
    PanelRender::Loading => println!("loading placeholder"),
    PanelRender::View(view) => {
      println!("{}  {}", view.username, view.posts_label);
      println!("avatar: {}", view.avatar);
      println!("{} | {}", view.nav_links[0], view.nav_links[1]);
      println!("{}", view.joined_label);
    },
    PanelRender::Error { message } => println!("error: {} (retry available)", message),
    PanelRender::Edit(edit) => {
      println!("{} [{}]", edit.heading, if edit.pending { "pending" } else { "idle" });
      println!(
        "{}: {:?} {}",
        edit.username_label,
        edit.username,
        edit.username_error.unwrap_or(""),
      );
    },
  }
}

fn drain_toasts(toasts: &Receiver<Notification>) {
  while let Ok(note) = toasts.try_recv() {
    match note {
      Notification::Success(msg) => println!("toast(success): {}", msg),
      Notification::Error(msg) => println!("toast(error): {}", msg),
    }
  }
}

fn seed_session(path: &Path, user_id: &str) -> Result<()> {
  let token = AuthToken {
    access_token: "demo-token".to_string(),
    user: SessionUser {
      id: user_id.to_string(),
    },
  };
  let mut storage = serde_json::Map::new();
  storage.insert(AUTH_TOKEN_KEY.to_string(), serde_json::to_value(&token)?);
  std::fs::write(path, serde_json::to_string_pretty(&serde_json::Value::Object(storage))?)?;
  info!("seeded session storage at {}", path.display());
  Ok(())
}
