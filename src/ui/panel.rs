use log::*;

use std::cell::RefCell;
use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::error::*;
use crate::gateway::ProfileGateway;
use crate::models::Profile;
use crate::query::{Query, QueryClient, QueryStatus, USER_INFO_KEY};
use crate::session::SessionStore;

use super::avatar::FileReader;
use super::edit::EditForm;
use super::notify::Notifier;
use super::state::UiState;
use super::view::{PanelRender, ProfileView};

/// Collaborators shared by the panel and its edit form.
#[derive(Clone)]
pub struct PanelContext {
  pub gateway: Rc<dyn ProfileGateway>,
  pub queries: QueryClient,
  pub ui: UiState,
  pub notifier: Notifier,
  pub reader: Rc<dyn FileReader>,
  pub spawner: Rc<dyn LocalSpawn>,
}

/// Top-level profile component.  Fetches the profile once on activation
/// and renders exactly one of loading, view, error, edit.
pub struct UserInfoPanel {
  ctx: PanelContext,
  user_id: String,
  query: Rc<Query<Profile>>,
  edit: RefCell<Option<Rc<EditForm>>>,
}

impl UserInfoPanel {
  /// Reads the session at construction; a missing or malformed session
  /// token is fatal and propagates to the caller.
  pub fn new(ctx: PanelContext, session: &SessionStore) -> Result<Self> {
    let user_id = session.current_user_id()?;

    let gateway = ctx.gateway.clone();
    let id = user_id.clone();
    let query = Query::new(
      USER_INFO_KEY,
      Box::new(move || {
        let gateway = gateway.clone();
        let id = id.clone();
        Box::pin(async move { gateway.fetch_profile(&id).await })
      }),
    );
    ctx.queries.register(query.clone());

    Ok(Self {
      ctx,
      user_id,
      query,
      edit: RefCell::new(None),
    })
  }

  pub fn user_id(&self) -> &str {
    &self.user_id
  }

  /// Fetch the profile when it is stale: once on mount, and again after
  /// every invalidation.  Fresh data makes this a no-op.
  pub async fn sync(&self) {
    self.query.ensure().await;
  }

  /// Combined refresh offered by the error view: the profile and the
  /// sibling posts collection.
  pub async fn refetch_both(&self) {
    self.query.refetch().await;
    if let Err(err) = self.ctx.gateway.fetch_posts().await {
      // fire and forget; a posts failure never blocks the profile.
      info!("posts refresh failed: {}", err);
    }
  }

  /// Avatar click on the read-only view.
  pub fn show_full_image(&self) {
    if let Some(profile) = self.query.data() {
      self.ctx.ui.toggle_image_modal(&profile.avatar);
    }
  }

  pub fn toggle_edit(&self) {
    self.ctx.ui.toggle_edit_user_info();
  }

  /// The mounted edit form, while edit mode is on and data is ready.
  pub fn edit_form(&self) -> Option<Rc<EditForm>> {
    self.reconcile_edit();
    self.edit.borrow().clone()
  }

  /// Keep the mounted form in step with the externally owned edit flag:
  /// mount with a snapshot of the fetched profile when edit mode opens,
  /// drop when it closes.
  fn reconcile_edit(&self) {
    let editing =
      self.ctx.ui.is_editing_user_info() && self.query.status() == QueryStatus::Success;
    let mounted = self.edit.borrow().is_some();
    if editing && !mounted {
      let profile = match self.query.data() {
        Some(profile) => profile,
        None => return,
      };
      debug!("mount edit form for {}", profile.username);
      let form = EditForm::mount(self.ctx.clone(), &profile.username, &profile.avatar);
      *self.edit.borrow_mut() = Some(form);
    } else if !editing && mounted {
      debug!("unmount edit form");
      *self.edit.borrow_mut() = None;
    }
  }

  pub fn render(&self) -> PanelRender {
    self.reconcile_edit();
    match self.query.status() {
      QueryStatus::Pending => PanelRender::Loading,
      QueryStatus::Error => PanelRender::Error {
        message: self.query.error().unwrap_or_default(),
      },
      QueryStatus::Success => {
        if let Some(form) = &*self.edit.borrow() {
          return PanelRender::Edit(form.render());
        }
        match self.query.data() {
          Some(profile) => PanelRender::View(ProfileView::new(&profile)),
          None => PanelRender::Loading,
        }
      },
    }
  }
}
