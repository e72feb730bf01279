mod state;
mod notify;
mod avatar;
mod view;
mod edit;
mod panel;

pub use self::{
  avatar::*,
  edit::*,
  notify::*,
  panel::*,
  state::*,
  view::*,
};
