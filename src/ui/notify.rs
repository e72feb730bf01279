use crossbeam_channel::{unbounded, Receiver, Sender};

/// Transient user notification (the toast analog).
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
  Success(String),
  Error(String),
}

/// Sending half handed to the panel components; the embedder drains the
/// receiving half and renders the toasts however it likes.
#[derive(Clone)]
pub struct Notifier {
  tx: Sender<Notification>,
}

pub fn notifications() -> (Notifier, Receiver<Notification>) {
  let (tx, rx) = unbounded();
  (Notifier { tx }, rx)
}

impl Notifier {
  pub fn success(&self, message: &str) {
    let _ = self.tx.send(Notification::Success(message.to_string()));
  }

  pub fn error(&self, message: &str) {
    let _ = self.tx.send(Notification::Error(message.to_string()));
  }
}
