use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  // fatal: the panel cannot start without a logged in user.
  #[error("session error: {0}")]
  Session(String),

  // raw message from the data service, surfaced to the user verbatim.
  #[error("{0}")]
  Gateway(String),

  // avatar file decode failure.
  #[error("decode error: {0}")]
  Decode(String),

  // Json error
  #[error("Json error: {source}")]
  JsonError {
    #[from]
    source: serde_json::Error,
  },

  #[error("std io error")]
  IOError {
    #[from]
    source: std::io::Error,
  },

  #[error("config error")]
  ConfigError {
    #[from]
    source: config::ConfigError,
  },

  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
