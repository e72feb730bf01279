mod profile;
pub use self::profile::*;
