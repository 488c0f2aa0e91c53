mod secret;
pub mod uri;

pub use secret::{Secret, Variable};
pub use uri::ConnectionUri;
