//! JSON shapes exchanged with the authentication API.

mod messages;

pub use messages::*;
