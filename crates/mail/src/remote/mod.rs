//! Remote mail service abstraction
//!
//! The transfer engine talks to the mail service only through
//! [`RemoteMailClient`]. [`InMemoryMailClient`] is a scripted implementation;
//! the Microsoft Graph implementation lives in [`crate::graph`].

mod memory;
mod traits;

pub use memory::InMemoryMailClient;
pub use traits::{BindError, MoveOutcome, RemoteMailClient};
