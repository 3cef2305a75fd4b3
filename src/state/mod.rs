//! State management module.
//!
//! Contains the Registry actor (sole owner of the nickname map) and the
//! cloneable handle connections use to reach it.

pub mod actor;
mod handle;

pub use actor::{ConnId, Outbox};
pub use handle::RegistryHandle;
