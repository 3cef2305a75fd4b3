//! Registry actor event handlers.
//!
//! Each submodule handles a category of [`RegistryEvent`](super::RegistryEvent)
//! messages processed by [`RegistryActor`](super::RegistryActor).

pub mod deregister;
pub mod message;
pub mod nick;
