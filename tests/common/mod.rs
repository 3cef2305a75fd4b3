//! Integration test common infrastructure.
//!
//! Provides utilities for spawning relay servers and line-based test
//! clients that assert on the replies they receive.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
