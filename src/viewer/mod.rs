//! Viewer side of the protocol: a local mirror of the canvas and a client
//! that keeps it in sync with a hub.

pub mod client;
pub mod mirror;

pub use client::ViewerClient;
pub use mirror::{Mirror, Redraw};
