//! Replay a recorded vehicle trip as a marker moving along its route.
//!
//! - [`input`] reads raw trip events from a source.
//! - [`trip`] filters them down to the position fixes that form the route.
//! - [`playback`] steps through the route on a fixed timer.
//! - [`render`] is the boundary to whatever draws the map.
//! - [`bootstrap`] wires the pieces together for one trip.

pub mod bootstrap;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod playback;
pub mod render;
pub mod trip;
