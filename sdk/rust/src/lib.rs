//! Client library for the RSVP proxy.
//!
//! Mirrors what the invitation page does in the browser: trims and validates
//! input, posts JSON with a plain-text content type, and surfaces the
//! envelope's `error` string when something goes wrong.

pub mod client;
pub mod model;

pub use client::{ClientError, RsvpClient};
pub use model::{Envelope, NewRsvp, RsvpRecord};
