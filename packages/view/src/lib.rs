#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation models derived from a [`scenebay_session::SearchSession`].
//!
//! Everything here is a pure function of session state (and the theme for
//! map layers). The HTTP server serializes these views for the frontend;
//! the CLI renders them as text through [`text`].

pub mod details;
pub mod map;
pub mod results;
pub mod text;

pub use details::{AvailabilityTier, DetailsView, details_view};
pub use map::{MapLayers, map_layers};
pub use results::{ResultsView, results_view};

/// Percent-encodes `s` for use as a single URL query component.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ! ~ * ' ( )`) pass through;
/// every other byte of the UTF-8 encoding becomes `%XX`.
#[must_use]
pub fn encode_component(s: &str) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
