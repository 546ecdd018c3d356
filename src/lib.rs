//! CommunityHub host-side bootstrap: configuration, logging and wiring of the
//! `ch-*` crates.

pub mod bootstrap;
