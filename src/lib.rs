//! Format feed descriptions as RSS 1.0, RSS 2.0 or Atom 1.0.
//!
//! See [`feed`] for the formatting engine and [`config`] for the optional
//! configuration file read by the command-line tool.

pub mod config;
pub mod feed;
