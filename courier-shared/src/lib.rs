//! Models, configuration, and the thread reconciliation core shared by the
//! Courier clients.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions, clippy::must_use_candidate)]

pub mod config;
pub mod models;
pub mod threads;
