// src/lib.rs

//! Lesson schedule provider library.
//!
//! Keeps a locally cached snapshot of a school lesson schedule whose
//! authoritative source is a spreadsheet export, refreshed by a background
//! checker. The routing layer that exposes the read operations over the
//! network lives outside this crate and consumes [`provider::Provider`].

pub mod checker;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod models;
pub mod parser;
pub mod provider;
pub mod storage;
