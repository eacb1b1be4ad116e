//! Terminal dashboard for Docker container metrics.
//!
//! `core` holds the polling pipeline (HTTP client, polling sessions, sample
//! window, view state and mounted views); `screens` and `widgets` draw it
//! with ratatui; `app` drives the interactive loop.

pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod utils;
pub mod widgets;
