//! Quillpad: the core of a small multi-tab plain-text editor.
//!
//! The interesting part is [`search::FindSession`], a find/replace engine
//! that works against any [`editor::DocumentHost`].  [`app::App`] wires it to
//! a [`ui::tabs::TabSet`] of in-memory documents and routes the
//! notifications that keep its match list honest.

#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod editor;
pub mod error;
pub mod logging;
pub mod search;
pub mod session;
pub mod ui;

pub use error::{QuillError, Result};
