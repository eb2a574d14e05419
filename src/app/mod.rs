// SPDX-License-Identifier: GPL-3.0-only

//! Session and navigation state machine
//!
//! # Architecture
//!
//! - `state`: Navigation types (`Mode`, `Command`, `Effect`, `NavigationState`)
//! - `update`: Command dispatcher
//! - `handlers`: Per-domain transition handlers
//! - `session`: Owner of all session state; runs effects against the
//!   capture surface, the photo log and the exporter
//!
//! # Main Types
//!
//! - `Session`: The single logical owner of mutable state
//! - `NavigationState`: Mode plus cursors, updated by a pure transition
//! - `Prompter`: Confirmation/alert collaborator supplied by the front end

mod handlers;
pub mod session;
pub mod state;
mod update;

pub use session::{DELETE_ALL_PROMPT, ExportKind, ExportReport, Outcome, Prompter, Session};
pub use state::{Command, Effect, FilterState, MenuItem, Mode, NavigationState, Warning};
