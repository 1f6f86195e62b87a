//! # Taskboard Client
//!
//! Rust client library for the Taskboard project-board API (a
//! Trello-style kanban backend).
//!
//! This library provides:
//! - A session layer with persistent tokens and transparent,
//!   single-flight access-token refresh on 401
//! - Typed endpoint groups for auth, projects, task lists, tasks and
//!   comments
//! - The board-side drag-to-move protocol as a pure state machine
//!
//! ## Request Flow
//!
//! ```text
//!        ┌──────────────────────────────────┐
//!        │         TaskboardClient          │
//!        │  (auth / projects / tasks APIs)  │
//!        └────────────────┬─────────────────┘
//!                         │ bearer token
//!                         ▼
//!                ┌─────────────────┐   401   ┌────────────────┐
//!                │    ApiClient    │────────►│ SessionManager │
//!                │   (transport)   │◄────────│ (one refresh)  │
//!                └─────────────────┘  retry  └────────────────┘
//! ```
//!
//! ## Board Flow
//! 1. Fetch a project's lists with [`api::TasksApi::task_lists`]
//! 2. Build a [`board::BoardView`] and feed drag events to a
//!    [`board::DragController`]
//! 3. Send the resolved move with [`api::TasksApi::move_task`]
//! 4. Refetch the affected lists; the server order is authoritative
//!
//! ## Modules
//! - `client`: transport and the top-level client handle
//! - `session`: token pair lifecycle and refresh coordination
//! - `api`: endpoint groups and wire types
//! - `board`: board snapshot and drop resolution

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

#[cfg(test)]
mod testutil;

pub use board::{BoardView, DragController, DragState, DropHint, DropTarget, TaskMoveRequest};
pub use client::{ApiClient, TaskboardClient};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use session::{SessionEvents, SessionManager, SessionTokens};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
