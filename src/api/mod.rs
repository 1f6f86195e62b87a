//! Typed endpoint groups for the Taskboard API.
//!
//! ## Endpoints
//!
//! - `POST /api/auth/login/`, `register/`, `logout/` - Session lifecycle
//! - `GET/PATCH /api/auth/me/` - Profile
//! - `POST /api/auth/change-password/` - Password change
//! - `POST /api/auth/token/refresh/` - Access token refresh (handled by the transport)
//! - `/api/projects/` - Project CRUD, members, leave
//! - `/api/tasks/task-lists/` - Board columns, reorder, archive
//! - `/api/tasks/tasks/` - Tasks, move, toggle complete, bulk update
//! - `/api/tasks/task-comments/` - Comments
//!
//! All paths keep their trailing slashes; the backend redirects
//! without them and redirects drop the request body.

mod auth;
mod projects;
mod tasks;
pub mod types;

pub use auth::AuthApi;
pub use projects::ProjectsApi;
pub use tasks::{TaskFilters, TasksApi};
