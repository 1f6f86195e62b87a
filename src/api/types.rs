//! Wire types for the Taskboard API.
//!
//! Field names and shapes follow the backend serializers exactly.
//! Response-side fields the server may omit or null carry
//! `#[serde(default)]`, request-side optional fields are skipped when
//! unset so PATCH bodies only mention what actually changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==================== Auth ====================

/// Account as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Full display name assembled by the server.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Compact assignee entry as embedded in task detail responses. `name`
/// is the first name when set, otherwise the email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// Envelope returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoutRequest {
    pub refresh: String,
}

// ==================== Pagination ====================

/// Standard paginated envelope. `next` and `previous` are absolute
/// URLs usable with the raw transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

// ==================== Projects ====================

/// Role granted to a project member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Viewer,
    Editor,
    Admin,
}

/// The requesting user's relationship to a project. Owners are not
/// members, so this is wider than [`MemberRole`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Admin,
    Editor,
    Viewer,
}

/// Membership row with the member's user fields flattened in, the way
/// the backend serializes them. `id` is the membership id, not the
/// user's; the user is `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: MemberRole,
    #[serde(default)]
    pub invited_by_email: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Project as serialized by the backend. The owner appears only as
/// `owner_email`; listing responses omit `members`, `background_image`
/// and `user_role`, so those default when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_email: String,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub members_count: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub user_role: Option<ProjectRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl ProjectCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_private: None,
        }
    }
}

/// Echo returned by project creation. The backend answers create with
/// the create serializer's own fields, not the detail shape; fetch the
/// project by `id` for the full resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectCreated {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub owner_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddMemberRequest {
    pub email: String,
    pub role: MemberRole,
}

// ==================== Task lists ====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskList {
    pub id: Uuid,
    pub name: String,
    pub project: Uuid,
    #[serde(default)]
    pub project_name: String,
    /// Column order within the board, starting at 0. Ties are broken
    /// by creation time on the server.
    pub position: u32,
    #[serde(default)]
    pub is_archived: bool,
    /// Present when lists are fetched with their tasks embedded.
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub tasks_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskListCreate {
    pub name: String,
    pub project: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl TaskListCreate {
    pub fn new(name: impl Into<String>, project: Uuid) -> Self {
        Self {
            name: name.into(),
            project,
            position: None,
        }
    }
}

///// Echo returned by task-list creation: the submitted fields plus the
/// position the server assigned. The new list's id is not echoed, so
/// the board has to be refetched to pick it up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskListCreated {
    pub name: String,
    pub project: Uuid,
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskListUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Body of the list reorder action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderRequest {
    pub new_position: u32,
}

// ==================== Tasks ====================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Wire name, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task as serialized by the backend. Related users come through as
/// primary keys (`creator`, `assignees`) with read-only convenience
/// fields alongside; `comments` and `assignees_details` are embedded
/// on detail, move and bulk-update responses only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub task_list: Uuid,
    #[serde(default)]
    pub task_list_name: String,
    #[serde(default)]
    pub project_name: String,
    /// Order within the list, starting at 0. Ties are broken by
    /// creation time on the server.
    pub position: u32,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub label_color: Option<String>,
    #[serde(default)]
    pub assignees: Vec<Uuid>,
    #[serde(default)]
    pub assignees_count: u32,
    #[serde(default)]
    pub assignees_details: Vec<UserSummary>,
    #[serde(default)]
    pub creator: Option<Uuid>,
    #[serde(default)]
    pub creator_email: Option<String>,
    #[serde(default)]
    pub comments: Option<Vec<TaskComment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCreate {
    pub title: String,
    pub task_list: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Uuid>>,
}

impl TaskCreate {
    pub fn new(title: impl Into<String>, task_list: Uuid) -> Self {
        Self {
            title: title.into(),
            task_list,
            description: None,
            priority: None,
            position: None,
            due_date: None,
            label_color: None,
            assignees: None,
        }
    }
}

///// Echo returned by task creation: the submitted fields plus the
/// position the server assigned. The new task's id is not echoed, so
/// the affected list has to be refetched to pick it up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCreated {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub task_list: Uuid,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub label_color: Option<String>,
    #[serde(default)]
    pub assignees: Vec<Uuid>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Uuid>>,
}

/// Body of the task move action: destination list and the slot to
/// occupy there. The server shifts everything at or after the slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskMove {
    pub target_list: Uuid,
    pub new_position: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Complete,
    Incomplete,
    Archive,
    Unarchive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskBulkUpdate {
    pub task_ids: Vec<Uuid>,
    pub action: BulkAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkUpdateResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

// ==================== Comments ====================

/// Comment as serialized by the backend: the author is a primary key
/// with the email and display name flattened in alongside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskComment {
    pub id: Uuid,
    pub task: Uuid,
    pub author: Uuid,
    pub author_email: String,
    #[serde(default)]
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentCreate {
    pub task: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentUpdate {
    pub content: String,
}

// ==================== Tests ====================
