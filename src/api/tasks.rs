//! Task board endpoints: lists, tasks and comments.

use uuid::Uuid;

use crate::api::types::{
    BulkUpdateResponse, CommentCreate, CommentUpdate, Page, ReorderRequest, Task, TaskBulkUpdate,
    TaskComment, TaskCreate, TaskCreated, TaskList, TaskListCreate, TaskListCreated,
    TaskListUpdate, TaskMove, TaskPriority, TaskUpdate,
};
use crate::client::ApiClient;
use crate::error::ApiError;

/// Filters accepted by the task listing endpoint. These mirror the
/// backend's filter set exactly; it does not filter by assignee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub task_list: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub is_completed: Option<bool>,
    pub is_archived: Option<bool>,
    pub creator: Option<Uuid>,
    /// Free-text search over title and description.
    pub search: Option<String>,
}

impl TaskFilters {
    pub fn for_list(task_list: Uuid) -> Self {
        Self {
            task_list: Some(task_list),
            ..Default::default()
        }
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.task_list {
            query.push(("task_list", id.to_string()));
        }
        if let Some(priority) = self.priority {
            query.push(("priority", priority.as_str().to_string()));
        }
        if let Some(done) = self.is_completed {
            query.push(("is_completed", done.to_string()));
        }
        if let Some(archived) = self.is_archived {
            query.push(("is_archived", archived.to_string()));
        }
        if let Some(id) = self.creator {
            query.push(("creator", id.to_string()));
        }
        if let Some(ref text) = self.search {
            query.push(("search", text.clone()));
        }
        query
    }
}

/// `/api/tasks/` endpoint group.
#[derive(Clone)]
pub struct TasksApi {
    http: ApiClient,
}

impl TasksApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    // ==================== Task lists ====================

    /// Lists of a project with their tasks embedded, in board order.
    pub async fn task_lists(&self, project: Option<Uuid>) -> Result<Vec<TaskList>, ApiError> {
        let page: Page<TaskList> = match project {
            Some(id) => {
                self.http
                    .get_query("/api/tasks/task-lists/", &[("project", id.to_string())])
                    .await?
            }
            None => self.http.get("/api/tasks/task-lists/").await?,
        };
        Ok(page.results)
    }

    pub async fn task_list(&self, list: Uuid) -> Result<TaskList, ApiError> {
        self.http
            .get(&format!("/api/tasks/task-lists/{}/", list))
            .await
    }

    /// Create a list. The response echoes only the submitted fields;
    /// refetch the project's lists to see the assigned id and slot.
    pub async fn create_task_list(
        &self,
        request: &TaskListCreate,
    ) -> Result<TaskListCreated, ApiError> {
        self.http.post("/api/tasks/task-lists/", request).await
    }

    pub async fn update_task_list(
        &self,
        list: Uuid,
        update: &TaskListUpdate,
    ) -> Result<TaskList, ApiError> {
        self.http
            .patch(&format!("/api/tasks/task-lists/{}/", list), update)
            .await
    }

    pub async fn delete_task_list(&self, list: Uuid) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/api/tasks/task-lists/{}/", list))
            .await
    }

    /// Move a whole column to a new position on the board. The server
    /// answers with a bare status line, so callers refetch the board
    /// to pick up the shifted columns.
    pub async fn reorder_task_list(&self, list: Uuid, new_position: u32) -> Result<(), ApiError> {
        self.http
            .post_unit(
                &format!("/api/tasks/task-lists/{}/reorder/", list),
                &ReorderRequest { new_position },
            )
            .await
    }

    pub async fn archive_task_list(&self, list: Uuid) -> Result<TaskList, ApiError> {
        self.http
            .post_empty(&format!("/api/tasks/task-lists/{}/archive/", list))
            .await
    }

    // ==================== Tasks ====================

    pub async fn tasks(&self, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
        let query = filters.to_query();
        let page: Page<Task> = if query.is_empty() {
            self.http.get("/api/tasks/tasks/").await?
        } else {
            self.http.get_query("/api/tasks/tasks/", &query).await?
        };
        Ok(page.results)
    }

    pub async fn task(&self, task: Uuid) -> Result<Task, ApiError> {
        self.http.get(&format!("/api/tasks/tasks/{}/", task)).await
    }

    /// Create a task. Like list creation, the echo is thin; the board
    /// refetch brings in the full row.
    pub async fn create_task(&self, request: &TaskCreate) -> Result<TaskCreated, ApiError> {
        self.http.post("/api/tasks/tasks/", request).await
    }

    pub async fn update_task(&self, task: Uuid, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.http
            .patch(&format!("/api/tasks/tasks/{}/", task), update)
            .await
    }

    pub async fn delete_task(&self, task: Uuid) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/api/tasks/tasks/{}/", task))
            .await
    }

    /// Drop a task into a list at a slot. The server shifts displaced
    /// tasks and answers with the updated task; affected lists should
    /// be refetched to pick up the shifted positions.
    pub async fn move_task(&self, task: Uuid, request: &TaskMove) -> Result<Task, ApiError> {
        self.http
            .post(&format!("/api/tasks/tasks/{}/move/", task), request)
            .await
    }

    pub async fn toggle_complete(&self, task: Uuid) -> Result<Task, ApiError> {
        self.http
            .post_empty(&format!("/api/tasks/tasks/{}/toggle_complete/", task))
            .await
    }

    pub async fn archive_task(&self, task: Uuid) -> Result<Task, ApiError> {
        self.http
            .post_empty(&format!("/api/tasks/tasks/{}/archive/", task))
            .await
    }

    /// Apply one action to many tasks at once.
    pub async fn bulk_update(
        &self,
        request: &TaskBulkUpdate,
    ) -> Result<BulkUpdateResponse, ApiError> {
        self.http.post("/api/tasks/tasks/bulk_update/", request).await
    }

    // ==================== Comments ====================

    pub async fn comments(&self, task: Uuid) -> Result<Vec<TaskComment>, ApiError> {
        let page: Page<TaskComment> = self
            .http
            .get_query("/api/tasks/task-comments/", &[("task", task.to_string())])
            .await?;
        Ok(page.results)
    }

    pub async fn create_comment(&self, request: &CommentCreate) -> Result<TaskComment, ApiError> {
        self.http.post("/api/tasks/task-comments/", request).await
    }

    pub async fn update_comment(
        &self,
        comment: Uuid,
        content: &str,
    ) -> Result<TaskComment, ApiError> {
        self.http
            .patch(
                &format!("/api/tasks/task-comments/{}/", comment),
                &CommentUpdate {
                    content: content.to_string(),
                },
            )
            .await
    }

    pub async fn delete_comment(&self, comment: Uuid) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/api/tasks/task-comments/{}/", comment))
            .await
    }
}

// ==================== Tests ====================
