//! Project endpoints: CRUD plus membership management.

use uuid::Uuid;

use crate::api::types::{
    AddMemberRequest, MemberRole, Page, Project, ProjectCreate, ProjectCreated, ProjectUpdate,
};
use crate::client::ApiClient;
use crate::error::ApiError;

/// `/api/projects/` endpoint group.
#[derive(Clone)]
pub struct ProjectsApi {
    http: ApiClient,
}

impl ProjectsApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Projects visible to the logged-in user, first page unwrapped.
    /// For the rare account with more, follow `next` with the raw
    /// transport.
    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let page: Page<Project> = self.http.get("/api/projects/").await?;
        Ok(page.results)
    }

    pub async fn get(&self, project: Uuid) -> Result<Project, ApiError> {
        self.http.get(&format!("/api/projects/{}/", project)).await
    }

    /// Create a project. The response is the server's thin create
    /// echo; use [`ProjectsApi::get`] with the echoed id for the full
    /// detail shape.
    pub async fn create(&self, request: &ProjectCreate) -> Result<ProjectCreated, ApiError> {
        self.http.post("/api/projects/", request).await
    }

    /// Update project settings. The backend echoes only the writable
    /// fields back, so there is nothing to return; refetch for the
    /// updated resource.
    pub async fn update(&self, project: Uuid, update: &ProjectUpdate) -> Result<(), ApiError> {
        self.http
            .patch_unit(&format!("/api/projects/{}/", project), update)
            .await
    }

    pub async fn delete(&self, project: Uuid) -> Result<(), ApiError> {
        self.http.delete(&format!("/api/projects/{}/", project)).await
    }

    /// Invite a user by email.
    pub async fn add_member(
        &self,
        project: Uuid,
        email: &str,
        role: MemberRole,
    ) -> Result<(), ApiError> {
        let request = AddMemberRequest {
            email: email.to_string(),
            role,
        };
        self.http
            .post_unit(&format!("/api/projects/{}/add_member/", project), &request)
            .await
    }

    /// Remove a member by their user id.
    pub async fn remove_member(&self, project: Uuid, user: Uuid) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/api/projects/{}/members/{}/", project, user))
            .await
    }

    /// Leave a project the current user is a member of.
    pub async fn leave(&self, project: Uuid) -> Result<(), ApiError> {
        self.http
            .post_empty_unit(&format!("/api/projects/{}/leave/", project))
            .await
    }
}

// ==================== Tests ====================
