//! REST client for the hostel API
//!
//! Every call joins the configured base URL with a route. Admin routes carry
//! the caller's bearer token. Non-2xx responses become [`ApiError::Rejected`]
//! with the server's `message`, or the route's default text when the body has
//! none.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::{
    AdminDashboard, Application, ApplicationRequest, Credentials, Decision, ErrorBody, Ident,
    NewRoom, Registration, Room, RoomAssignment, Session, StudentRecord, StudentSummary,
};
use thiserror::Error;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const DASHBOARD_FAILED: &str = "Failed to load dashboard data";
pub const SUBMIT_APPLICATION_FAILED: &str = "Failed to submit application";
pub const APPLICATIONS_FAILED: &str = "Failed to load applications";
pub const ROOMS_FAILED: &str = "Failed to load rooms";
pub const ADD_ROOM_FAILED: &str = "Failed to add room";
pub const ROOM_FAILED: &str = "Failed to fetch room details";
pub const ASSIGN_ROOM_FAILED: &str = "Failed to assign room";
pub const DELETE_ROOM_FAILED: &str = "Failed to delete room";
pub const STUDENTS_FAILED: &str = "Failed to fetch students";
pub const APPLICATION_FAILED: &str = "Failed to fetch application details";
pub const APPROVE_FAILED: &str = "Failed to approve application";
pub const REJECT_FAILED: &str = "Failed to reject application";

/// A failed API call. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// The request never got a response
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body was not the expected JSON
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("hostel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API URL must be a hierarchical http(s) URL: {}", base_url);
        }

        Ok(Self {
            http,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus one path segment per item. Ids are escaped so `/`, `?`
    /// and `#` stay inside their segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        match &session.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder, fallback: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            message: fallback.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| fallback.to_string());

        tracing::debug!("Request rejected with {}: {}", status, message);
        Err(ApiError::Rejected { status, message })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = self.execute(request, fallback).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            message: fallback.to_string(),
            source,
        })
    }

    /// Mutations ignore the success body
    async fn submit(&self, request: RequestBuilder, fallback: &str) -> Result<(), ApiError> {
        self.execute(request, fallback).await.map(|_| ())
    }

    // ------------------------------------------------------------------
    // Public routes
    // ------------------------------------------------------------------

    /// POST /login
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.http.post(self.url(&["login"])).json(credentials);
        self.fetch(request, LOGIN_FAILED).await
    }

    /// POST /register
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self.http.post(self.url(&["register"])).json(registration);
        self.submit(request, REGISTRATION_FAILED).await
    }

    /// GET /students/{id}
    pub async fn student_record(&self, student: &Ident) -> Result<StudentRecord, ApiError> {
        let request = self.http.get(self.url(&["students", student.to_string().as_str()]));
        self.fetch(request, DASHBOARD_FAILED).await
    }

    /// POST /applications
    pub async fn submit_application(&self, application: &ApplicationRequest) -> Result<(), ApiError> {
        let request = self.http.post(self.url(&["applications"])).json(application);
        self.submit(request, SUBMIT_APPLICATION_FAILED).await
    }

    /// GET /applications
    pub async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.http.get(self.url(&["applications"]));
        self.fetch(request, APPLICATIONS_FAILED).await
    }

    /// GET /rooms
    pub async fn rooms(&self) -> Result<Vec<Room>, ApiError> {
        let request = self.http.get(self.url(&["rooms"]));
        self.fetch(request, ROOMS_FAILED).await
    }

    // ------------------------------------------------------------------
    // Admin routes (bearer token)
    // ------------------------------------------------------------------

    /// GET /admin/dashboard
    pub async fn admin_dashboard(&self, session: &Session) -> Result<AdminDashboard, ApiError> {
        let request = self.authorized(self.http.get(self.url(&["admin", "dashboard"])), session);
        self.fetch(request, DASHBOARD_FAILED).await
    }

    /// POST /admin/rooms
    pub async fn add_room(&self, session: &Session, room: &NewRoom) -> Result<(), ApiError> {
        let request = self.authorized(self.http.post(self.url(&["admin", "rooms"])), session).json(room);
        self.submit(request, ADD_ROOM_FAILED).await
    }

    /// GET /admin/rooms/{id}
    pub async fn room(&self, session: &Session, room: &Ident) -> Result<Room, ApiError> {
        let url = self.url(&["admin", "rooms", room.to_string().as_str()]);
        let request = self.authorized(self.http.get(url), session);
        self.fetch(request, ROOM_FAILED).await
    }

    /// PUT /admin/rooms/{id}/assign
    pub async fn assign_room(
        &self,
        session: &Session,
        room: &Ident,
        assignment: &RoomAssignment,
    ) -> Result<(), ApiError> {
        let url = self.url(&["admin", "rooms", room.to_string().as_str(), "assign"]);
        let request = self.authorized(self.http.put(url), session).json(assignment);
        self.submit(request, ASSIGN_ROOM_FAILED).await
    }

    /// DELETE /admin/rooms/{id}
    pub async fn delete_room(&self, session: &Session, room: &Ident) -> Result<(), ApiError> {
        let url = self.url(&["admin", "rooms", room.to_string().as_str()]);
        let request = self.authorized(self.http.delete(url), session);
        self.submit(request, DELETE_ROOM_FAILED).await
    }

    /// GET /admin/students
    pub async fn students(&self, session: &Session) -> Result<Vec<StudentSummary>, ApiError> {
        let request = self.authorized(self.http.get(self.url(&["admin", "students"])), session);
        self.fetch(request, STUDENTS_FAILED).await
    }

    /// GET /admin/applications/{id}
    pub async fn application(&self, session: &Session, application: &Ident) -> Result<Application, ApiError> {
        let url = self.url(&["admin", "applications", application.to_string().as_str()]);
        let request = self.authorized(self.http.get(url), session);
        self.fetch(request, APPLICATION_FAILED).await
    }

    /// PUT /admin/applications/{id}/approve or /reject
    pub async fn review_application(
        &self,
        session: &Session,
        application: &Ident,
        decision: Decision,
    ) -> Result<(), ApiError> {
        let (action, fallback) = match decision {
            Decision::Approve => ("approve", APPROVE_FAILED),
            Decision::Reject => ("reject", REJECT_FAILED),
        };
        let url = self.url(&["admin", "applications", application.to_string().as_str(), action]);
        let request = self.authorized(self.http.put(url), session);
        self.submit(request, fallback).await
    }
}
