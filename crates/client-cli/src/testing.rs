//! In-process stand-in for the hostel API, plus a recording `Ui`

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path as UrlPath, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use shared::{
    Activity, AdminDashboard, Application, ApplicationRequest, ApplicationStatus, Credentials,
    DashboardStats, Decision, Ident, NewRoom, Registration, Role, Room, RoomAssignment,
    RoomStatus, Session, StudentRecord, StudentSummary,
};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::pages::Context;
use crate::session::SessionStore;
use crate::ui::Ui;

pub const ADMIN_TOKEN: &str = "admin-token";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

pub struct MockUser {
    pub email: String,
    pub password: String,
    pub session: Session,
}

#[derive(Default)]
pub struct MockData {
    pub users: Vec<MockUser>,
    pub records: HashMap<String, StudentRecord>,
    pub applications: Vec<Application>,
    pub rooms: Vec<Room>,
    pub students: Vec<StudentSummary>,
    pub activities: Vec<Activity>,
    pub next_id: i64,
    stubs: HashMap<String, (u16, String)>,
    requests: Vec<RecordedRequest>,
}

pub fn admin_session() -> Session {
    serde_json::from_value(json!({
        "id": 1,
        "name": "Warden Wu",
        "email": "admin@hostel.test",
        "role": "admin",
        "token": ADMIN_TOKEN
    }))
    .unwrap()
}

pub fn student_session() -> Session {
    serde_json::from_value(json!({
        "id": 5,
        "name": "Ada Lovelace",
        "email": "ada@hostel.test",
        "role": "student",
        "token": "student-token",
        "studentId": "S-1001"
    }))
    .unwrap()
}

impl MockData {
    /// Two accounts, two students, two rooms, two applications
    pub fn seeded() -> Self {
        let mut records = HashMap::new();
        records.insert(
            "5".to_string(),
            serde_json::from_value(json!({
                "user": {
                    "name": "Ada Lovelace",
                    "studentId": "S-1001",
                    "email": "ada@hostel.test",
                    "phone": "555-0100"
                },
                "application": { "status": "pending" }
            }))
            .unwrap(),
        );

        Self {
            users: vec![
                MockUser {
                    email: "admin@hostel.test".to_string(),
                    password: "admin-pass".to_string(),
                    session: admin_session(),
                },
                MockUser {
                    email: "ada@hostel.test".to_string(),
                    password: "student-pass".to_string(),
                    session: student_session(),
                },
            ],
            records,
            applications: serde_json::from_value(json!([
                {
                    "id": 1,
                    "studentId": 5,
                    "studentName": "Ada Lovelace",
                    "studentEmail": "ada@hostel.test",
                    "preferredBuilding": "North",
                    "preferredRoomType": "single",
                    "moveInDate": "2026-09-01",
                    "status": "pending",
                    "submittedAt": "2026-08-01T10:00:00Z"
                },
                {
                    "id": 2,
                    "studentId": 6,
                    "studentName": "Ben Okafor",
                    "studentEmail": "ben@hostel.test",
                    "preferredBuilding": "South",
                    "preferredRoomType": "double",
                    "moveInDate": "2026-09-15",
                    "status": "approved",
                    "submittedAt": "2026-08-02T09:00:00Z",
                    "processedAt": "2026-08-03T15:30:00Z"
                }
            ]))
            .unwrap(),
            rooms: serde_json::from_value(json!([
                {
                    "id": 10,
                    "roomNumber": "101",
                    "building": "North",
                    "floor": 1,
                    "type": "single",
                    "capacity": 1,
                    "status": "available"
                },
                {
                    "id": 11,
                    "roomNumber": "102",
                    "building": "North",
                    "floor": 1,
                    "type": "double",
                    "capacity": 2,
                    "status": "occupied",
                    "assignedTo": "6",
                    "moveInDate": "2026-09-15"
                }
            ]))
            .unwrap(),
            students: serde_json::from_value(json!([
                { "id": 5, "name": "Ada Lovelace", "email": "ada@hostel.test" },
                { "id": 6, "name": "Ben Okafor", "email": "ben@hostel.test" }
            ]))
            .unwrap(),
            activities: vec![Activity {
                kind: "application".to_string(),
                description: "Ada Lovelace applied for housing".to_string(),
                timestamp: Some("2026-08-01T10:00:00Z".to_string()),
            }],
            next_id: 100,
            stubs: HashMap::new(),
            requests: Vec::new(),
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn room_mut(&mut self, id: &Ident) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| &r.id == id)
    }

    fn application_mut(&mut self, id: &Ident) -> Option<&mut Application> {
        self.applications.iter_mut().find(|a| &a.id == id)
    }

    fn dashboard(&self) -> AdminDashboard {
        let total_rooms = self.rooms.len() as u64;
        let available_rooms = self.rooms.iter().filter(|r| r.status.is_available()).count() as u64;
        let occupied = self
            .rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Occupied)
            .count() as f64;

        AdminDashboard {
            stats: DashboardStats {
                total_applications: self.applications.len() as u64,
                pending_applications: self
                    .applications
                    .iter()
                    .filter(|a| a.status.is_pending())
                    .count() as u64,
                total_rooms,
                available_rooms,
                total_students: self.students.len() as u64,
                occupancy_rate: if total_rooms == 0 {
                    0.0
                } else {
                    occupied * 100.0 / total_rooms as f64
                },
            },
            applications: self.applications.clone(),
            rooms: self.rooms.clone(),
            activities: self.activities.clone(),
        }
    }
}

type Shared = Arc<Mutex<MockData>>;

/// A running mock server on 127.0.0.1
pub struct MockApi {
    pub base_url: String,
    data: Shared,
    handle: JoinHandle<()>,
}

impl MockApi {
    pub async fn start(data: MockData) -> Self {
        let data = Arc::new(Mutex::new(data));
        let app = router(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            data,
            handle,
        }
    }

    /// Answer `METHOD path` with a fixed status and raw body from now on
    pub fn stub(&self, method: &str, path: &str, status: u16, body: &str) {
        self.with_data(|d| {
            d.stubs
                .insert(format!("{} {}", method, path), (status, body.to_string()))
        });
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.with_data(|d| d.requests.clone())
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Requests other than GET
    pub fn mutations(&self) -> usize {
        self.requests().iter().filter(|r| r.method != "GET").count()
    }

    pub fn room(&self, id: i64) -> Option<Room> {
        let id = Ident::Number(id);
        self.with_data(|d| d.rooms.iter().find(|r| r.id == id).cloned())
    }

    pub fn application(&self, id: i64) -> Option<Application> {
        let id = Ident::Number(id);
        self.with_data(|d| d.applications.iter().find(|a| a.id == id).cloned())
    }

    /// A page context talking to this server with its session file in `dir`
    pub fn context(&self, dir: &Path) -> Context {
        Context {
            api: ApiClient::new(&self.base_url).unwrap(),
            sessions: SessionStore::in_dir(dir),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/students/:id", get(student_record))
        .route("/api/applications", get(list_applications).post(submit_application))
        .route("/api/rooms", get(list_rooms))
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/rooms", post(add_room))
        .route("/api/admin/rooms/:id", get(get_room).delete(delete_room))
        .route("/api/admin/rooms/:id/assign", put(assign_room))
        .route("/api/admin/students", get(list_students))
        .route("/api/admin/applications/:id", get(get_application))
        .route("/api/admin/applications/:id/approve", put(approve))
        .route("/api/admin/applications/:id/reject", put(reject))
        .layer(middleware::from_fn_with_state(data.clone(), intercept))
        .with_state(data)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Records every request, serves stubs, and guards the admin routes
async fn intercept(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let stub = {
        let mut data = data.lock().unwrap();
        data.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            authorization: authorization.clone(),
        });
        data.stubs.get(&format!("{} {}", method, path)).cloned()
    };

    if let Some((status, body)) = stub {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, body).into_response();
    }

    let expected = format!("Bearer {}", ADMIN_TOKEN);
    if path.starts_with("/api/admin") && authorization.as_deref() != Some(expected.as_str()) {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    next.run(request).await
}

async fn login(State(data): State<Shared>, Json(credentials): Json<Credentials>) -> Response {
    let data = data.lock().unwrap();
    match data
        .users
        .iter()
        .find(|u| u.email == credentials.email && u.password == credentials.password)
    {
        Some(user) => Json(user.session.clone()).into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn register(State(data): State<Shared>, Json(registration): Json<Registration>) -> Response {
    let mut data = data.lock().unwrap();
    if data.users.iter().any(|u| u.email == registration.email) {
        return message(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let id = data.next_id();
    let session = Session {
        id: Ident::Number(id),
        name: Some(registration.name.clone()),
        email: Some(registration.email.clone()),
        role: Role::Student,
        token: Some(format!("token-{}", id)),
        student_id: registration.student_id.clone(),
        phone: registration.phone.clone(),
        address: registration.address.clone(),
    };
    data.students.push(StudentSummary {
        id: Ident::Number(id),
        name: Some(registration.name.clone()),
        email: Some(registration.email.clone()),
    });
    data.users.push(MockUser {
        email: registration.email,
        password: registration.password,
        session,
    });

    message(StatusCode::CREATED, "Registered")
}

async fn student_record(State(data): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let data = data.lock().unwrap();
    match data.records.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Student not found"),
    }
}

async fn list_applications(State(data): State<Shared>) -> Response {
    Json(data.lock().unwrap().applications.clone()).into_response()
}

async fn submit_application(
    State(data): State<Shared>,
    Json(request): Json<ApplicationRequest>,
) -> Response {
    let mut data = data.lock().unwrap();
    let id = data.next_id();
    data.applications.push(Application {
        id: Ident::Number(id),
        student_id: Some(request.student_id),
        preferred_building: Some(request.preferred_building),
        preferred_room_type: Some(request.preferred_room_type),
        move_in_date: Some(request.move_in_date),
        special_requirements: Some(request.special_requirements),
        status: ApplicationStatus::Pending,
        submitted_at: Some("2026-10-16T09:30:00Z".to_string()),
        processed_at: None,
        student_name: None,
        student_email: None,
        created_at: None,
        preferences: None,
    });
    message(StatusCode::CREATED, "Application received")
}

async fn list_rooms(State(data): State<Shared>) -> Response {
    Json(data.lock().unwrap().rooms.clone()).into_response()
}

async fn dashboard(State(data): State<Shared>) -> Response {
    Json(data.lock().unwrap().dashboard()).into_response()
}

async fn add_room(State(data): State<Shared>, Json(room): Json<NewRoom>) -> Response {
    let mut data = data.lock().unwrap();
    let id = data.next_id();
    data.rooms.push(Room {
        id: Ident::Number(id),
        room_number: Some(room.room_number),
        building: Some(room.building),
        floor: Some(room.floor),
        room_type: Some(room.room_type.to_string()),
        capacity: Some(room.capacity),
        status: room.status,
        assigned_to: None,
        move_in_date: None,
        name: None,
        description: None,
        occupancy_limit: None,
    });
    message(StatusCode::CREATED, "Room added")
}

async fn get_room(State(data): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let id: Ident = id.parse().unwrap();
    let mut data = data.lock().unwrap();
    match data.room_mut(&id) {
        Some(room) => Json(room.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Room not found"),
    }
}

async fn delete_room(State(data): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let id: Ident = id.parse().unwrap();
    let mut data = data.lock().unwrap();
    let before = data.rooms.len();
    data.rooms.retain(|r| r.id != id);
    if data.rooms.len() == before {
        return message(StatusCode::NOT_FOUND, "Room not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn assign_room(
    State(data): State<Shared>,
    UrlPath(id): UrlPath<String>,
    Json(assignment): Json<RoomAssignment>,
) -> Response {
    let id: Ident = id.parse().unwrap();
    let mut data = data.lock().unwrap();
    let Some(room) = data.room_mut(&id) else {
        return message(StatusCode::NOT_FOUND, "Room not found");
    };
    if !room.status.is_available() {
        return message(StatusCode::CONFLICT, "Room is not available");
    }
    room.status = RoomStatus::Occupied;
    room.assigned_to = Some(assignment.student_id.to_string());
    room.move_in_date = Some(assignment.move_in_date);
    Json(room.clone()).into_response()
}

async fn list_students(State(data): State<Shared>) -> Response {
    Json(data.lock().unwrap().students.clone()).into_response()
}

async fn get_application(State(data): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let id: Ident = id.parse().unwrap();
    let mut data = data.lock().unwrap();
    match data.application_mut(&id) {
        Some(app) => Json(app.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Application not found"),
    }
}

async fn approve(state: State<Shared>, id: UrlPath<String>) -> Response {
    review(state, id, Decision::Approve)
}

async fn reject(state: State<Shared>, id: UrlPath<String>) -> Response {
    review(state, id, Decision::Reject)
}

fn review(State(data): State<Shared>, UrlPath(id): UrlPath<String>, decision: Decision) -> Response {
    let id: Ident = id.parse().unwrap();
    let mut data = data.lock().unwrap();
    let Some(app) = data.application_mut(&id) else {
        return message(StatusCode::NOT_FOUND, "Application not found");
    };
    match app.status.review(decision) {
        Ok(next) => {
            app.status = next;
            app.processed_at = Some("2026-10-16T12:00:00Z".to_string());
            Json(app.clone()).into_response()
        }
        Err(e) => message(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

/// Captures everything a page shows and answers its questions from a script
#[derive(Default)]
pub struct RecordingUi {
    pub alerts: Vec<String>,
    pub errors: Vec<String>,
    pub views: Vec<String>,
    pub questions: Vec<String>,
    pub confirm_answer: bool,
    pub answers: VecDeque<String>,
}

impl RecordingUi {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Self::default()
        }
    }

    pub fn last_view(&self) -> &str {
        self.views.last().map(String::as_str).unwrap_or_default()
    }
}

impl Ui for RecordingUi {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.confirm_answer
    }

    fn prompt(&mut self, question: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front()
    }

    fn show(&mut self, view: &str) {
        self.views.push(view.to_string());
    }
}
