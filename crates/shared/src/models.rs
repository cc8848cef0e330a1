use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Entity id as sent by the hostel API.
///
/// Depending on the backend, ids arrive as JSON numbers or strings. Two ids
/// are equal when their textual forms match, so `7` and `"7"` name the same
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
    Number(i64),
    Text(String),
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ident::Number(a), Ident::Number(b)) => a == b,
            (Ident::Text(a), Ident::Text(b)) => a == b,
            (Ident::Number(n), Ident::Text(t)) | (Ident::Text(t), Ident::Number(n)) => {
                t.trim().parse::<i64>().ok() == Some(*n)
            }
        }
    }
}

impl Eq for Ident {}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Number(n) => write!(f, "{}", n),
            Ident::Text(t) => f.write_str(t),
        }
    }
}

impl FromStr for Ident {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => Ident::Number(n),
            Err(_) => Ident::Text(s.to_string()),
        })
    }
}

impl From<i64> for Ident {
    fn from(n: i64) -> Self {
        Ident::Number(n)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::Text(s.to_string())
    }
}

/// Accepts a string, a number, or null for fields that backends disagree on
/// (floors typed into a form, assignees sent as ids or names).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ============================================================================
// Session
// ============================================================================

/// Role of the logged-in user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// The current user, exactly as returned by `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Ident,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ============================================================================
// Applications
// ============================================================================

/// Review status of a housing application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Approved")]
    Approved,
    #[serde(alias = "Rejected")]
    Rejected,
}

/// Admin decision on a pending application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("application is already {0}")]
pub struct ReviewError(pub ApplicationStatus);

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Capitalized form used in student-facing lists
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        *self == ApplicationStatus::Pending
    }

    /// Apply an admin decision. Only pending applications can be reviewed;
    /// approved and rejected are terminal.
    pub fn review(self, decision: Decision) -> Result<Self, ReviewError> {
        match (self, decision) {
            (ApplicationStatus::Pending, Decision::Approve) => Ok(ApplicationStatus::Approved),
            (ApplicationStatus::Pending, Decision::Reject) => Ok(ApplicationStatus::Rejected),
            (terminal, _) => Err(ReviewError(terminal)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested preference block used by some backends instead of the flat
/// `preferred*` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
}

/// A student's request for housing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Ident,
    #[serde(default)]
    pub student_id: Option<Ident>,
    #[serde(default)]
    pub preferred_building: Option<String>,
    #[serde(default)]
    pub preferred_room_type: Option<String>,
    #[serde(default)]
    pub move_in_date: Option<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    /// Joined by the admin endpoints
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl Application {
    pub fn room_type(&self) -> Option<&str> {
        self.preferences
            .as_ref()
            .and_then(|p| p.room_type.as_deref())
            .or(self.preferred_room_type.as_deref())
    }

    pub fn building(&self) -> Option<&str> {
        self.preferences
            .as_ref()
            .and_then(|p| p.building.as_deref())
            .or(self.preferred_building.as_deref())
    }

    pub fn belongs_to(&self, student: &Ident) -> bool {
        self.student_id.as_ref() == Some(student)
    }
}

/// Keep only the applications submitted by `student`
pub fn applications_for(applications: Vec<Application>, student: &Ident) -> Vec<Application> {
    applications
        .into_iter()
        .filter(|app| app.belongs_to(student))
        .collect()
}

// ============================================================================
// Rooms
// ============================================================================

/// Lifecycle flag of a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[serde(alias = "Available")]
    Available,
    #[serde(alias = "Occupied")]
    Occupied,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Unknown => "unknown",
        }
    }

    pub fn is_available(&self) -> bool {
        *self == RoomStatus::Available
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room types offered by the add-room form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Suite,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room type '{0}' (expected single, double or suite)")]
pub struct UnknownRoomType(pub String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(RoomType::Single),
            "double" => Ok(RoomType::Double),
            "suite" => Ok(RoomType::Suite),
            _ => Err(UnknownRoomType(s.to_string())),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomType::Single => f.write_str("single"),
            RoomType::Double => f.write_str("double"),
            RoomType::Suite => f.write_str("suite"),
        }
    }
}

/// A room in the hostel inventory.
///
/// The admin endpoints send the full inventory shape; the public listing uses
/// `name`, `description` and `occupancyLimit` instead. Both decode here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Ident,
    #[serde(default, deserialize_with = "lenient_string")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub floor: Option<String>,
    #[serde(default, rename = "type")]
    pub room_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub move_in_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub occupancy_limit: Option<u32>,
}

impl Room {
    pub fn display_name(&self) -> String {
        self.room_number
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity.or(self.occupancy_limit)
    }
}

// ============================================================================
// Student dashboard
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Student ↔ room ↔ move-in date, joined server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Housing {
    #[serde(default, deserialize_with = "lenient_string")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub floor: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub roommates: Vec<String>,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub move_in_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub status: ApplicationStatus,
}

/// Response of `GET /students/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub user: StudentProfile,
    #[serde(default)]
    pub housing: Option<Housing>,
    #[serde(default)]
    pub application: Option<ApplicationSummary>,
}

// ============================================================================
// Admin dashboard
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_applications: u64,
    pub pending_applications: u64,
    pub total_rooms: u64,
    pub available_rooms: u64,
    pub total_students: u64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub timestamp: Option<String>,
}

/// Response of `GET /admin/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminDashboard {
    pub stats: DashboardStats,
    pub applications: Vec<Application>,
    pub rooms: Vec<Room>,
    pub activities: Vec<Activity>,
}

/// Entry of `GET /admin/students`, used to pick an assignee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: Ident,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub student_id: Ident,
    pub preferred_building: String,
    pub preferred_room_type: String,
    pub move_in_date: String,
    pub special_requirements: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    pub building: String,
    pub floor: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: u32,
    pub status: RoomStatus,
}

impl NewRoom {
    /// New rooms always enter the inventory as available
    pub fn new(
        room_number: impl Into<String>,
        building: impl Into<String>,
        floor: impl Into<String>,
        room_type: RoomType,
        capacity: u32,
    ) -> Self {
        Self {
            room_number: room_number.into(),
            building: building.into(),
            floor: floor.into(),
            room_type,
            capacity,
            status: RoomStatus::Available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAssignment {
    pub student_id: Ident,
    pub move_in_date: String,
}

/// Error body sent with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The server message, if it is present and non-empty
    pub fn into_message(self) -> Option<String> {
        self.message.filter(|m| !m.trim().is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================
