//! Text views. Every function here is a pure function of fetched state.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::{AdminDashboard, Application, Room, Session, StudentRecord, StudentSummary};

const INVALID_DATE: &str = "Invalid Date";
const NOT_SPECIFIED: &str = "Not specified";

/// Action a row offers to the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Approve,
    Reject,
    Assign,
    Delete,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Assign => "assign",
            Action::Delete => "delete",
        }
    }
}

/// Review actions are only offered while the application is pending
pub fn application_actions(application: &Application) -> Vec<Action> {
    if application.status.is_pending() {
        vec![Action::View, Action::Approve, Action::Reject]
    } else {
        vec![Action::View]
    }
}

/// Assignment is only offered for available rooms
pub fn room_actions(room: &Room) -> Vec<Action> {
    if room.status.is_available() {
        vec![Action::View, Action::Assign, Action::Delete]
    } else {
        vec![Action::View, Action::Delete]
    }
}

fn action_list(actions: &[Action]) -> String {
    actions
        .iter()
        .map(Action::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Long en-US date, e.g. "October 16, 2026"
pub fn format_date(value: &str) -> String {
    match parse_datetime(value) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// en-US locale timestamp in UTC, e.g. "10/16/2026, 9:30:00 AM"
pub fn format_timestamp(value: &str) -> String {
    match parse_datetime(value) {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn optional_date(value: Option<&str>) -> String {
    value.map(format_date).unwrap_or_else(|| INVALID_DATE.to_string())
}

fn or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}

fn badge(text: &str) -> String {
    format!("[{}]", text)
}

pub fn activity_icon(kind: &str) -> &'static str {
    match kind {
        "application" => "📝",
        "approval" => "✅",
        "rejection" => "❌",
        "assignment" => "🛏",
        "maintenance" => "🔧",
        "payment" => "💵",
        _ => "ℹ",
    }
}

// ============================================================================
// Student views
// ============================================================================

pub fn student_dashboard(record: &StudentRecord) -> String {
    let user = &record.user;
    let mut lines = vec![
        "Personal Information".to_string(),
        format!("  Name:         {}", or(user.name.as_deref(), "--")),
        format!("  Student ID:   {}", or(user.student_id.as_deref(), "--")),
        format!("  Email:        {}", or(user.email.as_deref(), "--")),
        format!("  Phone:        {}", or(user.phone.as_deref(), "N/A")),
        format!("  Address:      {}", or(user.address.as_deref(), "N/A")),
        String::new(),
        "Housing".to_string(),
    ];

    match &record.housing {
        Some(housing) => {
            let roommates = if housing.roommates.is_empty() {
                "None".to_string()
            } else {
                housing.roommates.join(", ")
            };
            let rent = housing
                .monthly_rent
                .filter(|r| *r != 0.0)
                .map(|r| format!("${}", r))
                .unwrap_or_else(|| "--".to_string());
            let move_in = housing
                .move_in_date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "--".to_string());

            lines.push(format!("  Room:         {}", or(housing.room_number.as_deref(), "--")));
            lines.push(format!("  Building:     {}", or(housing.building.as_deref(), "--")));
            lines.push(format!("  Floor:        {}", or(housing.floor.as_deref(), "--")));
            lines.push(format!("  Room Type:    {}", or(housing.room_type.as_deref(), "--")));
            lines.push(format!("  Roommates:    {}", roommates));
            lines.push(format!("  Monthly Rent: {}", rent));
            lines.push(format!("  Move-in Date: {}", move_in));
        }
        None => {
            lines.push("  Room:         Not Assigned".to_string());
            for label in [
                "Building:    ",
                "Floor:       ",
                "Room Type:   ",
                "Roommates:   ",
                "Monthly Rent:",
                "Move-in Date:",
            ] {
                lines.push(format!("  {} N/A", label));
            }
        }
    }

    let status = match &record.application {
        Some(application) => application.status.as_str(),
        None => "Not Applied",
    };
    lines.push(String::new());
    lines.push(format!("Application Status: {}", badge(status)));

    lines.join("\n")
}

/// The student's own applications, newest data as the server sent it
pub fn application_list(applications: &[Application]) -> String {
    if applications.is_empty() {
        return "You haven't submitted any applications yet.".to_string();
    }

    let mut lines = vec!["Your Applications".to_string()];
    for app in applications {
        lines.push(String::new());
        lines.push(format!("Application #{}  {}", app.id, badge(app.status.label())));
        lines.push(format!("  Room Type:    {}", or(app.room_type(), NOT_SPECIFIED)));
        lines.push(format!("  Building:     {}", or(app.building(), NOT_SPECIFIED)));
        if let Some(date) = app.move_in_date.as_deref() {
            lines.push(format!("  Move-in Date: {}", format_date(date)));
        }
        lines.push(format!(
            "  Submitted:    {}",
            app.submitted_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| INVALID_DATE.to_string())
        ));
        if let Some(processed) = app.processed_at.as_deref() {
            lines.push(format!("  Processed:    {}", format_timestamp(processed)));
        }
    }
    lines.join("\n")
}

// ============================================================================
// Admin views
// ============================================================================

pub fn admin_dashboard(dashboard: &AdminDashboard) -> String {
    let stats = &dashboard.stats;
    let mut lines = vec![
        "Overview".to_string(),
        format!("  Total applications:   {}", stats.total_applications),
        format!("  Pending applications: {}", stats.pending_applications),
        format!("  Total rooms:          {}", stats.total_rooms),
        format!("  Available rooms:      {}", stats.available_rooms),
        format!("  Total students:       {}", stats.total_students),
        format!("  Occupancy rate:       {}%", stats.occupancy_rate),
        String::new(),
        "Applications".to_string(),
    ];

    if dashboard.applications.is_empty() {
        lines.push("  (none)".to_string());
    }
    for app in &dashboard.applications {
        lines.push(format!(
            "  #{:<5} {:<20} {:<24} {:<8} {:<20} {:<10} {}",
            app.id.to_string(),
            or(app.student_name.as_deref(), "--"),
            or(app.student_email.as_deref(), "--"),
            or(app.room_type(), "--"),
            optional_date(app.move_in_date.as_deref()),
            badge(app.status.as_str()),
            action_list(&application_actions(app)),
        ));
    }

    lines.push(String::new());
    lines.push("Rooms".to_string());
    if dashboard.rooms.is_empty() {
        lines.push("  (none)".to_string());
    }
    for room in &dashboard.rooms {
        let assignee = match (room.assigned_to.as_deref(), room.move_in_date.as_deref()) {
            (Some(student), Some(date)) if !student.trim().is_empty() => {
                format!("{} from {}", student, format_date(date))
            }
            (student, _) => or(student, "None").to_string(),
        };
        lines.push(format!(
            "  #{:<5} {:<8} {:<12} floor {:<4} {:<8} {:<12} {:<12} {}",
            room.id.to_string(),
            room.display_name(),
            or(room.building.as_deref(), "--"),
            or(room.floor.as_deref(), "--"),
            or(room.room_type.as_deref(), "--"),
            badge(room.status.as_str()),
            assignee,
            action_list(&room_actions(room)),
        ));
    }

    lines.push(String::new());
    lines.push("Recent Activity".to_string());
    if dashboard.activities.is_empty() {
        lines.push("  (none)".to_string());
    }
    for activity in &dashboard.activities {
        lines.push(format!(
            "  {} {}  ({})",
            activity_icon(&activity.kind),
            activity.description,
            optional_date(activity.timestamp.as_deref()),
        ));
    }

    lines.join("\n")
}

pub fn application_detail(app: &Application) -> String {
    let mut lines = vec![
        format!("Application #{}  {}", app.id, badge(app.status.as_str())),
        format!("  Student:      {}", or(app.student_name.as_deref(), "--")),
        format!("  Email:        {}", or(app.student_email.as_deref(), "--")),
        format!("  Building:     {}", or(app.building(), NOT_SPECIFIED)),
        format!("  Room Type:    {}", or(app.room_type(), NOT_SPECIFIED)),
        format!("  Move-in Date: {}", optional_date(app.move_in_date.as_deref())),
        format!(
            "  Requirements: {}",
            or(app.special_requirements.as_deref(), "None")
        ),
    ];
    if let Some(submitted) = app.submitted_at.as_deref().or(app.created_at.as_deref()) {
        lines.push(format!("  Submitted:    {}", format_timestamp(submitted)));
    }
    if let Some(processed) = app.processed_at.as_deref() {
        lines.push(format!("  Processed:    {}", format_timestamp(processed)));
    }
    lines.push(format!("  Actions:      {}", action_list(&application_actions(app))));
    lines.join("\n")
}

pub fn room_detail(room: &Room) -> String {
    let mut lines = vec![
        format!("Room {}  {}", room.display_name(), badge(room.status.as_str())),
        format!("  Building:     {}", or(room.building.as_deref(), "--")),
        format!("  Floor:        {}", or(room.floor.as_deref(), "--")),
        format!("  Type:         {}", or(room.room_type.as_deref(), "--")),
        format!(
            "  Capacity:     {}",
            room.capacity()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "--".to_string())
        ),
        format!("  Assigned To:  {}", or(room.assigned_to.as_deref(), "None")),
    ];
    if let Some(date) = room.move_in_date.as_deref() {
        lines.push(format!("  Move-in Date: {}", format_date(date)));
    }
    lines.push(format!("  Actions:      {}", action_list(&room_actions(room))));
    lines.join("\n")
}

/// Public room listing
pub fn room_list(rooms: &[Room]) -> String {
    if rooms.is_empty() {
        return "No rooms match.".to_string();
    }

    let mut lines = Vec::new();
    for room in rooms {
        let mut header = format!("{}  {}", room.display_name(), badge(room.status.as_str()));
        if let Some(building) = room.building.as_deref() {
            header.push_str(&format!("  {}", building));
        }
        lines.push(header);

        let mut details = Vec::new();
        if let Some(kind) = room.room_type.as_deref() {
            details.push(kind.to_string());
        }
        if let Some(capacity) = room.capacity() {
            details.push(format!("up to {}", capacity));
        }
        if !details.is_empty() {
            lines.push(format!("  {}", details.join(", ")));
        }
        if let Some(description) = room.description.as_deref() {
            lines.push(format!("  {}", description));
        }
    }
    lines.join("\n")
}

/// Numbered list the assignee is picked from
pub fn student_picker(students: &[StudentSummary]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }

    students
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "  {}. {} <{}> (id {})",
                i + 1,
                or(s.name.as_deref(), "--"),
                or(s.email.as_deref(), "--"),
                s.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session_summary(session: &Session) -> String {
    format!(
        "{} <{}> ({}, id {})",
        or(session.name.as_deref(), "--"),
        or(session.email.as_deref(), "--"),
        session.role,
        session.id
    )
}
