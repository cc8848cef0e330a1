//! Admin dashboard, detail views, and the actions that mutate inventory or
//! applications. Every successful action reloads the whole dashboard.

use anyhow::Result;
use reqwest::StatusCode;
use shared::{Decision, Ident, NewRoom, RoomAssignment, Session};

use super::{Context, Navigation};
use crate::ui::Ui;
use crate::views;

const DASHBOARD_LOAD_FAILED: &str = "Failed to load admin dashboard data. Please try again later.";
const STUDENTS_LOAD_FAILED: &str = "Failed to load student data";
const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this room?";

/// The stored session, when it belongs to an admin
fn admin_session(ctx: &Context) -> Option<Session> {
    ctx.session().filter(Session::is_admin)
}

pub async fn dashboard(ctx: &Context, ui: &mut dyn Ui) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };
    load_dashboard(ctx, ui, &session).await;
    Ok(Navigation::Stay)
}

/// Fetch and render the dashboard. Used after every successful action.
pub async fn load_dashboard(ctx: &Context, ui: &mut dyn Ui, session: &Session) {
    match ctx.api.admin_dashboard(session).await {
        Ok(dashboard) => ui.show(&views::admin_dashboard(&dashboard)),
        Err(e) => {
            tracing::error!("Loading admin dashboard failed: {}", e);
            if e.status() == Some(StatusCode::UNAUTHORIZED) {
                tracing::warn!("Admin token was rejected, run 'hostel login' again");
            }
            ui.alert(DASHBOARD_LOAD_FAILED);
        }
    }
}

pub async fn view_application(ctx: &Context, ui: &mut dyn Ui, id: &Ident) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    match ctx.api.application(&session, id).await {
        Ok(application) => ui.show(&views::application_detail(&application)),
        Err(e) => {
            tracing::error!("Fetching application {} failed: {}", id, e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}

pub async fn view_room(ctx: &Context, ui: &mut dyn Ui, id: &Ident) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    match ctx.api.room(&session, id).await {
        Ok(room) => ui.show(&views::room_detail(&room)),
        Err(e) => {
            tracing::error!("Fetching room {} failed: {}", id, e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}

pub async fn list_students(ctx: &Context, ui: &mut dyn Ui) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    match ctx.api.students(&session).await {
        Ok(students) => ui.show(&views::student_picker(&students)),
        Err(e) => {
            tracing::error!("Fetching students failed: {}", e);
            ui.alert(STUDENTS_LOAD_FAILED);
        }
    }
    Ok(Navigation::Stay)
}

/// Approve or reject. Only a pending application is reviewed; anything else
/// is refused before a request goes out.
pub async fn review(
    ctx: &Context,
    ui: &mut dyn Ui,
    id: &Ident,
    decision: Decision,
) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    let application = match ctx.api.application(&session, id).await {
        Ok(application) => application,
        Err(e) => {
            tracing::error!("Fetching application {} failed: {}", id, e);
            ui.alert(&e.to_string());
            return Ok(Navigation::Stay);
        }
    };

    if let Err(e) = application.status.review(decision) {
        ui.alert(&format!("Application #{}: {}", id, e));
        return Ok(Navigation::Stay);
    }

    match ctx.api.review_application(&session, id, decision).await {
        Ok(()) => {
            tracing::info!("Application {} {:?}", id, decision);
            ui.alert(match decision {
                Decision::Approve => "Application approved successfully!",
                Decision::Reject => "Application rejected successfully!",
            });
            load_dashboard(ctx, ui, &session).await;
        }
        Err(e) => {
            tracing::error!("Reviewing application {} failed: {}", id, e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}

pub async fn add_room(ctx: &Context, ui: &mut dyn Ui, room: NewRoom) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    match ctx.api.add_room(&session, &room).await {
        Ok(()) => {
            tracing::info!("Added room {} in {}", room.room_number, room.building);
            ui.alert("Room added successfully!");
            load_dashboard(ctx, ui, &session).await;
        }
        Err(e) => {
            tracing::error!("Adding room failed: {}", e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}

/// Pick an assignee from the student list. `None` when the list could not be
/// loaded, nothing was entered, or the answer matched nobody.
async fn choose_student(ctx: &Context, ui: &mut dyn Ui, session: &Session) -> Option<Ident> {
    let students = match ctx.api.students(session).await {
        Ok(students) => students,
        Err(e) => {
            tracing::error!("Fetching students failed: {}", e);
            ui.alert(STUDENTS_LOAD_FAILED);
            return None;
        }
    };

    ui.show(&views::student_picker(&students));
    let answer = ui.prompt("Assign to (number or id):").unwrap_or_default();
    let answer = answer.trim();
    if answer.is_empty() {
        ui.alert("No student selected");
        return None;
    }

    let by_position = answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=students.len()).contains(n))
        .map(|n| students[n - 1].id.clone());
    let chosen = by_position.or_else(|| {
        let wanted: Ident = answer.parse().ok()?;
        students.iter().find(|s| s.id == wanted).map(|s| s.id.clone())
    });

    if chosen.is_none() {
        ui.alert(&format!("No student matches '{}'", answer));
    }
    chosen
}

/// Assign an available room. The student is chosen interactively when not
/// given.
pub async fn assign_room(
    ctx: &Context,
    ui: &mut dyn Ui,
    room_id: &Ident,
    student: Option<Ident>,
    move_in_date: String,
) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    let room = match ctx.api.room(&session, room_id).await {
        Ok(room) => room,
        Err(e) => {
            tracing::error!("Fetching room {} failed: {}", room_id, e);
            ui.alert(&e.to_string());
            return Ok(Navigation::Stay);
        }
    };
    if !room.status.is_available() {
        ui.alert(&format!(
            "Room {} is {} and cannot be assigned",
            room.display_name(),
            room.status
        ));
        return Ok(Navigation::Stay);
    }

    let student = match student {
        Some(student) => student,
        None => match choose_student(ctx, ui, &session).await {
            Some(student) => student,
            None => return Ok(Navigation::Stay),
        },
    };

    let assignment = RoomAssignment {
        student_id: student,
        move_in_date,
    };
    match ctx.api.assign_room(&session, room_id, &assignment).await {
        Ok(()) => {
            tracing::info!("Assigned room {} to {}", room_id, assignment.student_id);
            ui.alert("Room assigned successfully!");
            load_dashboard(ctx, ui, &session).await;
        }
        Err(e) => {
            tracing::error!("Assigning room {} failed: {}", room_id, e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}

/// Delete after an explicit confirmation. `assume_yes` answers it ahead.
pub async fn delete_room(
    ctx: &Context,
    ui: &mut dyn Ui,
    room_id: &Ident,
    assume_yes: bool,
) -> Result<Navigation> {
    let Some(session) = admin_session(ctx) else {
        return Ok(Navigation::Login);
    };

    if !assume_yes && !ui.confirm(DELETE_CONFIRMATION) {
        return Ok(Navigation::Stay);
    }

    match ctx.api.delete_room(&session, room_id).await {
        Ok(()) => {
            tracing::info!("Deleted room {}", room_id);
            ui.alert("Room deleted successfully!");
            load_dashboard(ctx, ui, &session).await;
        }
        Err(e) => {
            tracing::error!("Deleting room {} failed: {}", room_id, e);
            ui.alert(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}
