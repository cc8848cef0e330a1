//! Student dashboard, live watch, and housing application

use std::future::Future;

use anyhow::Result;
use shared::{applications_for, ApplicationRequest, Session};

use super::{Context, Navigation};
use crate::api::APPLICATIONS_FAILED;
use crate::poll::ApplicationPoller;
use crate::ui::Ui;
use crate::views;

const DASHBOARD_LOAD_FAILED: &str = "Failed to load dashboard data. Please try again later.";

pub struct ApplicationForm {
    pub preferred_building: String,
    pub preferred_room_type: String,
    pub move_in_date: String,
    pub special_requirements: String,
}

/// `false` when the record could not be loaded
async fn show_record(ctx: &Context, ui: &mut dyn Ui, session: &Session) -> bool {
    match ctx.api.student_record(&session.id).await {
        Ok(record) => {
            ui.show(&views::student_dashboard(&record));
            true
        }
        Err(e) => {
            tracing::error!("Loading student record failed: {}", e);
            ui.alert(DASHBOARD_LOAD_FAILED);
            false
        }
    }
}

pub async fn dashboard(ctx: &Context, ui: &mut dyn Ui) -> Result<Navigation> {
    let Some(session) = ctx.session() else {
        return Ok(Navigation::Login);
    };

    if !show_record(ctx, ui, &session).await {
        return Ok(Navigation::Stay);
    }

    match ctx.api.applications().await {
        Ok(applications) => {
            let mine = applications_for(applications, &session.id);
            ui.show(&views::application_list(&mine));
        }
        Err(e) => {
            tracing::error!("Loading applications failed: {}", e);
            ui.error(APPLICATIONS_FAILED);
        }
    }
    Ok(Navigation::Stay)
}

/// Dashboard plus a live application list until `shutdown` resolves
pub async fn watch<F>(ctx: &Context, ui: &mut dyn Ui, shutdown: F) -> Result<Navigation>
where
    F: Future<Output = ()>,
{
    let Some(session) = ctx.session() else {
        return Ok(Navigation::Login);
    };

    if !show_record(ctx, ui, &session).await {
        return Ok(Navigation::Stay);
    }

    let (poller, mut updates) =
        ApplicationPoller::spawn(ctx.api.clone(), session.id.clone(), ctx.poll_interval);
    tracing::info!(
        "Watching applications every {}s",
        ctx.poll_interval.as_secs_f64()
    );

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            update = updates.recv() => match update {
                Some(Ok(applications)) => ui.show(&views::application_list(&applications)),
                Some(Err(_)) => ui.error(APPLICATIONS_FAILED),
                None => break,
            },
        }
    }

    poller.stop().await;
    Ok(Navigation::Stay)
}

pub async fn apply(ctx: &Context, ui: &mut dyn Ui, form: ApplicationForm) -> Result<Navigation> {
    let Some(session) = ctx.session() else {
        return Ok(Navigation::Login);
    };

    let request = ApplicationRequest {
        student_id: session.id.clone(),
        preferred_building: form.preferred_building,
        preferred_room_type: form.preferred_room_type,
        move_in_date: form.move_in_date,
        special_requirements: form.special_requirements,
    };

    match ctx.api.submit_application(&request).await {
        Ok(()) => {
            ui.alert("Application submitted successfully!");
            Ok(Navigation::StudentDashboard)
        }
        Err(e) => {
            tracing::error!("Submitting application failed: {}", e);
            ui.alert(&e.to_string());
            Ok(Navigation::Stay)
        }
    }
}
