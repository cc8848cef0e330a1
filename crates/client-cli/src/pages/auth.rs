//! Login, registration, logout

use anyhow::Result;
use shared::{Credentials, Registration};

use super::{Context, Navigation};
use crate::ui::Ui;
use crate::views;

pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Store the returned session and route by role
pub async fn login(ctx: &Context, ui: &mut dyn Ui, form: LoginForm) -> Result<Navigation> {
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };

    let session = match ctx.api.login(&credentials).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            ui.alert(&e.to_string());
            return Ok(Navigation::Stay);
        }
    };

    ctx.sessions.set(&session)?;
    tracing::info!("Logged in as {} ({})", session.id, session.role);
    ui.alert("Login successful!");

    if session.is_admin() {
        Ok(Navigation::AdminDashboard)
    } else {
        Ok(Navigation::StudentDashboard)
    }
}

pub async fn register(ctx: &Context, ui: &mut dyn Ui, form: RegisterForm) -> Result<Navigation> {
    if form.password != form.confirm_password {
        ui.error("Passwords do not match");
        return Ok(Navigation::Stay);
    }

    let registration = Registration {
        name: form.name,
        email: form.email,
        password: form.password,
        student_id: form.student_id,
        phone: form.phone,
        address: form.address,
    };

    match ctx.api.register(&registration).await {
        Ok(()) => {
            ui.alert("Registration successful! Please login.");
            Ok(Navigation::Login)
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            ui.error(&e.to_string());
            Ok(Navigation::Stay)
        }
    }
}

pub fn logout(ctx: &Context, ui: &mut dyn Ui) -> Result<Navigation> {
    ctx.sessions.clear()?;
    ui.alert("Logged out");
    Ok(Navigation::Home)
}

pub fn whoami(ctx: &Context, ui: &mut dyn Ui) -> Navigation {
    match ctx.session() {
        Some(session) => {
            ui.show(&views::session_summary(&session));
            Navigation::Stay
        }
        None => Navigation::Login,
    }
}
