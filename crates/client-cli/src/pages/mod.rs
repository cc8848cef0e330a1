//! Page controllers. Each one reads its form, makes its API calls, renders
//! through `views`, and hands back where to go next.

pub mod admin;
pub mod auth;
pub mod rooms;
pub mod student;

use std::time::Duration;

use anyhow::Result;
use shared::Session;

use crate::api::ApiClient;
use crate::session::SessionStore;
use crate::ui::Ui;

/// Everything a page needs besides its form
pub struct Context {
    pub api: ApiClient,
    pub sessions: SessionStore,
    pub poll_interval: Duration,
}

impl Context {
    /// The stored session, read once per command
    pub fn session(&self) -> Option<Session> {
        self.sessions.get()
    }
}

/// Where a page hands control after it finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Home,
    Login,
    StudentDashboard,
    AdminDashboard,
}

/// Render the pages a navigation chain leads to
pub async fn follow(ctx: &Context, ui: &mut dyn Ui, mut nav: Navigation) -> Result<()> {
    loop {
        nav = match nav {
            Navigation::Stay => return Ok(()),
            Navigation::Home => {
                ui.show("Run 'hostel rooms' to browse rooms or 'hostel login' to sign in.");
                return Ok(());
            }
            Navigation::Login => {
                ui.show("Not logged in. Run 'hostel login' to authenticate.");
                return Ok(());
            }
            Navigation::StudentDashboard => student::dashboard(ctx, ui).await?,
            Navigation::AdminDashboard => admin::dashboard(ctx, ui).await?,
        };
    }
}
