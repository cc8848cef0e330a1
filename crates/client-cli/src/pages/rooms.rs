//! Public room listing

use anyhow::Result;
use shared::Room;

use super::{Context, Navigation};
use crate::ui::Ui;
use crate::views;

/// Client-side filter over `GET /rooms`. Text matches ignore case.
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub available_only: bool,
    pub building: Option<String>,
    pub room_type: Option<String>,
}

fn same(field: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => field.is_some_and(|f| f.trim().eq_ignore_ascii_case(wanted.trim())),
    }
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        (!self.available_only || room.status.is_available())
            && same(room.building.as_deref(), self.building.as_deref())
            && same(room.room_type.as_deref(), self.room_type.as_deref())
    }

    pub fn apply(&self, rooms: Vec<Room>) -> Vec<Room> {
        rooms.into_iter().filter(|r| self.matches(r)).collect()
    }
}

pub async fn list(ctx: &Context, ui: &mut dyn Ui, filter: &RoomFilter) -> Result<Navigation> {
    match ctx.api.rooms().await {
        Ok(rooms) => {
            let total = rooms.len();
            let shown = filter.apply(rooms);
            tracing::debug!("Showing {} of {} rooms", shown.len(), total);
            ui.show(&views::room_list(&shown));
        }
        Err(e) => {
            tracing::error!("Loading rooms failed: {}", e);
            ui.error(&e.to_string());
        }
    }
    Ok(Navigation::Stay)
}
