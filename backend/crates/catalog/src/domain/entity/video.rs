//! Video Asset Entity
//!
//! Links a section to its asset on the external video host.

use chrono::{DateTime, Utc};
use kernel::id::SectionId;

#[derive(Debug, Clone)]
pub struct VideoAsset {
    pub section_id: SectionId,
    /// Asset id on the external host
    pub asset_id: String,
    /// Playback id for the player, when the host has produced one
    pub playback_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VideoAsset {
    pub fn new(section_id: SectionId, asset_id: String, playback_id: Option<String>) -> Self {
        Self {
            section_id,
            asset_id,
            playback_id,
            created_at: Utc::now(),
        }
    }
}
