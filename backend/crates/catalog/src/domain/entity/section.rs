//! Section Entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, SectionId, SectionResourceId};

/// Course section (one lesson with an optional hosted video)
#[derive(Debug, Clone)]
pub struct Section {
    pub section_id: SectionId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    /// 1-based order within the course
    pub position: i32,
    /// Free sections are previewable without enrollment
    pub is_free: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial section update
#[derive(Debug, Clone, Default)]
pub struct SectionUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
    pub is_free: Option<bool>,
}

/// Downloadable material attached to a section
#[derive(Debug, Clone)]
pub struct SectionResource {
    pub resource_id: SectionResourceId,
    pub section_id: SectionId,
    pub name: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

impl Section {
    pub fn new(course_id: CourseId, title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            section_id: SectionId::new(),
            course_id,
            title,
            description: None,
            video_url: None,
            position,
            is_free: false,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: SectionUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(video_url) = update.video_url {
            self.video_url = video_url;
        }
        if let Some(is_free) = update.is_free {
            self.is_free = is_free;
        }
        self.updated_at = Utc::now();
    }

    /// What still blocks publication. Empty means publishable.
    pub fn publish_blockers(&self) -> Vec<&'static str> {
        let mut blockers = Vec::new();

        if self.title.trim().is_empty() {
            blockers.push("a title");
        }
        if self.video_url.is_none() {
            blockers.push("a video");
        }

        blockers
    }

    pub fn publish(&mut self) {
        self.is_published = true;
        self.updated_at = Utc::now();
    }

    pub fn unpublish(&mut self) {
        self.is_published = false;
        self.updated_at = Utc::now();
    }
}

impl SectionResource {
    pub fn new(section_id: SectionId, name: String, file_url: String) -> Self {
        Self {
            resource_id: SectionResourceId::new(),
            section_id,
            name,
            file_url,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_needs_video_to_publish() {
        let mut section = Section::new(CourseId::new(), "Intro".to_string(), 1);
        assert_eq!(section.publish_blockers(), vec!["a video"]);

        section.apply(SectionUpdate {
            video_url: Some(Some("https://videos.example.com/raw/intro.mp4".into())),
            ..Default::default()
        });
        assert!(section.publish_blockers().is_empty());
    }

    #[test]
    fn clearing_video_blocks_publish_again() {
        let mut section = Section::new(CourseId::new(), "Intro".to_string(), 1);
        section.apply(SectionUpdate {
            video_url: Some(Some("https://videos.example.com/raw/intro.mp4".into())),
            ..Default::default()
        });
        section.publish();

        section.apply(SectionUpdate {
            video_url: Some(None),
            ..Default::default()
        });
        assert_eq!(section.publish_blockers(), vec!["a video"]);
    }
}
