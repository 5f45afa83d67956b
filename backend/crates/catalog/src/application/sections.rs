//! Section Use Cases
//!
//! Section CRUD with the publish cascade, reordering, resources and
//! hosted-video bookkeeping. Where several repository traits share a
//! method name, calls are fully qualified.

use std::sync::Arc;

use kernel::actor::{CurrentUser, MaybeUser};
use kernel::error::app_error::FieldError;
use kernel::id::{CourseId, SectionId, SectionResourceId};

use crate::domain::entity::course::Course;
use crate::domain::entity::section::{Section, SectionResource, SectionUpdate};
use crate::domain::entity::video::VideoAsset;
use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, SectionRepository, SectionResourceRepository,
    VideoAssetRepository,
};
use crate::error::{CatalogError, CatalogResult};
use crate::infra::video::VideoHost;

/// A section with its attached material and playback id
pub struct SectionDetail {
    pub section: Section,
    pub resources: Vec<SectionResource>,
    pub playback_id: Option<String>,
}

pub struct SectionUseCase<R, V> {
    repo: Arc<R>,
    host: Arc<V>,
}

impl<R, V> SectionUseCase<R, V>
where
    R: SectionRepository
        + CourseRepository
        + VideoAssetRepository
        + SectionResourceRepository
        + EnrollmentRepository,
    V: VideoHost + Sync,
{
    pub fn new(repo: Arc<R>, host: Arc<V>) -> Self {
        Self { repo, host }
    }

    /// Sections of a course. Owner and admins see drafts, everyone else
    /// sees published sections of a visible course.
    pub async fn list(
        &self,
        viewer: &MaybeUser,
        course_id: &CourseId,
    ) -> CatalogResult<Vec<Section>> {
        let course = self.require_course(course_id).await?;

        let is_owner = viewer
            .as_ref()
            .map(|u| u.owns_or_admin(course.instructor_id))
            .unwrap_or(false);

        if !course.is_published && !is_owner {
            return Err(CatalogError::CourseNotFound);
        }

        SectionRepository::list_by_course(&*self.repo, course_id, !is_owner).await
    }

    /// Create a section at the end of the course
    pub async fn create(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
        title: String,
    ) -> CatalogResult<Section> {
        self.require_owned_course(actor, course_id).await?;

        let position = SectionRepository::max_position(&*self.repo, course_id).await? + 1;
        let section = Section::new(*course_id, title, position);

        SectionRepository::create(&*self.repo, &section).await?;

        tracing::info!(section_id = %section.section_id, "Section created");
        Ok(section)
    }

    /// Fetch one section with resources and playback info.
    ///
    /// Drafts are restricted to the owner; paid sections additionally
    /// require enrollment for non-staff viewers.
    pub async fn get(
        &self,
        viewer: &MaybeUser,
        section_id: &SectionId,
    ) -> CatalogResult<SectionDetail> {
        let section = self.require_section(section_id).await?;
        let course = self.require_course(&section.course_id).await?;

        let is_owner = viewer
            .as_ref()
            .map(|u| u.owns_or_admin(course.instructor_id))
            .unwrap_or(false);

        if !is_owner {
            if !section.is_published || !course.is_published {
                return Err(CatalogError::SectionNotFound);
            }
            if !section.is_free {
                let enrolled = match viewer.as_ref() {
                    Some(user) => {
                        EnrollmentRepository::exists(&*self.repo, &user.id, &course.course_id)
                            .await?
                    }
                    None => false,
                };
                if !enrolled {
                    return Err(CatalogError::EnrollmentRequired);
                }
            }
        }

        let resources =
            SectionResourceRepository::list_by_section(&*self.repo, section_id).await?;
        let playback_id = VideoAssetRepository::find_by_section(&*self.repo, section_id)
            .await?
            .and_then(|a| a.playback_id);

        Ok(SectionDetail {
            section,
            resources,
            playback_id,
        })
    }

    /// Update a section. A changed video URL swaps the hosted asset;
    /// a cleared URL drops it.
    pub async fn update(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
        update: SectionUpdate,
    ) -> CatalogResult<Section> {
        let mut section = self.require_section(section_id).await?;
        self.require_owned_course(actor, &section.course_id).await?;

        let video_change = update.video_url.clone();
        let old_url = section.video_url.clone();

        section.apply(update);
        SectionRepository::update(&*self.repo, &section).await?;

        if let Some(new_url) = video_change {
            if new_url != old_url {
                self.swap_hosted_asset(section_id, new_url.as_deref()).await;
            }
        }

        Ok(section)
    }

    /// Delete a section and its hosted asset. Removing the last
    /// published section unpublishes the course.
    pub async fn delete(&self, actor: &CurrentUser, section_id: &SectionId) -> CatalogResult<()> {
        let section = self.require_section(section_id).await?;
        let course = self.require_owned_course(actor, &section.course_id).await?;

        self.swap_hosted_asset(section_id, None).await;
        SectionRepository::delete(&*self.repo, section_id).await?;

        self.unpublish_course_if_empty(course).await?;

        tracing::info!(section_id = %section_id, "Section deleted");
        Ok(())
    }

    pub async fn publish(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
    ) -> CatalogResult<Section> {
        let mut section = self.require_section(section_id).await?;
        self.require_owned_course(actor, &section.course_id).await?;

        let blockers = section.publish_blockers();
        if !blockers.is_empty() {
            return Err(CatalogError::SectionPublishBlocked(format!(
                "the section needs {}",
                blockers.join(", ")
            )));
        }

        section.publish();
        SectionRepository::update(&*self.repo, &section).await?;

        Ok(section)
    }

    /// Unpublish a section; unpublishing the last published section
    /// cascades to the course.
    pub async fn unpublish(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
    ) -> CatalogResult<Section> {
        let mut section = self.require_section(section_id).await?;
        let course = self.require_owned_course(actor, &section.course_id).await?;

        section.unpublish();
        SectionRepository::update(&*self.repo, &section).await?;

        self.unpublish_course_if_empty(course).await?;

        Ok(section)
    }

    /// Bulk position update. Every id must belong to the course.
    pub async fn reorder(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
        positions: Vec<(SectionId, i32)>,
    ) -> CatalogResult<()> {
        self.require_owned_course(actor, course_id).await?;

        let sections = SectionRepository::list_by_course(&*self.repo, course_id, false).await?;
        let known: std::collections::HashSet<SectionId> =
            sections.iter().map(|s| s.section_id).collect();

        if positions.iter().any(|(id, _)| !known.contains(id)) {
            return Err(CatalogError::Validation(vec![FieldError::new(
                "sections",
                "Every section must belong to this course",
            )]));
        }

        SectionRepository::reorder(&*self.repo, course_id, &positions).await?;
        Ok(())
    }

    pub async fn add_resource(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
        name: String,
        file_url: String,
    ) -> CatalogResult<SectionResource> {
        let section = self.require_section(section_id).await?;
        self.require_owned_course(actor, &section.course_id).await?;

        let resource = SectionResource::new(*section_id, name, file_url);
        SectionResourceRepository::create(&*self.repo, &resource).await?;

        Ok(resource)
    }

    pub async fn delete_resource(
        &self,
        actor: &CurrentUser,
        resource_id: &SectionResourceId,
    ) -> CatalogResult<()> {
        let resource = SectionResourceRepository::find_by_id(&*self.repo, resource_id)
            .await?
            .ok_or(CatalogError::ResourceNotFound)?;

        let section = self.require_section(&resource.section_id).await?;
        self.require_owned_course(actor, &section.course_id).await?;

        SectionResourceRepository::delete(&*self.repo, resource_id).await?;
        Ok(())
    }

    /// Replace the hosted asset for a section: delete whatever exists,
    /// then ingest the new source if there is one. Host failures are
    /// logged and swallowed; the catalog row state stays consistent.
    async fn swap_hosted_asset(&self, section_id: &SectionId, new_url: Option<&str>) {
        let existing = match VideoAssetRepository::find_by_section(&*self.repo, section_id).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(error = %e, "Video asset lookup failed");
                return;
            }
        };

        if let Some(asset) = existing {
            if let Err(e) = self.host.delete_asset(&asset.asset_id).await {
                tracing::warn!(error = %e, asset_id = %asset.asset_id, "Hosted asset deletion failed");
            }
            if let Err(e) = VideoAssetRepository::delete_by_section(&*self.repo, section_id).await
            {
                tracing::warn!(error = %e, "Video asset row deletion failed");
            }
        }

        let Some(url) = new_url else { return };

        match self.host.create_asset(url).await {
            Ok(Some(hosted)) => {
                let asset = VideoAsset::new(*section_id, hosted.asset_id, hosted.playback_id);
                if let Err(e) = VideoAssetRepository::upsert(&*self.repo, &asset).await {
                    tracing::warn!(error = %e, "Video asset row upsert failed");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Video ingestion failed, section keeps raw URL");
            }
        }
    }

    /// Unpublish the course when no published sections remain
    async fn unpublish_course_if_empty(&self, mut course: Course) -> CatalogResult<()> {
        if !course.is_published {
            return Ok(());
        }

        let remaining = SectionRepository::count_published(&*self.repo, &course.course_id).await?;
        if remaining == 0 {
            course.unpublish();
            CourseRepository::update(&*self.repo, &course).await?;
            tracing::info!(
                course_id = %course.course_id,
                "Course unpublished, no published sections remain"
            );
        }

        Ok(())
    }

    async fn require_course(&self, course_id: &CourseId) -> CatalogResult<Course> {
        CourseRepository::find_by_id(&*self.repo, course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)
    }

    async fn require_owned_course(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> CatalogResult<Course> {
        let course = self.require_course(course_id).await?;

        if !actor.owns_or_admin(course.instructor_id) {
            return Err(CatalogError::Forbidden);
        }

        Ok(course)
    }

    async fn require_section(&self, section_id: &SectionId) -> CatalogResult<Section> {
        SectionRepository::find_by_id(&*self.repo, section_id)
            .await?
            .ok_or(CatalogError::SectionNotFound)
    }
}
