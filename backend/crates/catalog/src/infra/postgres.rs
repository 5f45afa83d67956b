//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{
    CategoryId, CertificateId, CourseId, DepartmentId, EnrollmentId, SectionId,
    SectionResourceId, SubCategoryId, UserId,
};
use kernel::page::SortOrder;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::category::{Category, CategoryTree, SubCategory};
use crate::domain::entity::course::{Course, CourseLevel};
use crate::domain::entity::department::Department;
use crate::domain::entity::enrollment::{CourseAnalytics, Enrollment};
use crate::domain::entity::section::{Section, SectionResource};
use crate::domain::entity::video::VideoAsset;
use crate::domain::repository::{
    CategoryRepository, CourseFilter, CourseRepository, CourseSort, DepartmentRepository,
    EnrollmentRepository, SectionRepository, SectionResourceRepository, VideoAssetRepository,
};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Departments and Categories
// ============================================================================

impl DepartmentRepository for PgCatalogRepository {
    async fn list(&self) -> CatalogResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            "SELECT department_id, name, code, created_at FROM departments ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DepartmentRow::into_department).collect())
    }

    async fn create(&self, department: &Department) -> CatalogResult<()> {
        sqlx::query(
            "INSERT INTO departments (department_id, name, code, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(department.department_id.as_uuid())
        .bind(&department.name)
        .bind(&department.code)
        .bind(department.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists(&self, department_id: &DepartmentId) -> CatalogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE department_id = $1)",
        )
        .bind(department_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

impl CategoryRepository for PgCatalogRepository {
    async fn list_tree(&self) -> CatalogResult<Vec<CategoryTree>> {
        let categories = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, name FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let subs = sqlx::query_as::<_, SubCategoryRow>(
            "SELECT sub_category_id, category_id, name FROM sub_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tree: Vec<CategoryTree> = categories
            .into_iter()
            .map(|c| CategoryTree {
                category: c.into_category(),
                sub_categories: Vec::new(),
            })
            .collect();

        for sub in subs {
            let sub = sub.into_sub_category();
            if let Some(node) = tree
                .iter_mut()
                .find(|n| n.category.category_id == sub.category_id)
            {
                node.sub_categories.push(sub);
            }
        }

        Ok(tree)
    }
}

// ============================================================================
// Courses
// ============================================================================

fn push_course_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CourseFilter) {
    builder.push(" WHERE TRUE");

    if let Some(department_id) = &filter.department_id {
        builder.push(" AND department_id = ");
        builder.push_bind(*department_id.as_uuid());
    }
    if let Some(category_id) = &filter.category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(*category_id.as_uuid());
    }
    if let Some(level) = filter.level {
        builder.push(" AND level = ");
        builder.push_bind(level.id());
    }
    if let Some(instructor_id) = &filter.instructor_id {
        builder.push(" AND instructor_id = ");
        builder.push_bind(*instructor_id.as_uuid());
    }
    if filter.published_only {
        builder.push(" AND is_published");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR subtitle ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

const COURSE_COLUMNS: &str = r#"
    course_id,
    instructor_id,
    title,
    subtitle,
    description,
    image_url,
    price,
    level,
    department_id,
    category_id,
    sub_category_id,
    is_published,
    created_at,
    updated_at
"#;

impl CourseRepository for PgCatalogRepository {
    async fn create(&self, course: &Course) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                course_id,
                instructor_id,
                title,
                subtitle,
                description,
                image_url,
                price,
                level,
                department_id,
                category_id,
                sub_category_id,
                is_published,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(course.instructor_id.as_uuid())
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(&course.image_url)
        .bind(course.price)
        .bind(course.level.id())
        .bind(course.department_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.sub_category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.is_published)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, course_id: &CourseId) -> CatalogResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = $1"
        ))
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_course()).transpose()
    }

    async fn list(
        &self,
        filter: &CourseFilter,
        sort: CourseSort,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<(Vec<Course>, i64)> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        push_course_filter(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {COURSE_COLUMNS} FROM courses"));
        push_course_filter(&mut builder, filter);

        // The sort column comes from a static allow-list, never from input
        builder.push(format!(
            " ORDER BY {} {} LIMIT ",
            sort.column,
            sort.order.as_sql()
        ));
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows: Vec<CourseRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let courses = rows
            .into_iter()
            .map(CourseRow::into_course)
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok((courses, total))
    }

    async fn update(&self, course: &Course) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                subtitle = $3,
                description = $4,
                image_url = $5,
                price = $6,
                level = $7,
                department_id = $8,
                category_id = $9,
                sub_category_id = $10,
                is_published = $11,
                updated_at = $12
            WHERE course_id = $1
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(&course.image_url)
        .bind(course.price)
        .bind(course.level.id())
        .bind(course.department_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.sub_category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(course.is_published)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, course_id: &CourseId) -> CatalogResult<()> {
        sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

const SECTION_COLUMNS: &str = r#"
    section_id,
    course_id,
    title,
    description,
    video_url,
    "position",
    is_free,
    is_published,
    created_at,
    updated_at
"#;

impl SectionRepository for PgCatalogRepository {
    async fn create(&self, section: &Section) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sections (
                section_id,
                course_id,
                title,
                description,
                video_url,
                "position",
                is_free,
                is_published,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(section.section_id.as_uuid())
        .bind(section.course_id.as_uuid())
        .bind(&section.title)
        .bind(&section.description)
        .bind(&section.video_url)
        .bind(section.position)
        .bind(section.is_free)
        .bind(section.is_published)
        .bind(section.created_at)
        .bind(section.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, section_id: &SectionId) -> CatalogResult<Option<Section>> {
        let row = sqlx::query_as::<_, SectionRow>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE section_id = $1"
        ))
        .bind(section_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SectionRow::into_section))
    }

    async fn list_by_course(
        &self,
        course_id: &CourseId,
        published_only: bool,
    ) -> CatalogResult<Vec<Section>> {
        let sql = if published_only {
            format!(
                "SELECT {SECTION_COLUMNS} FROM sections WHERE course_id = $1 AND is_published ORDER BY \"position\""
            )
        } else {
            format!(
                "SELECT {SECTION_COLUMNS} FROM sections WHERE course_id = $1 ORDER BY \"position\""
            )
        };

        let rows = sqlx::query_as::<_, SectionRow>(&sql)
            .bind(course_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SectionRow::into_section).collect())
    }

    async fn update(&self, section: &Section) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE sections SET
                title = $2,
                description = $3,
                video_url = $4,
                "position" = $5,
                is_free = $6,
                is_published = $7,
                updated_at = $8
            WHERE section_id = $1
            "#,
        )
        .bind(section.section_id.as_uuid())
        .bind(&section.title)
        .bind(&section.description)
        .bind(&section.video_url)
        .bind(section.position)
        .bind(section.is_free)
        .bind(section.is_published)
        .bind(section.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, section_id: &SectionId) -> CatalogResult<()> {
        sqlx::query("DELETE FROM sections WHERE section_id = $1")
            .bind(section_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn max_position(&self, course_id: &CourseId) -> CatalogResult<i32> {
        let max: Option<i32> = sqlx::query_scalar(
            r#"SELECT MAX("position") FROM sections WHERE course_id = $1"#,
        )
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0))
    }

    async fn count_published(&self, course_id: &CourseId) -> CatalogResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sections WHERE course_id = $1 AND is_published",
        )
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn reorder(
        &self,
        course_id: &CourseId,
        positions: &[(SectionId, i32)],
    ) -> CatalogResult<u64> {
        let mut updated = 0;

        for (section_id, position) in positions {
            updated += sqlx::query(
                r#"UPDATE sections SET "position" = $3, updated_at = NOW() WHERE section_id = $1 AND course_id = $2"#,
            )
            .bind(section_id.as_uuid())
            .bind(course_id.as_uuid())
            .bind(position)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }

        Ok(updated)
    }
}

impl SectionResourceRepository for PgCatalogRepository {
    async fn create(&self, resource: &SectionResource) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO section_resources (resource_id, section_id, name, file_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resource.resource_id.as_uuid())
        .bind(resource.section_id.as_uuid())
        .bind(&resource.name)
        .bind(&resource.file_url)
        .bind(resource.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        resource_id: &SectionResourceId,
    ) -> CatalogResult<Option<SectionResource>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "SELECT resource_id, section_id, name, file_url, created_at FROM section_resources WHERE resource_id = $1",
        )
        .bind(resource_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResourceRow::into_resource))
    }

    async fn list_by_section(
        &self,
        section_id: &SectionId,
    ) -> CatalogResult<Vec<SectionResource>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            "SELECT resource_id, section_id, name, file_url, created_at FROM section_resources WHERE section_id = $1 ORDER BY created_at",
        )
        .bind(section_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ResourceRow::into_resource).collect())
    }

    async fn delete(&self, resource_id: &SectionResourceId) -> CatalogResult<()> {
        sqlx::query("DELETE FROM section_resources WHERE resource_id = $1")
            .bind(resource_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Video assets
// ============================================================================

impl VideoAssetRepository for PgCatalogRepository {
    async fn upsert(&self, asset: &VideoAsset) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO video_assets (section_id, asset_id, playback_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (section_id) DO UPDATE SET
                asset_id = EXCLUDED.asset_id,
                playback_id = EXCLUDED.playback_id,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(asset.section_id.as_uuid())
        .bind(&asset.asset_id)
        .bind(&asset.playback_id)
        .bind(asset.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_section(&self, section_id: &SectionId) -> CatalogResult<Option<VideoAsset>> {
        let row = sqlx::query_as::<_, VideoAssetRow>(
            "SELECT section_id, asset_id, playback_id, created_at FROM video_assets WHERE section_id = $1",
        )
        .bind(section_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VideoAssetRow::into_asset))
    }

    async fn delete_by_section(&self, section_id: &SectionId) -> CatalogResult<()> {
        sqlx::query("DELETE FROM video_assets WHERE section_id = $1")
            .bind(section_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_course(&self, course_id: &CourseId) -> CatalogResult<Vec<VideoAsset>> {
        let rows = sqlx::query_as::<_, VideoAssetRow>(
            r#"
            SELECT v.section_id, v.asset_id, v.playback_id, v.created_at
            FROM video_assets v
            JOIN sections s ON s.section_id = v.section_id
            WHERE s.course_id = $1
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoAssetRow::into_asset).collect())
    }
}

// ============================================================================
// Enrollments, progress, certificates, analytics
// ============================================================================

impl EnrollmentRepository for PgCatalogRepository {
    async fn create(&self, enrollment: &Enrollment) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (
                enrollment_id, student_id, course_id,
                progress_percent, completed, enrolled_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(enrollment.enrollment_id.as_uuid())
        .bind(enrollment.student_id.as_uuid())
        .bind(enrollment.course_id.as_uuid())
        .bind(enrollment.progress_percent)
        .bind(enrollment.completed)
        .bind(enrollment.enrolled_at)
        .bind(enrollment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                CatalogError::AlreadyEnrolled
            }
            _ => CatalogError::Database(e),
        })?;

        Ok(())
    }

    async fn find(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT enrollment_id, student_id, course_id,
                   progress_percent, completed, enrolled_at, updated_at
            FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EnrollmentRow::into_enrollment))
    }

    async fn exists(&self, student_id: &UserId, course_id: &CourseId) -> CatalogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> CatalogResult<Vec<(Enrollment, Course)>> {
        let rows = sqlx::query_as::<_, EnrolledCourseRow>(
            r#"
            SELECT
                e.enrollment_id, e.student_id, e.course_id,
                e.progress_percent, e.completed, e.enrolled_at, e.updated_at,
                c.instructor_id, c.title, c.subtitle, c.description, c.image_url,
                c.price, c.level, c.department_id, c.category_id, c.sub_category_id,
                c.is_published, c.created_at AS course_created_at,
                c.updated_at AS course_updated_at
            FROM enrollments e
            JOIN courses c ON c.course_id = e.course_id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(student_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EnrolledCourseRow::into_pair).collect()
    }

    async fn update(&self, enrollment: &Enrollment) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE enrollments SET
                progress_percent = $2,
                completed = $3,
                updated_at = $4
            WHERE enrollment_id = $1
            "#,
        )
        .bind(enrollment.enrollment_id.as_uuid())
        .bind(enrollment.progress_percent)
        .bind(enrollment.completed)
        .bind(enrollment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn toggle_section_progress(
        &self,
        student_id: &UserId,
        section_id: &SectionId,
    ) -> CatalogResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM section_progress WHERE student_id = $1 AND section_id = $2",
        )
        .bind(student_id.as_uuid())
        .bind(section_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO section_progress (student_id, section_id, completed_at) VALUES ($1, $2, NOW())",
        )
        .bind(student_id.as_uuid())
        .bind(section_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    async fn count_completed_sections(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM section_progress p
            JOIN sections s ON s.section_id = p.section_id
            WHERE p.student_id = $1 AND s.course_id = $2 AND s.is_published
            "#,
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn issue_certificate(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO certificates (certificate_id, student_id, course_id, issued_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (student_id, course_id) DO NOTHING
            "#,
        )
        .bind(CertificateId::new().as_uuid())
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_enrollment_count(&self, course_id: &CourseId) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO course_analytics (course_id, enrollment_count, completion_rate, updated_at)
            VALUES ($1, 1, 0, NOW())
            ON CONFLICT (course_id) DO UPDATE SET
                enrollment_count = course_analytics.enrollment_count + 1,
                updated_at = NOW()
            "#,
        )
        .bind(course_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn refresh_completion_rate(&self, course_id: &CourseId) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO course_analytics (course_id, enrollment_count, completion_rate, updated_at)
            VALUES (
                $1,
                (SELECT COUNT(*) FROM enrollments WHERE course_id = $1),
                COALESCE((
                    SELECT AVG(CASE WHEN completed THEN 1.0 ELSE 0.0 END)
                    FROM enrollments WHERE course_id = $1
                ), 0),
                NOW()
            )
            ON CONFLICT (course_id) DO UPDATE SET
                completion_rate = EXCLUDED.completion_rate,
                updated_at = NOW()
            "#,
        )
        .bind(course_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn analytics(&self, course_id: &CourseId) -> CatalogResult<Option<CourseAnalytics>> {
        let row = sqlx::query_as::<_, AnalyticsRow>(
            "SELECT course_id, enrollment_count, completion_rate, updated_at FROM course_analytics WHERE course_id = $1",
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AnalyticsRow::into_analytics))
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    department_id: Uuid,
    name: String,
    code: Option<String>,
    created_at: DateTime<Utc>,
}

impl DepartmentRow {
    fn into_department(self) -> Department {
        Department {
            department_id: DepartmentId::from_uuid(self.department_id),
            name: self.name,
            code: self.code,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubCategoryRow {
    sub_category_id: Uuid,
    category_id: Uuid,
    name: String,
}

impl SubCategoryRow {
    fn into_sub_category(self) -> SubCategory {
        SubCategory {
            sub_category_id: SubCategoryId::from_uuid(self.sub_category_id),
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    instructor_id: Uuid,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    price: f64,
    level: i16,
    department_id: Option<Uuid>,
    category_id: Option<Uuid>,
    sub_category_id: Option<Uuid>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> CatalogResult<Course> {
        let level = CourseLevel::try_from_id(self.level)
            .ok_or_else(|| CatalogError::Internal(format!("Invalid level: {}", self.level)))?;

        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            instructor_id: UserId::from_uuid(self.instructor_id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            level,
            department_id: self.department_id.map(DepartmentId::from_uuid),
            category_id: self.category_id.map(CategoryId::from_uuid),
            sub_category_id: self.sub_category_id.map(SubCategoryId::from_uuid),
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SectionRow {
    section_id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    video_url: Option<String>,
    position: i32,
    is_free: bool,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SectionRow {
    fn into_section(self) -> Section {
        Section {
            section_id: SectionId::from_uuid(self.section_id),
            course_id: CourseId::from_uuid(self.course_id),
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            position: self.position,
            is_free: self.is_free,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResourceRow {
    resource_id: Uuid,
    section_id: Uuid,
    name: String,
    file_url: String,
    created_at: DateTime<Utc>,
}

impl ResourceRow {
    fn into_resource(self) -> SectionResource {
        SectionResource {
            resource_id: SectionResourceId::from_uuid(self.resource_id),
            section_id: SectionId::from_uuid(self.section_id),
            name: self.name,
            file_url: self.file_url,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VideoAssetRow {
    section_id: Uuid,
    asset_id: String,
    playback_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl VideoAssetRow {
    fn into_asset(self) -> VideoAsset {
        VideoAsset {
            section_id: SectionId::from_uuid(self.section_id),
            asset_id: self.asset_id,
            playback_id: self.playback_id,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    enrollment_id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    progress_percent: i32,
    completed: bool,
    enrolled_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn into_enrollment(self) -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId::from_uuid(self.enrollment_id),
            student_id: UserId::from_uuid(self.student_id),
            course_id: CourseId::from_uuid(self.course_id),
            progress_percent: self.progress_percent,
            completed: self.completed,
            enrolled_at: self.enrolled_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrolledCourseRow {
    enrollment_id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    progress_percent: i32,
    completed: bool,
    enrolled_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    instructor_id: Uuid,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    price: f64,
    level: i16,
    department_id: Option<Uuid>,
    category_id: Option<Uuid>,
    sub_category_id: Option<Uuid>,
    is_published: bool,
    course_created_at: DateTime<Utc>,
    course_updated_at: DateTime<Utc>,
}

impl EnrolledCourseRow {
    fn into_pair(self) -> CatalogResult<(Enrollment, Course)> {
        let level = CourseLevel::try_from_id(self.level)
            .ok_or_else(|| CatalogError::Internal(format!("Invalid level: {}", self.level)))?;

        let enrollment = Enrollment {
            enrollment_id: EnrollmentId::from_uuid(self.enrollment_id),
            student_id: UserId::from_uuid(self.student_id),
            course_id: CourseId::from_uuid(self.course_id),
            progress_percent: self.progress_percent,
            completed: self.completed,
            enrolled_at: self.enrolled_at,
            updated_at: self.updated_at,
        };

        let course = Course {
            course_id: CourseId::from_uuid(self.course_id),
            instructor_id: UserId::from_uuid(self.instructor_id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            level,
            department_id: self.department_id.map(DepartmentId::from_uuid),
            category_id: self.category_id.map(CategoryId::from_uuid),
            sub_category_id: self.sub_category_id.map(SubCategoryId::from_uuid),
            is_published: self.is_published,
            created_at: self.course_created_at,
            updated_at: self.course_updated_at,
        };

        Ok((enrollment, course))
    }
}

#[derive(sqlx::FromRow)]
struct AnalyticsRow {
    course_id: Uuid,
    enrollment_count: i64,
    completion_rate: f64,
    updated_at: DateTime<Utc>,
}

impl AnalyticsRow {
    fn into_analytics(self) -> CourseAnalytics {
        CourseAnalytics {
            course_id: CourseId::from_uuid(self.course_id),
            enrollment_count: self.enrollment_count,
            completion_rate: self.completion_rate,
            updated_at: self.updated_at,
        }
    }
}
