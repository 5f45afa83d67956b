//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::actor::UserRole;
use kernel::id::{DepartmentId, UserId};
use platform::password::StoredPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, person_name::PersonName};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    password_hash,
    first_name,
    last_name,
    user_role,
    image_url,
    department_id,
    bio,
    year,
    branch,
    enrollment_number,
    designation,
    specialization,
    faculty_id,
    onboarded,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                first_name,
                last_name,
                user_role,
                image_url,
                department_id,
                bio,
                year,
                branch,
                enrollment_number,
                designation,
                specialization,
                faculty_id,
                onboarded,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.role.id())
        .bind(&user.image_url)
        .bind(user.department_id.as_ref().map(|id| *id.as_uuid()))
        .bind(&user.bio)
        .bind(&user.year)
        .bind(&user.branch)
        .bind(&user.enrollment_number)
        .bind(&user.designation)
        .bind(&user.specialization)
        .bind(&user.faculty_id)
        .bind(user.onboarded)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                first_name = $4,
                last_name = $5,
                user_role = $6,
                image_url = $7,
                department_id = $8,
                bio = $9,
                year = $10,
                branch = $11,
                enrollment_number = $12,
                designation = $13,
                specialization = $14,
                faculty_id = $15,
                onboarded = $16,
                updated_at = $17
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.role.id())
        .bind(&user.image_url)
        .bind(user.department_id.as_ref().map(|id| *id.as_uuid()))
        .bind(&user.bio)
        .bind(&user.year)
        .bind(&user.branch)
        .bind(&user.enrollment_number)
        .bind(&user.designation)
        .bind(&user.specialization)
        .bind(&user.faculty_id)
        .bind(user.onboarded)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    user_role: i16,
    image_url: Option<String>,
    department_id: Option<Uuid>,
    bio: Option<String>,
    year: Option<String>,
    branch: Option<String>,
    enrollment_number: Option<String>,
    designation: Option<String>,
    specialization: Option<String>,
    faculty_id: Option<String>,
    onboarded: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::try_from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        let password = StoredPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password,
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            role,
            image_url: self.image_url,
            department_id: self.department_id.map(DepartmentId::from_uuid),
            bio: self.bio,
            year: self.year,
            branch: self.branch,
            enrollment_number: self.enrollment_number,
            designation: self.designation,
            specialization: self.specialization,
            faculty_id: self.faculty_id,
            onboarded: self.onboarded,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
