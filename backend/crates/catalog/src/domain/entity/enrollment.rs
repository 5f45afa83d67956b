//! Enrollment, Progress, Certificates and Analytics

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, CourseId, EnrollmentId, SectionId, UserId};

/// A student's enrollment in a course
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    /// 0..=100
    pub progress_percent: i32,
    pub completed: bool,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Completion marker for one section
#[derive(Debug, Clone)]
pub struct SectionProgress {
    pub student_id: UserId,
    pub section_id: SectionId,
    pub completed_at: DateTime<Utc>,
}

/// Certificate issued when a course reaches 100% progress
#[derive(Debug, Clone)]
pub struct Certificate {
    pub certificate_id: CertificateId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub issued_at: DateTime<Utc>,
}

/// Aggregate counters per course
#[derive(Debug, Clone)]
pub struct CourseAnalytics {
    pub course_id: CourseId,
    pub enrollment_count: i64,
    /// Fraction of enrolled students who completed the course, 0..=1
    pub completion_rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// Progress percentage over published sections, rounded to the nearest
/// whole percent. 0 when the course has no sections.
pub fn progress_percent(completed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i32
}

impl Enrollment {
    pub fn new(student_id: UserId, course_id: CourseId) -> Self {
        let now = Utc::now();
        Self {
            enrollment_id: EnrollmentId::new(),
            student_id,
            course_id,
            progress_percent: 0,
            completed: false,
            enrolled_at: now,
            updated_at: now,
        }
    }

    /// Recompute progress from section counts. Returns true when this
    /// update finished the course.
    pub fn update_progress(&mut self, completed_sections: i64, total_sections: i64) -> bool {
        let was_completed = self.completed;

        self.progress_percent = progress_percent(completed_sections, total_sections);
        self.completed = self.progress_percent >= 100;
        self.updated_at = Utc::now();

        self.completed && !was_completed
    }
}

impl Certificate {
    pub fn new(student_id: UserId, course_id: CourseId) -> Self {
        Self {
            certificate_id: CertificateId::new(),
            student_id,
            course_id,
            issued_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(1, 8), 13);
    }

    #[test]
    fn empty_course_is_zero_percent() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(5, 0), 0);
    }

    #[test]
    fn completion_fires_once() {
        let mut enrollment = Enrollment::new(UserId::new(), CourseId::new());

        assert!(!enrollment.update_progress(1, 2));
        assert_eq!(enrollment.progress_percent, 50);

        // Crossing 100 reports completion
        assert!(enrollment.update_progress(2, 2));
        assert!(enrollment.completed);

        // Staying at 100 does not fire again
        assert!(!enrollment.update_progress(2, 2));
    }

    #[test]
    fn untoggling_reopens_enrollment() {
        let mut enrollment = Enrollment::new(UserId::new(), CourseId::new());
        enrollment.update_progress(2, 2);
        assert!(enrollment.completed);

        enrollment.update_progress(1, 2);
        assert!(!enrollment.completed);
        assert_eq!(enrollment.progress_percent, 50);
    }
}
