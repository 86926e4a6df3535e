//! GPA aggregator.
//!
//! `students.gpa` is written only here, always from a full recomputation
//! over the student's graded ledger rows.

use chrono::Utc;

use reg_core::enums::{AuditAction, EnrollmentStatus, EntityType};
use reg_core::gpa::{GpaInput, GpaSummary};
use reg_core::identity::Principal;
use reg_core::responses::{GpaResponse, StudentSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_u32, status_in_list};
use crate::service::RegistrarService;

impl RegistrarService {
    /// Recompute and store a student's cumulative GPA.
    ///
    /// # Errors
    ///
    /// `NotFound` if the student does not exist.
    pub async fn recompute_gpa(
        &self,
        actor: &Principal,
        student_id: &str,
    ) -> Result<GpaResponse, DatabaseError> {
        let student = self.get_student(student_id).await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT c.credits, e.grade_point
                     FROM enrollments e
                     LEFT JOIN class_offerings o ON o.id = e.class_id
                     LEFT JOIN courses c ON c.id = o.course_id
                     WHERE e.student_id = ?1
                       AND e.status IN ({})
                       AND e.grade_point IS NOT NULL",
                    status_in_list(&EnrollmentStatus::GPA_ELIGIBLE)
                ),
                [student_id],
            )
            .await?;
        let mut inputs = Vec::new();
        while let Some(row) = rows.next().await? {
            inputs.push(GpaInput {
                credits: get_opt_u32(&row, 0)?,
                grade_point: row.get::<Option<f64>>(1)?,
            });
        }
        let summary = GpaSummary::compute(&inputs);

        self.db()
            .conn()
            .execute(
                "UPDATE students SET gpa = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![summary.gpa, Utc::now().to_rfc3339(), student_id],
            )
            .await?;

        self.record(
            Some(actor),
            EntityType::Student,
            student_id,
            AuditAction::GpaRecomputed,
            Some(&summary),
        )
        .await?;
        tracing::info!(
            student_id,
            gpa = summary.gpa,
            total_credits = summary.total_credits,
            enrollments = summary.enrollments_count,
            "gpa recomputed"
        );

        Ok(GpaResponse {
            student: StudentSummary::from(&student),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, seed_course, seed_offering, seed_student, test_service};
    use crate::updates::grade::GradeEntry;
    use pretty_assertions::assert_eq;
    use reg_core::errors::ErrorKind;

    fn grade(grade_point: f64) -> GradeEntry {
        GradeEntry {
            grade_point: Some(grade_point),
            ..GradeEntry::default()
        }
    }

    #[tokio::test]
    async fn student_without_grades_gets_zero() {
        let svc = test_service().await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        let response = svc.recompute_gpa(&principal, &student.id).await.unwrap();
        assert_eq!(response.summary, GpaSummary::empty());
        assert_eq!(svc.get_student(&student.id).await.unwrap().gpa, Some(0.0));
    }

    #[tokio::test]
    async fn single_course_at_three_point_five() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let offering = seed_offering(&svc, &course, "CS101-01", 30).await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        let id = svc
            .enroll(&principal, &student.id, &offering.id, None)
            .await
            .unwrap()
            .enrollment
            .enrollment
            .id;
        svc.enter_grade(&admin(), &id, grade(3.5)).await.unwrap();

        let response = svc.recompute_gpa(&admin(), &student.id).await.unwrap();
        assert_eq!(
            response.summary,
            GpaSummary {
                gpa: 3.5,
                total_credits: 3,
                total_points: 10.5,
                enrollments_count: 1,
            }
        );
        assert_eq!(response.student.student_number, "SV001");
        assert_eq!(svc.get_student(&student.id).await.unwrap().gpa, Some(3.5));
    }

    #[tokio::test]
    async fn failing_grade_is_left_out() {
        let svc = test_service().await;
        let cs = seed_course(&svc, "CS101", 3).await;
        let art = seed_course(&svc, "ART100", 2).await;
        let a = seed_offering(&svc, &cs, "CS101-01", 30).await;
        let b = seed_offering(&svc, &art, "ART100-01", 30).await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        for (offering, gp) in [(&a, 4.0), (&b, 0.0)] {
            let id = svc
                .enroll(&principal, &student.id, &offering.id, None)
                .await
                .unwrap()
                .enrollment
                .enrollment
                .id;
            svc.enter_grade(&admin(), &id, grade(gp)).await.unwrap();
        }

        let summary = svc.recompute_gpa(&admin(), &student.id).await.unwrap().summary;
        assert_eq!(summary.gpa, 4.0);
        assert_eq!(summary.total_credits, 3);
        assert_eq!(summary.enrollments_count, 2);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let svc = test_service().await;
        let cs = seed_course(&svc, "CS101", 3).await;
        let math = seed_course(&svc, "MATH201", 4).await;
        let a = seed_offering(&svc, &cs, "CS101-01", 30).await;
        let b = seed_offering(&svc, &math, "MATH201-01", 30).await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        for (offering, gp) in [(&a, 3.7), (&b, 3.3)] {
            let id = svc
                .enroll(&principal, &student.id, &offering.id, None)
                .await
                .unwrap()
                .enrollment
                .enrollment
                .id;
            svc.enter_grade(&admin(), &id, grade(gp)).await.unwrap();
        }

        let first = svc.recompute_gpa(&admin(), &student.id).await.unwrap();
        let second = svc.recompute_gpa(&principal, &student.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            svc.get_student(&student.id).await.unwrap().gpa,
            Some(first.summary.gpa)
        );
    }

    #[tokio::test]
    async fn dropped_rows_do_not_count() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let offering = seed_offering(&svc, &course, "CS101-01", 30).await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        let id = svc
            .enroll(&principal, &student.id, &offering.id, None)
            .await
            .unwrap()
            .enrollment
            .enrollment
            .id;
        // A grade point written while registered, then the row is dropped.
        svc.db()
            .conn()
            .execute(
                "UPDATE enrollments SET grade_point = 4.0 WHERE id = ?1",
                [id.as_str()],
            )
            .await
            .unwrap();
        svc.drop_enrollment(&principal, &id, &student.id).await.unwrap();

        let summary = svc.recompute_gpa(&admin(), &student.id).await.unwrap().summary;
        assert_eq!(summary, GpaSummary::empty());
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let svc = test_service().await;
        let err = svc.recompute_gpa(&admin(), "stu-missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
