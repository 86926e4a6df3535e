//! Grading subsystem: grade entry and grade projections.

use chrono::Utc;

use reg_core::audit_detail::GradedDetail;
use reg_core::enums::{AuditAction, EnrollmentStatus, EntityType};
use reg_core::identity::Principal;
use reg_core::responses::{ClassGradeView, GradeResponse, StudentGradeView};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_opt_u32, parse_enum, parse_json_list, parse_optional_datetime, to_json_text};
use crate::service::RegistrarService;
use crate::updates::SetClause;
use crate::updates::grade::GradeEntry;

impl RegistrarService {
    /// Record a grade and complete the enrollment, then recompute the
    /// student's GPA.
    ///
    /// # Errors
    ///
    /// - `Invalid` for an out-of-range grade point or malformed component
    /// - `NotFound` if the enrollment does not exist
    /// - `Conflict` if the enrollment is not registered or completed
    pub async fn enter_grade(
        &self,
        grader: &Principal,
        enrollment_id: &str,
        entry: GradeEntry,
    ) -> Result<GradeResponse, DatabaseError> {
        entry.validate()?;
        let current = self.get_enrollment(enrollment_id).await?;
        if !current.status.is_gradable() {
            return Err(DatabaseError::InvalidTransition {
                entity: EntityType::Enrollment,
                id: enrollment_id.to_string(),
                from: current.status.as_str().to_string(),
                to: EnrollmentStatus::Completed.as_str().to_string(),
            });
        }

        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let mut set = SetClause::default();
        if let Some(breakdown) = entry.stamped_breakdown(&grader.account_id, now) {
            set.text("score_breakdown", &to_json_text(&breakdown)?);
        }
        if let Some(final_score) = entry.final_score {
            set.real("final_score", final_score);
        }
        if let Some(ref letter_grade) = entry.letter_grade {
            set.text("letter_grade", letter_grade.trim());
        }
        if let Some(grade_point) = entry.grade_point {
            set.real("grade_point", grade_point);
        }
        if let Some(ref notes) = entry.notes {
            set.text("notes", notes);
        }
        set.text("graded_by", &grader.account_id);
        set.text("graded_at", &stamp);
        set.text("status", EnrollmentStatus::Completed.as_str());
        set.text("completed_at", &stamp);

        let (mut sql, mut params) = set.into_update("enrollments", enrollment_id, now);
        params.push(libsql::Value::Text(current.status.as_str().to_string()));
        sql.push_str(&format!(" AND status = ?{}", params.len()));

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "enrollment {enrollment_id} changed while grading"
            )));
        }

        self.record(
            Some(grader),
            EntityType::Enrollment,
            enrollment_id,
            AuditAction::Graded,
            Some(&GradedDetail {
                final_score: entry.final_score,
                letter_grade: entry.letter_grade.clone(),
                grade_point: entry.grade_point,
                components: entry.components(),
            }),
        )
        .await?;
        tracing::info!(
            enrollment_id,
            grader = %grader.account_id,
            grade_point = ?entry.grade_point,
            "grade entered"
        );

        let gpa = self
            .recompute_gpa(grader, &current.student_id)
            .await?
            .summary;
        let enrollment = self.get_enrollment_detail(enrollment_id).await?;
        Ok(GradeResponse { enrollment, gpa })
    }

    /// A student's grades, optionally for one semester. Dropped rows are
    /// left out.
    ///
    /// # Errors
    ///
    /// `NotFound` if the student does not exist.
    pub async fn grades_for_student(
        &self,
        student_id: &str,
        semester: Option<&str>,
    ) -> Result<Vec<StudentGradeView>, DatabaseError> {
        self.get_student(student_id).await?;

        let mut params = vec![libsql::Value::Text(student_id.to_string())];
        let mut semester_clause = String::new();
        if let Some(semester) = semester {
            params.push(libsql::Value::Text(semester.to_string()));
            semester_clause = format!("AND e.semester = ?{}", params.len());
        }

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT e.id, o.class_code, c.code, c.title, c.credits, e.semester,
                            e.score_breakdown, e.final_score, e.letter_grade, e.grade_point,
                            e.status
                     FROM enrollments e
                     LEFT JOIN class_offerings o ON o.id = e.class_id
                     LEFT JOIN courses c ON c.id = o.course_id
                     WHERE e.student_id = ?1 AND e.status != 'dropped' {semester_clause}
                     ORDER BY e.semester DESC, o.class_code"
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut grades = Vec::new();
        while let Some(row) = rows.next().await? {
            grades.push(StudentGradeView {
                enrollment_id: row.get(0)?,
                class_code: get_opt_string(&row, 1)?,
                course_code: get_opt_string(&row, 2)?,
                course_title: get_opt_string(&row, 3)?,
                credits: get_opt_u32(&row, 4)?,
                semester: get_opt_string(&row, 5)?,
                score_breakdown: parse_json_list(get_opt_string(&row, 6)?.as_deref())?,
                final_score: row.get::<Option<f64>>(7)?,
                letter_grade: get_opt_string(&row, 8)?,
                grade_point: row.get::<Option<f64>>(9)?,
                status: parse_enum(&row.get::<String>(10)?)?,
            });
        }
        tracing::debug!(student_id, count = grades.len(), "listed student grades");
        Ok(grades)
    }

    /// Gradebook for one class offering, by student number. Dropped rows
    /// are left out.
    ///
    /// # Errors
    ///
    /// `NotFound` if the offering does not exist.
    pub async fn grades_for_class(
        &self,
        class_id: &str,
    ) -> Result<Vec<ClassGradeView>, DatabaseError> {
        self.get_class_offering(class_id).await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT e.id, e.student_id, s.student_number, s.first_name, s.last_name,
                        e.score_breakdown, e.final_score, e.letter_grade, e.grade_point,
                        e.status, e.graded_at
                 FROM enrollments e
                 LEFT JOIN students s ON s.id = e.student_id
                 WHERE e.class_id = ?1 AND e.status != 'dropped'
                 ORDER BY s.student_number, e.rowid",
                [class_id],
            )
            .await?;

        let mut grades = Vec::new();
        while let Some(row) = rows.next().await? {
            let first = get_opt_string(&row, 3)?.unwrap_or_default();
            let last = get_opt_string(&row, 4)?.unwrap_or_default();
            grades.push(ClassGradeView {
                enrollment_id: row.get(0)?,
                student_id: row.get(1)?,
                student_number: get_opt_string(&row, 2)?,
                student_name: format!("{first} {last}").trim().to_string(),
                score_breakdown: parse_json_list(get_opt_string(&row, 5)?.as_deref())?,
                final_score: row.get::<Option<f64>>(6)?,
                letter_grade: get_opt_string(&row, 7)?,
                grade_point: row.get::<Option<f64>>(8)?,
                status: parse_enum(&row.get::<String>(9)?)?,
                graded_at: parse_optional_datetime(get_opt_string(&row, 10)?.as_deref())?,
            });
        }
        tracing::debug!(class_id, count = grades.len(), "listed class grades");
        Ok(grades)
    }
}
