//! Student repository.
//!
//! A student may be linked to a student-role account. Creating a student
//! with an email creates that account first; if the student insert then
//! fails the account is removed again.

use chrono::Utc;

use reg_core::entities::Student;
use reg_core::enums::{AuditAction, EntityType, Gender, Role, StudentStatus};
use reg_core::identity::Principal;
use reg_core::ids::PREFIX_STUDENT;
use reg_core::responses::{DeleteResponse, Page};

use crate::constraint::classify_write_error;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_i32, get_opt_string, parse_datetime, parse_enum, parse_optional_date};
use crate::paging::PageRequest;
use crate::service::RegistrarService;
use crate::updates::SetClause;
use crate::updates::account::NewAccount;
use crate::updates::student::{NewStudent, ProfileUpdate, StudentUpdate};

pub(crate) const SELECT_COLS: &str = "id, student_number, account_id, first_name, last_name, \
     middle_name, date_of_birth, gender, cohort_year, enrollment_year, status, is_active, email, \
     phone, current_semester, gpa, notes, created_at, updated_at";

pub(crate) fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get(0)?,
        student_number: row.get(1)?,
        account_id: get_opt_string(row, 2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        middle_name: get_opt_string(row, 5)?,
        date_of_birth: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        gender: parse_enum(&row.get::<String>(7)?)?,
        cohort_year: get_opt_i32(row, 8)?,
        enrollment_year: get_opt_i32(row, 9)?,
        status: parse_enum(&row.get::<String>(10)?)?,
        is_active: row.get::<i64>(11)? != 0,
        email: get_opt_string(row, 12)?,
        phone: get_opt_string(row, 13)?,
        current_semester: get_opt_string(row, 14)?,
        gpa: row.get::<Option<f64>>(15)?,
        notes: get_opt_string(row, 16)?,
        created_at: parse_datetime(&row.get::<String>(17)?)?,
        updated_at: parse_datetime(&row.get::<String>(18)?)?,
    })
}

#[derive(Debug, Default, Clone)]
pub struct StudentFilter {
    pub status: Option<StudentStatus>,
    pub cohort_year: Option<i32>,
}

impl RegistrarService {
    /// # Errors
    ///
    /// `Invalid` for blank required fields or a malformed email, `Conflict`
    /// if the student number or email is already taken.
    pub async fn create_student(
        &self,
        actor: &Principal,
        mut new: NewStudent,
    ) -> Result<Student, DatabaseError> {
        new.validate()?;

        let taken = self
            .db()
            .count(
                "SELECT COUNT(*) FROM students WHERE student_number = ?1",
                [new.student_number.as_str()],
            )
            .await?;
        if taken > 0 {
            return Err(DatabaseError::Conflict(format!(
                "student number {} already exists",
                new.student_number
            )));
        }

        let email = new
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let account = match email {
            Some(ref email) => {
                let mut account = NewAccount::new(email.clone(), Role::Student);
                account.display_name = Some(format!("{} {}", new.first_name, new.last_name));
                Some(self.create_account(Some(actor), account).await?)
            }
            None => None,
        };
        let email = account.as_ref().map(|a| a.email.clone()).or(email);

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STUDENT).await?;
        let gender = new.gender.unwrap_or(Gender::Undisclosed);
        let student = Student {
            id: id.clone(),
            student_number: new.student_number,
            account_id: account.as_ref().map(|a| a.id.clone()),
            first_name: new.first_name,
            last_name: new.last_name,
            middle_name: new.middle_name,
            date_of_birth: new.date_of_birth,
            gender,
            cohort_year: new.cohort_year,
            enrollment_year: new.enrollment_year,
            status: StudentStatus::Active,
            is_active: true,
            email,
            phone: new.phone,
            current_semester: new.current_semester,
            gpa: None,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO students ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                             ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
                ),
                libsql::params![
                    student.id.as_str(),
                    student.student_number.as_str(),
                    student.account_id.as_deref(),
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.middle_name.as_deref(),
                    student
                        .date_of_birth
                        .map(|d| d.format("%Y-%m-%d").to_string()),
                    student.gender.as_str(),
                    student.cohort_year.map(i64::from),
                    student.enrollment_year.map(i64::from),
                    student.status.as_str(),
                    1_i64,
                    student.email.as_deref(),
                    student.phone.as_deref(),
                    student.current_semester.as_deref(),
                    Option::<f64>::None,
                    student.notes.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await;

        if let Err(e) = inserted {
            if let Some(ref account) = account {
                if let Err(cleanup) = self.delete_account(actor, &account.id).await {
                    tracing::error!(
                        account_id = %account.id,
                        error = %cleanup,
                        "failed to remove account after student insert failed"
                    );
                }
            }
            return Err(classify_write_error(
                e,
                &format!("student number {}", student.student_number),
            ));
        }

        self.record(Some(actor), EntityType::Student, &id, AuditAction::Created, Some(&student))
            .await?;
        tracing::info!(student_id = %id, student_number = %student.student_number, "student created");
        Ok(student)
    }

    pub async fn get_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM students WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Student, id))?;
        row_to_student(&row)
    }

    /// Resolve the student record linked to an account.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student is linked to `account_id`.
    pub async fn get_student_by_account(&self, account_id: &str) -> Result<Student, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM students WHERE account_id = ?1"),
                [account_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Student, account_id))?;
        row_to_student(&row)
    }

    /// Students, newest first.
    pub async fn list_students(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<Page<Student>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(cohort_year) = filter.cohort_year {
            params.push(libsql::Value::Integer(i64::from(cohort_year)));
            conditions.push(format!("cohort_year = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total = self
            .db()
            .count(
                &format!("SELECT COUNT(*) FROM students {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM students {where_clause}
                     ORDER BY created_at DESC, rowid DESC LIMIT {} OFFSET {}",
                    page.limit,
                    page.offset()
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut students = Vec::new();
        while let Some(row) = rows.next().await? {
            students.push(row_to_student(&row)?);
        }
        Ok(page.wrap(students, total))
    }

    /// Apply an administrative update. A name change is mirrored onto the
    /// linked account's display name.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown student, `Invalid` for a blank name.
    pub async fn update_student(
        &self,
        actor: &Principal,
        student_id: &str,
        update: StudentUpdate,
    ) -> Result<Student, DatabaseError> {
        let current = self.get_student(student_id).await?;
        let mut set = SetClause::default();
        update.apply(&mut set)?;
        if set.is_empty() {
            return Ok(current);
        }

        let (sql, params) = set.into_update("students", student_id, Utc::now());
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| classify_write_error(e, &format!("student {student_id}")))?;
        let updated = self.get_student(student_id).await?;

        if update.renames() {
            if let Some(ref account_id) = updated.account_id {
                self.set_account_display_name(account_id, &updated.full_name())
                    .await?;
            }
        }

        self.record(Some(actor), EntityType::Student, student_id, AuditAction::Updated, Some(&update))
            .await?;
        tracing::info!(student_id, "student updated");
        Ok(updated)
    }

    /// Self-service update of the record linked to the caller's account.
    ///
    /// # Errors
    ///
    /// `NotFound` when the caller has no linked student record.
    pub async fn update_own_profile(
        &self,
        actor: &Principal,
        profile: ProfileUpdate,
    ) -> Result<Student, DatabaseError> {
        let student = self.get_student_by_account(&actor.account_id).await?;
        self.update_student(actor, &student.id, StudentUpdate::from(profile))
            .await
    }

    /// Delete a student that has no enrollment rows, along with its account.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown student, `Conflict` while enrollments exist.
    pub async fn delete_student(
        &self,
        actor: &Principal,
        student_id: &str,
    ) -> Result<DeleteResponse, DatabaseError> {
        let student = self.get_student(student_id).await?;
        let enrollments = self
            .db()
            .count("SELECT COUNT(*) FROM enrollments WHERE student_id = ?1", [student_id])
            .await?;
        if enrollments > 0 {
            return Err(DatabaseError::Conflict(format!(
                "student {} has {enrollments} enrollment(s)",
                student.student_number
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM students WHERE id = ?1", [student_id])
            .await
            .map_err(|e| classify_write_error(e, &format!("student {}", student.student_number)))?;
        if let Some(ref account_id) = student.account_id {
            self.delete_account(actor, account_id).await?;
        }

        self.record::<()>(Some(actor), EntityType::Student, student_id, AuditAction::Deleted, None)
            .await?;
        tracing::info!(student_id, "student deleted");
        Ok(DeleteResponse {
            entity_type: EntityType::Student,
            id: student_id.to_string(),
            deleted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, seed_course, seed_offering, seed_student, test_service};
    use crate::updates::student::StudentUpdateBuilder;
    use pretty_assertions::assert_eq;
    use reg_core::errors::ErrorKind;

    #[tokio::test]
    async fn create_student_links_account() {
        let svc = test_service().await;
        let mut new = NewStudent::new("SV001", "Linh", "Nguyen");
        new.email = Some("Linh.Nguyen@Example.edu".into());
        new.cohort_year = Some(2024);
        let student = svc.create_student(&admin(), new).await.unwrap();

        assert!(student.id.starts_with("stu-"));
        assert_eq!(student.gender, Gender::Undisclosed);
        assert_eq!(student.gpa, None);
        assert_eq!(student.email.as_deref(), Some("linh.nguyen@example.edu"));

        let account_id = student.account_id.clone().unwrap();
        let account = svc.get_account(&account_id).await.unwrap();
        assert_eq!(account.role, Role::Student);
        assert_eq!(account.display_name.as_deref(), Some("Linh Nguyen"));

        let linked = svc.get_student_by_account(&account_id).await.unwrap();
        assert_eq!(linked, svc.get_student(&student.id).await.unwrap());
        assert_eq!(linked.cohort_year, Some(2024));
    }

    #[tokio::test]
    async fn student_without_email_has_no_account() {
        let svc = test_service().await;
        let student = svc
            .create_student(&admin(), NewStudent::new("SV002", "An", "Le"))
            .await
            .unwrap();
        assert_eq!(student.account_id, None);
    }

    #[tokio::test]
    async fn duplicate_student_number_conflicts() {
        let svc = test_service().await;
        seed_student(&svc, "SV001").await;
        let err = svc
            .create_student(&admin(), NewStudent::new("SV001", "Other", "Person"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn taken_email_conflicts_without_creating_student() {
        let svc = test_service().await;
        seed_student(&svc, "SV001").await;
        let mut new = NewStudent::new("SV002", "Other", "Person");
        new.email = Some("sv001@example.edu".into());
        let err = svc.create_student(&admin(), new).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let page = svc
            .list_students(&StudentFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn rename_updates_account_display_name() {
        let svc = test_service().await;
        let (student, _) = seed_student(&svc, "SV001").await;
        let update = StudentUpdateBuilder::new()
            .first_name("Minh")
            .last_name("Pham")
            .build();
        let updated = svc.update_student(&admin(), &student.id, update).await.unwrap();
        assert_eq!(updated.full_name(), "Minh Pham");
        assert_eq!(updated.student_number, "SV001");

        let account = svc
            .get_account(student.account_id.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(account.display_name.as_deref(), Some("Minh Pham"));
    }

    #[tokio::test]
    async fn explicit_null_clears_field() {
        let svc = test_service().await;
        let (student, _) = seed_student(&svc, "SV001").await;
        svc.update_student(
            &admin(),
            &student.id,
            StudentUpdateBuilder::new().notes(Some("transfer".into())).build(),
        )
        .await
        .unwrap();

        let update: StudentUpdate = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        let cleared = svc.update_student(&admin(), &student.id, update).await.unwrap();
        assert_eq!(cleared.notes, None);
    }

    #[tokio::test]
    async fn own_profile_update_resolves_by_account() {
        let svc = test_service().await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        let profile: ProfileUpdate =
            serde_json::from_str(r#"{"phone": "0901", "current_semester": "2026-fall"}"#).unwrap();
        let updated = svc.update_own_profile(&principal, profile).await.unwrap();
        assert_eq!(updated.id, student.id);
        assert_eq!(updated.phone.as_deref(), Some("0901"));
        assert_eq!(updated.current_semester.as_deref(), Some("2026-fall"));
    }

    #[tokio::test]
    async fn profile_update_without_linked_record_is_not_found() {
        let svc = test_service().await;
        let stranger = Principal::new("acc-nobody", Role::Student);
        let err = svc
            .update_own_profile(&stranger, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_student_and_account() {
        let svc = test_service().await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        let response = svc.delete_student(&admin(), &student.id).await.unwrap();
        assert!(response.deleted);
        assert_eq!(
            svc.get_student(&student.id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            svc.get_account(&principal.account_id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn delete_with_enrollments_conflicts() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let offering = seed_offering(&svc, &course, "CS101-01", 10).await;
        let (student, principal) = seed_student(&svc, "SV001").await;
        svc.enroll(&principal, &student.id, &offering.id, None)
            .await
            .unwrap();

        let err = svc.delete_student(&admin(), &student.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(svc.get_student(&student.id).await.is_ok());
    }

    #[tokio::test]
    async fn list_filters_by_status_and_cohort() {
        let svc = test_service().await;
        let mut a = NewStudent::new("SV001", "A", "One");
        a.cohort_year = Some(2024);
        let mut b = NewStudent::new("SV002", "B", "Two");
        b.cohort_year = Some(2025);
        let a = svc.create_student(&admin(), a).await.unwrap();
        svc.create_student(&admin(), b).await.unwrap();
        svc.update_student(
            &admin(),
            &a.id,
            StudentUpdateBuilder::new().status(StudentStatus::OnLeave).build(),
        )
        .await
        .unwrap();

        let on_leave = svc
            .list_students(
                &StudentFilter {
                    status: Some(StudentStatus::OnLeave),
                    ..StudentFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(on_leave.items.len(), 1);
        assert_eq!(on_leave.items[0].student_number, "SV001");

        let cohort = svc
            .list_students(
                &StudentFilter {
                    cohort_year: Some(2025),
                    ..StudentFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(cohort.items.len(), 1);
        assert_eq!(cohort.items[0].student_number, "SV002");
    }
}
