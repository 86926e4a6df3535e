//! Enrollment ledger.
//!
//! One row per (student, class offering). Dropping keeps the row and a later
//! enroll reactivates it, so the id is stable across drop/re-enroll cycles.
//! Every status change is a conditional UPDATE on the status read before it;
//! seat accounting goes through the capacity controller.

use chrono::Utc;

use reg_core::audit_detail::{EnrolledDetail, StatusChangedDetail};
use reg_core::entities::Enrollment;
use reg_core::enums::{AuditAction, EnrollmentStatus, EntityType, Weekday};
use reg_core::identity::Principal;
use reg_core::ids::PREFIX_ENROLLMENT;
use reg_core::responses::{
    DropResponse, EnrollResponse, EnrollmentDetail, Page, StudentSummary, Timetable, TimetableEntry,
};

use crate::constraint::{classify_write_error, is_unique_violation};
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json_list, parse_optional_datetime,
};
use crate::paging::PageRequest;
use crate::service::RegistrarService;

use super::class_offering::{self, qualified, row_to_offering_at};
use super::course::{self, row_to_course_at};

pub(crate) const SELECT_COLS: &str = "id, student_id, class_id, status, semester, \
     score_breakdown, final_score, letter_grade, grade_point, graded_by, graded_at, \
     registered_at, completed_at, notes, created_at, updated_at";

pub(crate) const COLUMN_COUNT: i32 = 16;

const OFFERING_BASE: i32 = COLUMN_COUNT;
const COURSE_BASE: i32 = OFFERING_BASE + class_offering::COLUMN_COUNT;
const STUDENT_BASE: i32 = COURSE_BASE + course::COLUMN_COUNT;

/// Ledger rows joined with their offering, course and student.
const DETAIL_FROM: &str = "FROM enrollments e
     LEFT JOIN class_offerings o ON o.id = e.class_id
     LEFT JOIN courses c ON c.id = o.course_id
     LEFT JOIN students s ON s.id = e.student_id";

pub(crate) fn row_to_enrollment_at(row: &libsql::Row, base: i32) -> Result<Enrollment, DatabaseError> {
    Ok(Enrollment {
        id: row.get(base)?,
        student_id: row.get(base + 1)?,
        class_id: row.get(base + 2)?,
        status: parse_enum(&row.get::<String>(base + 3)?)?,
        semester: get_opt_string(row, base + 4)?,
        score_breakdown: parse_json_list(get_opt_string(row, base + 5)?.as_deref())?,
        final_score: row.get::<Option<f64>>(base + 6)?,
        letter_grade: get_opt_string(row, base + 7)?,
        grade_point: row.get::<Option<f64>>(base + 8)?,
        graded_by: get_opt_string(row, base + 9)?,
        graded_at: parse_optional_datetime(get_opt_string(row, base + 10)?.as_deref())?,
        registered_at: parse_datetime(&row.get::<String>(base + 11)?)?,
        completed_at: parse_optional_datetime(get_opt_string(row, base + 12)?.as_deref())?,
        notes: get_opt_string(row, base + 13)?,
        created_at: parse_datetime(&row.get::<String>(base + 14)?)?,
        updated_at: parse_datetime(&row.get::<String>(base + 15)?)?,
    })
}

pub(crate) fn row_to_enrollment(row: &libsql::Row) -> Result<Enrollment, DatabaseError> {
    row_to_enrollment_at(row, 0)
}

pub(crate) fn detail_select() -> String {
    format!(
        "SELECT {}, {}, {}, s.id, s.student_number, s.first_name, s.last_name {DETAIL_FROM}",
        qualified(SELECT_COLS, "e"),
        qualified(class_offering::SELECT_COLS, "o"),
        qualified(course::SELECT_COLS, "c"),
    )
}

pub(crate) fn row_to_detail(row: &libsql::Row) -> Result<EnrollmentDetail, DatabaseError> {
    let enrollment = row_to_enrollment(row)?;
    let class_offering = match row.get::<Option<String>>(OFFERING_BASE)? {
        Some(_) => Some(row_to_offering_at(row, OFFERING_BASE)?),
        None => None,
    };
    let course = match row.get::<Option<String>>(COURSE_BASE)? {
        Some(_) => Some(row_to_course_at(row, COURSE_BASE)?),
        None => None,
    };
    let student = match row.get::<Option<String>>(STUDENT_BASE)? {
        Some(id) => Some(StudentSummary {
            id,
            student_number: row.get(STUDENT_BASE + 1)?,
            first_name: row.get(STUDENT_BASE + 2)?,
            last_name: row.get(STUDENT_BASE + 3)?,
        }),
        None => None,
    };
    Ok(EnrollmentDetail {
        enrollment,
        class_offering,
        course,
        student,
    })
}

/// Filter for a student's own enrollment list.
#[derive(Debug, Default, Clone)]
pub struct EnrollmentFilter {
    pub semester: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

/// Filter for the administrative ledger listing.
#[derive(Debug, Default, Clone)]
pub struct EnrollmentQuery {
    pub student_id: Option<String>,
    pub class_id: Option<String>,
    pub semester: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

impl EnrollmentQuery {
    fn where_clause(&self) -> (String, Vec<libsql::Value>) {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(ref student_id) = self.student_id {
            params.push(libsql::Value::Text(student_id.clone()));
            conditions.push(format!("e.student_id = ?{}", params.len()));
        }
        if let Some(ref class_id) = self.class_id {
            params.push(libsql::Value::Text(class_id.clone()));
            conditions.push(format!("e.class_id = ?{}", params.len()));
        }
        if let Some(ref semester) = self.semester {
            params.push(libsql::Value::Text(semester.clone()));
            conditions.push(format!("e.semester = ?{}", params.len()));
        }
        if let Some(status) = self.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("e.status = ?{}", params.len()));
        }
        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

impl RegistrarService {
    /// Register `student_id` in `class_id`, reactivating a dropped row if one
    /// exists. The semester defaults to the offering's. A ledger write that
    /// fails after the seat was reserved releases the seat before returning.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the offering or student does not exist
    /// - `AlreadyEnrolled` if a non-dropped row exists for the pair
    /// - `CapacityExceeded` if the offering is full
    pub async fn enroll(
        &self,
        actor: &Principal,
        student_id: &str,
        class_id: &str,
        semester: Option<&str>,
    ) -> Result<EnrollResponse, DatabaseError> {
        let offering = self.get_class_offering(class_id).await?;
        self.get_student(student_id).await?;
        let semester = semester
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or(offering.semester);

        let existing = self.find_enrollment(student_id, class_id).await?;
        if let Some(ref row) = existing {
            if row.status != EnrollmentStatus::Dropped {
                return Err(already_enrolled(student_id, class_id));
            }
        }

        let enrolled_count = self.try_reserve_seat(class_id).await?;

        let written = match existing {
            Some(row) => self
                .reactivate(&row.id, student_id, class_id, semester.as_deref())
                .await
                .map(|()| (row.id, true)),
            None => self
                .insert_enrollment(student_id, class_id, semester.as_deref())
                .await
                .map(|id| (id, false)),
        };
        let (enrollment_id, reenrolled) = match written {
            Ok(written) => written,
            Err(e) => {
                self.compensate_seat(class_id).await;
                return Err(e);
            }
        };

        let action = if reenrolled {
            AuditAction::Reenrolled
        } else {
            AuditAction::Enrolled
        };
        self.record_committed(
            Some(actor),
            EntityType::Enrollment,
            &enrollment_id,
            action,
            Some(&EnrolledDetail {
                class_id: class_id.to_string(),
                semester,
                enrolled_count,
            }),
        )
        .await;

        let enrollment = self.get_enrollment_detail(&enrollment_id).await?;
        tracing::info!(
            enrollment_id = %enrollment_id,
            student_id,
            class_id,
            enrolled_count,
            reenrolled,
            "student enrolled"
        );
        Ok(EnrollResponse {
            enrollment,
            reenrolled,
        })
    }

    async fn insert_enrollment(
        &self,
        student_id: &str,
        class_id: &str,
        semester: Option<&str>,
    ) -> Result<String, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ENROLLMENT).await?;
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "INSERT INTO enrollments
                 (id, student_id, class_id, status, semester, score_breakdown,
                  registered_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 'registered', ?4, '[]', ?5, ?5, ?5)",
                libsql::params![id.as_str(), student_id, class_id, semester, now],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    already_enrolled(student_id, class_id)
                } else {
                    classify_write_error(e, &format!("enrollment of {student_id} in {class_id}"))
                }
            })?;
        Ok(id)
    }

    /// Flip a dropped row back to registered. Fails if another request
    /// reactivated it first.
    async fn reactivate(
        &self,
        enrollment_id: &str,
        student_id: &str,
        class_id: &str,
        semester: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE enrollments
                 SET status = 'registered', semester = ?1, registered_at = ?2, updated_at = ?2
                 WHERE id = ?3 AND status = 'dropped'",
                libsql::params![semester, now, enrollment_id],
            )
            .await?;
        if changed == 0 {
            return Err(already_enrolled(student_id, class_id));
        }
        Ok(())
    }

    /// Give back a seat reserved for a ledger write that did not happen.
    async fn compensate_seat(&self, class_id: &str) {
        match self.release_seat(class_id).await {
            Ok(enrolled_count) => tracing::warn!(
                class_id,
                enrolled_count,
                "released reserved seat after failed ledger write"
            ),
            Err(e) => tracing::error!(
                class_id,
                error = %e,
                "failed to release reserved seat; enrolled count needs reconciling"
            ),
        }
    }

    /// Give back the seat of a row that has already left a seat-holding
    /// status. The status change stands either way; a failed release leaves
    /// `enrolled_count` one high until `reconcile_enrolled_count` repairs it.
    async fn release_committed_seat(&self, class_id: &str) {
        if let Err(e) = self.release_seat(class_id).await {
            tracing::error!(
                class_id,
                error = %e,
                "failed to release seat after status change; enrolled count needs reconciling"
            );
        }
    }

    /// Drop an enrollment on behalf of the student who owns it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the enrollment does not exist
    /// - `AccessDenied` if it belongs to another student
    /// - `AlreadyDropped` if it is already dropped
    /// - `Conflict` if it is completed
    pub async fn drop_enrollment(
        &self,
        actor: &Principal,
        enrollment_id: &str,
        requesting_student_id: &str,
    ) -> Result<DropResponse, DatabaseError> {
        let current = self.get_enrollment(enrollment_id).await?;
        if current.student_id != requesting_student_id {
            return Err(DatabaseError::AccessDenied(format!(
                "enrollment {enrollment_id} belongs to another student"
            )));
        }

        let from = current.status;
        self.transition(&current, EnrollmentStatus::Dropped).await?;

        if from.holds_seat() {
            self.release_committed_seat(&current.class_id).await;
        }
        let enrolled_count = self.enrolled_count(&current.class_id).await?;

        self.record_committed(
            Some(actor),
            EntityType::Enrollment,
            enrollment_id,
            AuditAction::Dropped,
            Some(&StatusChangedDetail {
                from: from.as_str().to_string(),
                to: EnrollmentStatus::Dropped.as_str().to_string(),
                reason: None,
            }),
        )
        .await;
        tracing::info!(enrollment_id, class_id = %current.class_id, enrolled_count, "enrollment dropped");

        Ok(DropResponse {
            enrollment: self.get_enrollment(enrollment_id).await?,
            enrolled_count,
        })
    }

    /// Administrative status change along the ledger state machine.
    /// Moving into a seat-holding status takes a seat; moving out gives one
    /// back. `completed` is reachable only by entering a grade.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the enrollment does not exist
    /// - `AlreadyDropped` when dropping a dropped row
    /// - `Conflict` for a transition the state machine does not allow
    /// - `CapacityExceeded` if a seat is needed and the offering is full
    pub async fn assign_enrollment_status(
        &self,
        actor: &Principal,
        enrollment_id: &str,
        status: EnrollmentStatus,
        reason: Option<&str>,
    ) -> Result<EnrollmentDetail, DatabaseError> {
        let current = self.get_enrollment(enrollment_id).await?;
        let from = current.status;
        if status == EnrollmentStatus::Completed {
            return Err(invalid_transition(enrollment_id, from, status));
        }

        let takes_seat = !from.holds_seat() && status.holds_seat();
        let frees_seat = from.holds_seat() && !status.holds_seat();
        // Pre-check so a refused transition never touches the seat count.
        check_transition(&current, status)?;

        if takes_seat {
            self.try_reserve_seat(&current.class_id).await?;
        }
        if let Err(e) = self.transition(&current, status).await {
            if takes_seat {
                self.compensate_seat(&current.class_id).await;
            }
            return Err(e);
        }
        if frees_seat {
            self.release_committed_seat(&current.class_id).await;
        }

        self.record_committed(
            Some(actor),
            EntityType::Enrollment,
            enrollment_id,
            AuditAction::StatusChanged,
            Some(&StatusChangedDetail {
                from: from.as_str().to_string(),
                to: status.as_str().to_string(),
                reason: reason.map(String::from),
            }),
        )
        .await;
        tracing::info!(enrollment_id, %from, to = %status, "enrollment status assigned");
        self.get_enrollment_detail(enrollment_id).await
    }

    /// Conditionally move `current` to `to`. Loses cleanly to a concurrent
    /// writer that changed the status first.
    async fn transition(
        &self,
        current: &Enrollment,
        to: EnrollmentStatus,
    ) -> Result<(), DatabaseError> {
        check_transition(current, to)?;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE enrollments SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND status = ?4",
                libsql::params![
                    to.as_str(),
                    Utc::now().to_rfc3339(),
                    current.id.as_str(),
                    current.status.as_str()
                ],
            )
            .await?;
        if changed == 0 {
            let latest = self.get_enrollment(&current.id).await?;
            if to == EnrollmentStatus::Dropped && latest.status == EnrollmentStatus::Dropped {
                return Err(DatabaseError::AlreadyDropped {
                    enrollment_id: current.id.clone(),
                });
            }
            return Err(DatabaseError::Conflict(format!(
                "enrollment {} changed concurrently (now {})",
                current.id, latest.status
            )));
        }
        Ok(())
    }

    pub async fn get_enrollment(&self, id: &str) -> Result<Enrollment, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM enrollments WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Enrollment, id))?;
        row_to_enrollment(&row)
    }

    pub async fn get_enrollment_detail(&self, id: &str) -> Result<EnrollmentDetail, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("{} WHERE e.id = ?1", detail_select()), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Enrollment, id))?;
        row_to_detail(&row)
    }

    /// The ledger row for a (student, class) pair, whatever its status.
    pub async fn find_enrollment(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> Result<Option<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM enrollments WHERE student_id = ?1 AND class_id = ?2"
                ),
                [student_id, class_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_enrollment(&row)?)),
            None => Ok(None),
        }
    }

    /// A student's enrollments, newest registration first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the student does not exist.
    pub async fn list_for_student(
        &self,
        student_id: &str,
        filter: &EnrollmentFilter,
    ) -> Result<Vec<EnrollmentDetail>, DatabaseError> {
        self.get_student(student_id).await?;
        let query = EnrollmentQuery {
            student_id: Some(student_id.to_string()),
            semester: filter.semester.clone(),
            status: filter.status,
            ..EnrollmentQuery::default()
        };
        self.query_details(&query, "ORDER BY e.registered_at DESC, e.rowid DESC")
            .await
    }

    /// Everyone enrolled in a class offering, by student number.
    ///
    /// # Errors
    ///
    /// `NotFound` if the offering does not exist.
    pub async fn list_for_class(
        &self,
        class_id: &str,
    ) -> Result<Vec<EnrollmentDetail>, DatabaseError> {
        self.get_class_offering(class_id).await?;
        let query = EnrollmentQuery {
            class_id: Some(class_id.to_string()),
            ..EnrollmentQuery::default()
        };
        self.query_details(&query, "ORDER BY s.student_number, e.rowid")
            .await
    }

    /// Administrative ledger listing, newest registration first.
    pub async fn list_enrollments(
        &self,
        query: &EnrollmentQuery,
        page: PageRequest,
    ) -> Result<Page<EnrollmentDetail>, DatabaseError> {
        let (where_clause, params) = query.where_clause();
        let total = self
            .db()
            .count(
                &format!("SELECT COUNT(*) FROM enrollments e {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "{} {where_clause} ORDER BY e.registered_at DESC, e.rowid DESC LIMIT {} OFFSET {}",
                    detail_select(),
                    page.limit,
                    page.offset()
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut details = Vec::new();
        while let Some(row) = rows.next().await? {
            details.push(row_to_detail(&row)?);
        }
        Ok(page.wrap(details, total))
    }

    async fn query_details(
        &self,
        query: &EnrollmentQuery,
        order_by: &str,
    ) -> Result<Vec<EnrollmentDetail>, DatabaseError> {
        let (where_clause, params) = query.where_clause();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("{} {where_clause} {order_by}", detail_select()),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut details = Vec::new();
        while let Some(row) = rows.next().await? {
            details.push(row_to_detail(&row)?);
        }
        tracing::debug!(count = details.len(), "listed enrollments");
        Ok(details)
    }

    /// Weekly schedule of a student's registered and completed classes.
    /// `semester` defaults to the student's current semester; with neither,
    /// every semester is included.
    ///
    /// # Errors
    ///
    /// `NotFound` if the student does not exist.
    pub async fn timetable(
        &self,
        student_id: &str,
        semester: Option<&str>,
    ) -> Result<Timetable, DatabaseError> {
        let student = self.get_student(student_id).await?;
        let semester = semester.map(String::from).or(student.current_semester);

        let mut entries = Vec::new();
        for status in [EnrollmentStatus::Registered, EnrollmentStatus::Completed] {
            let filter = EnrollmentFilter {
                semester: semester.clone(),
                status: Some(status),
            };
            for detail in self.list_for_student(student_id, &filter).await? {
                if let Some(entry) = timetable_entry(detail) {
                    entries.push(entry);
                }
            }
        }
        entries.sort_by(|a, b| {
            schedule_key(a)
                .cmp(&schedule_key(b))
                .then_with(|| a.class_code.cmp(&b.class_code))
        });

        Ok(Timetable { semester, entries })
    }
}

fn already_enrolled(student_id: &str, class_id: &str) -> DatabaseError {
    DatabaseError::AlreadyEnrolled {
        student_id: student_id.to_string(),
        class_id: class_id.to_string(),
    }
}

fn invalid_transition(id: &str, from: EnrollmentStatus, to: EnrollmentStatus) -> DatabaseError {
    DatabaseError::InvalidTransition {
        entity: EntityType::Enrollment,
        id: id.to_string(),
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
    }
}

fn check_transition(current: &Enrollment, to: EnrollmentStatus) -> Result<(), DatabaseError> {
    if to == EnrollmentStatus::Dropped && current.status == EnrollmentStatus::Dropped {
        return Err(DatabaseError::AlreadyDropped {
            enrollment_id: current.id.clone(),
        });
    }
    if !current.status.can_transition_to(to) {
        return Err(invalid_transition(&current.id, current.status, to));
    }
    Ok(())
}

fn timetable_entry(detail: EnrollmentDetail) -> Option<TimetableEntry> {
    let offering = detail.class_offering?;
    Some(TimetableEntry {
        enrollment_id: detail.enrollment.id,
        class_code: offering.class_code,
        course_code: detail.course.as_ref().map(|c| c.code.clone()),
        course_title: detail.course.as_ref().map(|c| c.title.clone()),
        credits: detail.course.as_ref().map(|c| c.credits),
        instructor_name: offering.instructor_name,
        section: offering.section,
        room: offering.room,
        campus: offering.campus,
        mode: offering.mode,
        meetings: offering.meetings,
        semester: detail.enrollment.semester,
    })
}

/// Earliest meeting first; classes without meetings sort last.
fn schedule_key(entry: &TimetableEntry) -> (bool, Option<(Weekday, String)>) {
    let first = entry
        .meetings
        .iter()
        .map(|m| (m.day_of_week, m.start_time.clone().unwrap_or_default()))
        .min();
    (first.is_none(), first)
}
