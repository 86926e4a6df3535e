//! Course repository: CRUD with a deletion guard.

use chrono::Utc;

use reg_core::entities::Course;
use reg_core::enums::{AuditAction, CourseStatus, EntityType};
use reg_core::identity::Principal;
use reg_core::ids::PREFIX_COURSE;
use reg_core::responses::{DeleteResponse, Page};

use crate::constraint::classify_write_error;
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_opt_u32, get_u32, parse_datetime, parse_enum, parse_json_list, to_json_text,
};
use crate::paging::PageRequest;
use crate::service::RegistrarService;
use crate::updates::SetClause;
use crate::updates::course::{CourseUpdate, NewCourse};

pub(crate) const SELECT_COLS: &str = "id, code, title, description, credits, contact_hours, \
     subject_area, faculty, prerequisites, syllabus_url, status, created_at, updated_at";

pub(crate) const COLUMN_COUNT: i32 = 13;

/// Parse a course starting at column `base`.
pub(crate) fn row_to_course_at(row: &libsql::Row, base: i32) -> Result<Course, DatabaseError> {
    Ok(Course {
        id: row.get(base)?,
        code: row.get(base + 1)?,
        title: row.get(base + 2)?,
        description: get_opt_string(row, base + 3)?,
        credits: get_u32(row, base + 4)?,
        contact_hours: get_opt_u32(row, base + 5)?,
        subject_area: get_opt_string(row, base + 6)?,
        faculty: get_opt_string(row, base + 7)?,
        prerequisites: parse_json_list(get_opt_string(row, base + 8)?.as_deref())?,
        syllabus_url: get_opt_string(row, base + 9)?,
        status: parse_enum(&row.get::<String>(base + 10)?)?,
        created_at: parse_datetime(&row.get::<String>(base + 11)?)?,
        updated_at: parse_datetime(&row.get::<String>(base + 12)?)?,
    })
}

pub(crate) fn row_to_course(row: &libsql::Row) -> Result<Course, DatabaseError> {
    row_to_course_at(row, 0)
}

#[derive(Debug, Default, Clone)]
pub struct CourseFilter {
    pub status: Option<CourseStatus>,
    pub faculty: Option<String>,
    pub subject_area: Option<String>,
}

impl CourseFilter {
    fn where_clause(&self) -> (String, Vec<libsql::Value>) {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = self.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref faculty) = self.faculty {
            params.push(libsql::Value::Text(faculty.clone()));
            conditions.push(format!("faculty = ?{}", params.len()));
        }
        if let Some(ref subject_area) = self.subject_area {
            params.push(libsql::Value::Text(subject_area.clone()));
            conditions.push(format!("subject_area = ?{}", params.len()));
        }
        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

impl RegistrarService {
    /// # Errors
    ///
    /// `Invalid` for blank code/title, `Conflict` if the code is taken.
    pub async fn create_course(
        &self,
        actor: &Principal,
        mut new: NewCourse,
    ) -> Result<Course, DatabaseError> {
        new.validate()?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COURSE).await?;
        let status = new.status.unwrap_or(CourseStatus::Active);

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO courses ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                libsql::params![
                    id.as_str(),
                    new.code.as_str(),
                    new.title.as_str(),
                    new.description.as_deref(),
                    i64::from(new.credits),
                    new.contact_hours.map(i64::from),
                    new.subject_area.as_deref(),
                    new.faculty.as_deref(),
                    to_json_text(&new.prerequisites)?,
                    new.syllabus_url.as_deref(),
                    status.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| classify_write_error(e, &format!("course code {}", new.code)))?;

        let course = Course {
            id: id.clone(),
            code: new.code,
            title: new.title,
            description: new.description,
            credits: new.credits,
            contact_hours: new.contact_hours,
            subject_area: new.subject_area,
            faculty: new.faculty,
            prerequisites: new.prerequisites,
            syllabus_url: new.syllabus_url,
            status,
            created_at: now,
            updated_at: now,
        };

        self.record(Some(actor), EntityType::Course, &id, AuditAction::Created, Some(&course))
            .await?;
        tracing::info!(course_id = %id, code = %course.code, "course created");
        Ok(course)
    }

    pub async fn get_course(&self, id: &str) -> Result<Course, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM courses WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Course, id))?;
        row_to_course(&row)
    }

    /// Courses ordered by code.
    pub async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
    ) -> Result<Page<Course>, DatabaseError> {
        let (where_clause, params) = filter.where_clause();
        let total = self
            .db()
            .count(
                &format!("SELECT COUNT(*) FROM courses {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM courses {where_clause}
                     ORDER BY code LIMIT {} OFFSET {}",
                    page.limit,
                    page.offset()
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next().await? {
            courses.push(row_to_course(&row)?);
        }
        Ok(page.wrap(courses, total))
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown course, `Invalid` for a blank title.
    pub async fn update_course(
        &self,
        actor: &Principal,
        course_id: &str,
        update: CourseUpdate,
    ) -> Result<Course, DatabaseError> {
        let current = self.get_course(course_id).await?;
        let mut set = SetClause::default();
        update.apply(&mut set)?;
        if set.is_empty() {
            return Ok(current);
        }

        let (sql, params) = set.into_update("courses", course_id, Utc::now());
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| classify_write_error(e, &format!("course {course_id}")))?;

        let updated = self.get_course(course_id).await?;
        self.record(Some(actor), EntityType::Course, course_id, AuditAction::Updated, Some(&update))
            .await?;
        tracing::info!(course_id, "course updated");
        Ok(updated)
    }

    /// Delete a course that no class offering references.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown course, `Conflict` while offerings exist.
    pub async fn delete_course(
        &self,
        actor: &Principal,
        course_id: &str,
    ) -> Result<DeleteResponse, DatabaseError> {
        let course = self.get_course(course_id).await?;
        let offerings = self
            .db()
            .count("SELECT COUNT(*) FROM class_offerings WHERE course_id = ?1", [course_id])
            .await?;
        if offerings > 0 {
            return Err(DatabaseError::Conflict(format!(
                "course {} has {offerings} class offering(s)",
                course.code
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM courses WHERE id = ?1", [course_id])
            .await
            .map_err(|e| classify_write_error(e, &format!("course {}", course.code)))?;
        self.record::<()>(Some(actor), EntityType::Course, course_id, AuditAction::Deleted, None)
            .await?;
        tracing::info!(course_id, "course deleted");
        Ok(DeleteResponse {
            entity_type: EntityType::Course,
            id: course_id.to_string(),
            deleted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, seed_course, seed_offering, test_service};
    use crate::updates::course::CourseUpdateBuilder;
    use pretty_assertions::assert_eq;
    use reg_core::errors::ErrorKind;

    #[tokio::test]
    async fn create_and_get_course() {
        let svc = test_service().await;
        let mut new = NewCourse::new(" CS101 ", "Intro to Programming");
        new.prerequisites = vec!["MATH100".into()];
        let course = svc.create_course(&admin(), new).await.unwrap();

        assert!(course.id.starts_with("crs-"));
        assert_eq!(course.code, "CS101");
        assert_eq!(course.credits, 3);
        assert_eq!(course.status, CourseStatus::Active);

        let fetched = svc.get_course(&course.id).await.unwrap();
        assert_eq!(fetched.prerequisites, vec!["MATH100".to_string()]);
        assert_eq!(fetched.title, course.title);
    }

    #[tokio::test]
    async fn duplicate_code_conflicts() {
        let svc = test_service().await;
        seed_course(&svc, "CS101", 3).await;
        let err = svc
            .create_course(&admin(), NewCourse::new("CS101", "Again"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn blank_title_is_invalid() {
        let svc = test_service().await;
        let err = svc
            .create_course(&admin(), NewCourse::new("CS101", "  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[tokio::test]
    async fn update_changes_whitelisted_fields() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let update = CourseUpdateBuilder::new()
            .title("Programming I")
            .credits(4)
            .description(Some("Fundamentals".into()))
            .build();
        let updated = svc.update_course(&admin(), &course.id, update).await.unwrap();
        assert_eq!(updated.title, "Programming I");
        assert_eq!(updated.credits, 4);
        assert_eq!(updated.code, "CS101");
        assert_eq!(updated.description.as_deref(), Some("Fundamentals"));
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let same = svc
            .update_course(&admin(), &course.id, CourseUpdate::default())
            .await
            .unwrap();
        assert_eq!(same.updated_at, svc.get_course(&course.id).await.unwrap().updated_at);
    }

    #[tokio::test]
    async fn deleting_course_with_offering_conflicts() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let offering = seed_offering(&svc, &course, "CS101-01", 30).await;

        let err = svc.delete_course(&admin(), &course.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert!(svc.get_course(&course.id).await.is_ok());
        assert!(svc.get_class_offering(&offering.id).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_unreferenced_course_succeeds() {
        let svc = test_service().await;
        let course = seed_course(&svc, "CS101", 3).await;
        let response = svc.delete_course(&admin(), &course.id).await.unwrap();
        assert!(response.deleted);
        let err = svc.get_course(&course.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let svc = test_service().await;
        for code in ["CS103", "CS101", "CS102"] {
            seed_course(&svc, code, 3).await;
        }
        let inactive = seed_course(&svc, "ART100", 2).await;
        svc.update_course(
            &admin(),
            &inactive.id,
            CourseUpdateBuilder::new().status(CourseStatus::Inactive).build(),
        )
        .await
        .unwrap();

        let page = svc
            .list_courses(
                &CourseFilter {
                    status: Some(CourseStatus::Active),
                    ..CourseFilter::default()
                },
                PageRequest::new(1, 2),
            )
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.pages, 2);
        let codes: Vec<_> = page.items.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS102"]);

        let second = svc
            .list_courses(&CourseFilter::default(), PageRequest::new(2, 3))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].code, "CS103");
    }
}
