//! Class offering repository.
//!
//! `enrolled_count` is owned by the capacity controller in `capacity.rs`;
//! nothing here writes it except creation, which starts it at zero.

use chrono::Utc;

use reg_core::entities::ClassOffering;
use reg_core::enums::{AuditAction, DeliveryMode, EntityType, OfferingStatus};
use reg_core::identity::Principal;
use reg_core::ids::PREFIX_CLASS_OFFERING;
use reg_core::responses::{AvailableOffering, DeleteResponse, Page};

use crate::constraint::classify_write_error;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, parse_datetime, parse_enum, parse_json_list, to_json_text};
use crate::paging::PageRequest;
use crate::service::RegistrarService;
use crate::updates::SetClause;
use crate::updates::class_offering::{ClassOfferingUpdate, NewClassOffering};

pub(crate) const SELECT_COLS: &str = "id, class_code, course_id, semester, instructor_name, \
     section, room, campus, mode, capacity, enrolled_count, status, meetings, notes, created_at, \
     updated_at";

/// Number of columns in [`SELECT_COLS`], for joined queries that read more.
pub(crate) const COLUMN_COUNT: i32 = 16;

/// Parse an offering starting at column `base`.
pub(crate) fn row_to_offering_at(row: &libsql::Row, base: i32) -> Result<ClassOffering, DatabaseError> {
    Ok(ClassOffering {
        id: row.get(base)?,
        class_code: row.get(base + 1)?,
        course_id: row.get(base + 2)?,
        semester: get_opt_string(row, base + 3)?,
        instructor_name: get_opt_string(row, base + 4)?,
        section: get_opt_string(row, base + 5)?,
        room: get_opt_string(row, base + 6)?,
        campus: get_opt_string(row, base + 7)?,
        mode: parse_enum(&row.get::<String>(base + 8)?)?,
        capacity: get_u32(row, base + 9)?,
        enrolled_count: get_u32(row, base + 10)?,
        status: parse_enum(&row.get::<String>(base + 11)?)?,
        meetings: parse_json_list(get_opt_string(row, base + 12)?.as_deref())?,
        notes: get_opt_string(row, base + 13)?,
        created_at: parse_datetime(&row.get::<String>(base + 14)?)?,
        updated_at: parse_datetime(&row.get::<String>(base + 15)?)?,
    })
}

pub(crate) fn row_to_offering(row: &libsql::Row) -> Result<ClassOffering, DatabaseError> {
    row_to_offering_at(row, 0)
}

/// Prefix every column of `cols` with `alias.`.
pub(crate) fn qualified(cols: &str, alias: &str) -> String {
    cols.split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default, Clone)]
pub struct OfferingFilter {
    pub course_id: Option<String>,
    pub semester: Option<String>,
    pub status: Option<OfferingStatus>,
}

#[derive(Debug, Default, Clone)]
pub struct AvailableFilter {
    pub course_id: Option<String>,
    pub semester: Option<String>,
}

impl RegistrarService {
    /// # Errors
    ///
    /// `NotFound` if the course does not exist, `Conflict` if the class code
    /// is taken.
    pub async fn create_class_offering(
        &self,
        actor: &Principal,
        mut new: NewClassOffering,
    ) -> Result<ClassOffering, DatabaseError> {
        new.validate()?;
        self.get_course(&new.course_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CLASS_OFFERING).await?;
        let offering = ClassOffering {
            id: id.clone(),
            class_code: new.class_code,
            course_id: new.course_id,
            semester: new.semester,
            instructor_name: new.instructor_name,
            section: new.section,
            room: new.room,
            campus: new.campus,
            mode: new.mode.unwrap_or(DeliveryMode::OnCampus),
            capacity: new.capacity,
            enrolled_count: 0,
            status: new.status.unwrap_or(OfferingStatus::Scheduled),
            meetings: new.meetings,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO class_offerings ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                libsql::params![
                    offering.id.as_str(),
                    offering.class_code.as_str(),
                    offering.course_id.as_str(),
                    offering.semester.as_deref(),
                    offering.instructor_name.as_deref(),
                    offering.section.as_deref(),
                    offering.room.as_deref(),
                    offering.campus.as_deref(),
                    offering.mode.as_str(),
                    i64::from(offering.capacity),
                    0_i64,
                    offering.status.as_str(),
                    to_json_text(&offering.meetings)?,
                    offering.notes.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| classify_write_error(e, &format!("class code {}", offering.class_code)))?;

        self.record(
            Some(actor),
            EntityType::ClassOffering,
            &id,
            AuditAction::Created,
            Some(&offering),
        )
        .await?;
        tracing::info!(class_id = %id, class_code = %offering.class_code, capacity = offering.capacity, "class offering created");
        Ok(offering)
    }

    pub async fn get_class_offering(&self, id: &str) -> Result<ClassOffering, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM class_offerings WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::ClassOffering, id))?;
        row_to_offering(&row)
    }

    /// Offerings ordered by semester (latest first), then class code.
    pub async fn list_class_offerings(
        &self,
        filter: &OfferingFilter,
        page: PageRequest,
    ) -> Result<Page<ClassOffering>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(ref course_id) = filter.course_id {
            params.push(libsql::Value::Text(course_id.clone()));
            conditions.push(format!("course_id = ?{}", params.len()));
        }
        if let Some(ref semester) = filter.semester {
            params.push(libsql::Value::Text(semester.clone()));
            conditions.push(format!("semester = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total = self
            .db()
            .count(
                &format!("SELECT COUNT(*) FROM class_offerings {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM class_offerings {where_clause}
                     ORDER BY semester DESC, class_code LIMIT {} OFFSET {}",
                    page.limit,
                    page.offset()
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut offerings = Vec::new();
        while let Some(row) = rows.next().await? {
            offerings.push(row_to_offering(&row)?);
        }
        Ok(page.wrap(offerings, total))
    }

    /// Open offerings that still have a free seat, with their course.
    pub async fn list_available_offerings(
        &self,
        filter: &AvailableFilter,
    ) -> Result<Vec<AvailableOffering>, DatabaseError> {
        let mut conditions = vec![
            "o.status = 'open'".to_string(),
            "(o.capacity = 0 OR o.enrolled_count < o.capacity)".to_string(),
        ];
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(ref course_id) = filter.course_id {
            params.push(libsql::Value::Text(course_id.clone()));
            conditions.push(format!("o.course_id = ?{}", params.len()));
        }
        if let Some(ref semester) = filter.semester {
            params.push(libsql::Value::Text(semester.clone()));
            conditions.push(format!("o.semester = ?{}", params.len()));
        }

        let sql = format!(
            "SELECT {}, {} FROM class_offerings o
             LEFT JOIN courses c ON c.id = o.course_id
             WHERE {}
             ORDER BY o.semester DESC, o.class_code",
            qualified(SELECT_COLS, "o"),
            qualified(super::course::SELECT_COLS, "c"),
            conditions.join(" AND ")
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut available = Vec::new();
        while let Some(row) = rows.next().await? {
            let class_offering = row_to_offering(&row)?;
            let course = match row.get::<Option<String>>(COLUMN_COUNT)? {
                Some(_) => Some(super::course::row_to_course_at(&row, COLUMN_COUNT)?),
                None => None,
            };
            available.push(AvailableOffering {
                remaining_seats: class_offering.remaining_seats(),
                class_offering,
                course,
            });
        }
        tracing::debug!(count = available.len(), "listed available offerings");
        Ok(available)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown offering.
    pub async fn update_class_offering(
        &self,
        actor: &Principal,
        class_id: &str,
        update: ClassOfferingUpdate,
    ) -> Result<ClassOffering, DatabaseError> {
        let current = self.get_class_offering(class_id).await?;
        let mut set = SetClause::default();
        update.apply(&mut set)?;
        if set.is_empty() {
            return Ok(current);
        }

        let (sql, params) = set.into_update("class_offerings", class_id, Utc::now());
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| classify_write_error(e, &format!("class offering {class_id}")))?;

        let updated = self.get_class_offering(class_id).await?;
        self.record(
            Some(actor),
            EntityType::ClassOffering,
            class_id,
            AuditAction::Updated,
            Some(&update),
        )
        .await?;
        tracing::info!(class_id, "class offering updated");
        Ok(updated)
    }

    /// Change an offering's capacity. The new capacity may not fall below
    /// the seats already taken; 0 lifts the limit.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown offering, `Conflict` when `capacity` is
    /// below the current enrolled count.
    pub async fn set_capacity(
        &self,
        actor: &Principal,
        class_id: &str,
        capacity: u32,
    ) -> Result<ClassOffering, DatabaseError> {
        let current = self.get_class_offering(class_id).await?;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE class_offerings SET capacity = ?1, updated_at = ?2
                 WHERE id = ?3 AND (?1 = 0 OR enrolled_count <= ?1)",
                libsql::params![i64::from(capacity), Utc::now().to_rfc3339(), class_id],
            )
            .await?;
        if changed == 0 {
            let latest = self.get_class_offering(class_id).await?;
            return Err(DatabaseError::Conflict(format!(
                "capacity {capacity} is below the {} seat(s) taken in {}",
                latest.enrolled_count, latest.class_code
            )));
        }

        let updated = self.get_class_offering(class_id).await?;
        self.record(
            Some(actor),
            EntityType::ClassOffering,
            class_id,
            AuditAction::Updated,
            Some(&serde_json::json!({ "capacity": { "from": current.capacity, "to": capacity } })),
        )
        .await?;
        tracing::info!(class_id, from = current.capacity, to = capacity, "capacity changed");
        Ok(updated)
    }

    /// Delete an offering that no enrollment row references.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown offering, `Conflict` while enrollments exist.
    pub async fn delete_class_offering(
        &self,
        actor: &Principal,
        class_id: &str,
    ) -> Result<DeleteResponse, DatabaseError> {
        let offering = self.get_class_offering(class_id).await?;
        let enrollments = self
            .db()
            .count("SELECT COUNT(*) FROM enrollments WHERE class_id = ?1", [class_id])
            .await?;
        if enrollments > 0 {
            return Err(DatabaseError::Conflict(format!(
                "class offering {} has {enrollments} enrollment(s)",
                offering.class_code
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM class_offerings WHERE id = ?1", [class_id])
            .await
            .map_err(|e| classify_write_error(e, &format!("class offering {}", offering.class_code)))?;
        self.record::<()>(
            Some(actor),
            EntityType::ClassOffering,
            class_id,
            AuditAction::Deleted,
            None,
        )
        .await?;
        tracing::info!(class_id, "class offering deleted");
        Ok(DeleteResponse {
            entity_type: EntityType::ClassOffering,
            id: class_id.to_string(),
            deleted: true,
        })
    }
}
