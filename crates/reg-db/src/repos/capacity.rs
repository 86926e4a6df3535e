//! Capacity controller.
//!
//! Every change to `class_offerings.enrolled_count` goes through here. A seat
//! is reserved with a single conditional UPDATE, so two concurrent requests
//! for the last seat cannot both succeed: the store applies one and reports
//! zero changed rows for the other.

use chrono::Utc;

use reg_core::audit_detail::SeatsReconciledDetail;
use reg_core::enums::{AuditAction, EntityType, EnrollmentStatus};
use reg_core::identity::Principal;
use reg_core::responses::ReconcileResponse;

use crate::error::DatabaseError;
use crate::helpers::status_in_list;
use crate::service::RegistrarService;

/// Ledger statuses that occupy a seat.
pub(crate) const SEAT_HOLDING: [EnrollmentStatus; 3] = [
    EnrollmentStatus::Registered,
    EnrollmentStatus::Auditing,
    EnrollmentStatus::Completed,
];

impl RegistrarService {
    /// Take one seat in `class_id`. Returns the new enrolled count.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if the offering is full, `NotFound` if it does not
    /// exist.
    pub async fn try_reserve_seat(&self, class_id: &str) -> Result<u32, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE class_offerings
                 SET enrolled_count = enrolled_count + 1, updated_at = ?2
                 WHERE id = ?1 AND (capacity = 0 OR enrolled_count < capacity)",
                libsql::params![class_id, Utc::now().to_rfc3339()],
            )
            .await?;

        if changed == 0 {
            // Distinguish a full offering from a missing one.
            let offering = self.get_class_offering(class_id).await?;
            tracing::warn!(
                class_id,
                capacity = offering.capacity,
                enrolled_count = offering.enrolled_count,
                "seat reservation rejected: class is full"
            );
            return Err(DatabaseError::CapacityExceeded {
                class_id: class_id.to_string(),
            });
        }

        let count = self.enrolled_count(class_id).await?;
        tracing::debug!(class_id, enrolled_count = count, "seat reserved");
        Ok(count)
    }

    /// Give back one seat in `class_id`, never going below zero. Returns the
    /// new enrolled count.
    ///
    /// # Errors
    ///
    /// `NotFound` if the offering does not exist.
    pub async fn release_seat(&self, class_id: &str) -> Result<u32, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE class_offerings
                 SET enrolled_count = MAX(enrolled_count - 1, 0), updated_at = ?2
                 WHERE id = ?1",
                libsql::params![class_id, Utc::now().to_rfc3339()],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::ClassOffering, class_id));
        }

        let count = self.enrolled_count(class_id).await?;
        tracing::debug!(class_id, enrolled_count = count, "seat released");
        Ok(count)
    }

    /// Reset `enrolled_count` to the number of seat-holding ledger rows.
    ///
    /// # Errors
    ///
    /// `NotFound` if the offering does not exist.
    pub async fn reconcile_enrolled_count(
        &self,
        actor: &Principal,
        class_id: &str,
    ) -> Result<ReconcileResponse, DatabaseError> {
        let before = self.get_class_offering(class_id).await?.enrolled_count;

        let in_list = status_in_list(&SEAT_HOLDING);

        self.db()
            .conn()
            .execute(
                &format!(
                    "UPDATE class_offerings
                     SET enrolled_count = (
                         SELECT COUNT(*) FROM enrollments
                         WHERE class_id = ?1 AND status IN ({in_list})
                     ),
                     updated_at = ?2
                     WHERE id = ?1"
                ),
                libsql::params![class_id, Utc::now().to_rfc3339()],
            )
            .await?;
        let after = self.enrolled_count(class_id).await?;

        if before != after {
            tracing::warn!(class_id, before, after, "enrolled count drifted from ledger");
        }
        self.record(
            Some(actor),
            EntityType::ClassOffering,
            class_id,
            AuditAction::SeatsReconciled,
            Some(&SeatsReconciledDetail { before, after }),
        )
        .await?;

        Ok(ReconcileResponse {
            class_id: class_id.to_string(),
            before,
            after,
        })
    }

    pub(crate) async fn enrolled_count(&self, class_id: &str) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .count(
                "SELECT enrolled_count FROM class_offerings WHERE id = ?1",
                [class_id],
            )
            .await
            .map_err(|e| match e {
                DatabaseError::NoResult => DatabaseError::not_found(EntityType::ClassOffering, class_id),
                other => other,
            })?;
        u32::try_from(count)
            .map_err(|_| DatabaseError::InvalidState(format!("enrolled count out of range: {count}")))
    }
}
