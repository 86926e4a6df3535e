//! Shared test utilities for reg-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use reg_core::entities::{ClassOffering, Course, Student};
    use reg_core::enums::{OfferingStatus, Role};
    use reg_core::identity::Principal;

    use crate::RegistrarDb;
    use crate::service::RegistrarService;
    use crate::updates::class_offering::NewClassOffering;
    use crate::updates::course::NewCourse;
    use crate::updates::student::NewStudent;

    /// Create an in-memory RegistrarService.
    pub async fn test_service() -> RegistrarService {
        let db = RegistrarDb::open_local(":memory:").await.unwrap();
        RegistrarService::from_db(db)
    }

    pub fn admin() -> Principal {
        Principal::new("acc-admin001", Role::Admin)
    }

    pub async fn seed_course(svc: &RegistrarService, code: &str, credits: u32) -> Course {
        svc.create_course(&admin(), NewCourse::new(code, format!("{code} title")).with_credits(credits))
            .await
            .unwrap()
    }

    /// Open offering of `course` with the given capacity in semester `2026-fall`.
    pub async fn seed_offering(
        svc: &RegistrarService,
        course: &Course,
        class_code: &str,
        capacity: u32,
    ) -> ClassOffering {
        svc.create_class_offering(
            &admin(),
            NewClassOffering::new(class_code, course.id.as_str())
                .with_capacity(capacity)
                .with_semester("2026-fall")
                .with_status(OfferingStatus::Open),
        )
        .await
        .unwrap()
    }

    /// Student with a linked account; returns the student and its principal.
    pub async fn seed_student(svc: &RegistrarService, number: &str) -> (Student, Principal) {
        let mut new = NewStudent::new(number, "Test", number);
        new.email = Some(format!("{}@example.edu", number.to_lowercase()));
        let student = svc.create_student(&admin(), new).await.unwrap();
        let account_id = student.account_id.clone().unwrap();
        (student, Principal::new(account_id, Role::Student))
    }
}
