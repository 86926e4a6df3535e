//! Ledger, capacity and GPA properties exercised through the public API.
//!
//! - Capacity: concurrent enrolls from separate handles against a 1-seat class
//! - Ledger: one row per pair, stable id across drop/re-enroll
//! - Seat accounting across drop/enroll/drop and repeated drops
//! - GPA: worked examples and idempotent recomputation
//! - Deletion guards leave both records intact

use futures::future::join_all;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use reg_core::entities::{ClassOffering, Course, Student};
use reg_core::enums::{EnrollmentStatus, OfferingStatus, Role};
use reg_core::errors::ErrorKind;
use reg_core::gpa::GpaSummary;
use reg_core::identity::Principal;
use reg_db::service::RegistrarService;
use reg_db::updates::class_offering::NewClassOffering;
use reg_db::updates::course::NewCourse;
use reg_db::updates::grade::GradeEntry;
use reg_db::updates::student::NewStudent;

async fn test_service() -> RegistrarService {
    RegistrarService::new_local(":memory:").await.unwrap()
}

fn admin() -> Principal {
    Principal::new("acc-registrar", Role::Admin)
}

async fn course(svc: &RegistrarService, code: &str, credits: u32) -> Course {
    svc.create_course(&admin(), NewCourse::new(code, code).with_credits(credits))
        .await
        .unwrap()
}

async fn offering(svc: &RegistrarService, course: &Course, code: &str, capacity: u32) -> ClassOffering {
    svc.create_class_offering(
        &admin(),
        NewClassOffering::new(code, course.id.as_str())
            .with_capacity(capacity)
            .with_semester("2026-fall")
            .with_status(OfferingStatus::Open),
    )
    .await
    .unwrap()
}

async fn student(svc: &RegistrarService, number: &str) -> (Student, Principal) {
    let mut new = NewStudent::new(number, "Student", number);
    new.email = Some(format!("{}@uni.edu", number.to_lowercase()));
    let student = svc.create_student(&admin(), new).await.unwrap();
    let principal = Principal::new(student.account_id.clone().unwrap(), Role::Student);
    (student, principal)
}

async fn enrolled_count(svc: &RegistrarService, class_id: &str) -> u32 {
    svc.get_class_offering(class_id).await.unwrap().enrolled_count
}

fn grade(grade_point: f64) -> GradeEntry {
    GradeEntry {
        grade_point: Some(grade_point),
        ..GradeEntry::default()
    }
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// Setup handle plus one extra handle per request, all on one database file.
async fn shared_store(dir: &TempDir, handles: usize) -> (RegistrarService, Vec<RegistrarService>) {
    let path = dir.path().join("registrar.db");
    let path = path.to_str().unwrap();
    let setup = RegistrarService::new_local(path).await.unwrap();
    let mut pool = Vec::with_capacity(handles);
    for _ in 0..handles {
        pool.push(RegistrarService::new_local(path).await.unwrap());
    }
    (setup, pool)
}

/// Enroll each student from its own task and handle.
async fn enroll_concurrently(
    pool: Vec<RegistrarService>,
    students: Vec<(Student, Principal)>,
    class_id: &str,
) -> Vec<Result<(), ErrorKind>> {
    let tasks = pool.into_iter().zip(students).map(|(svc, (s, p))| {
        let class_id = class_id.to_string();
        tokio::spawn(async move {
            svc.enroll(&p, &s.id, &class_id, None)
                .await
                .map(|_| ())
                .map_err(|e| e.kind())
        })
    });
    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrolls_fill_exactly_one_seat() {
    let dir = TempDir::new().unwrap();
    let (svc, pool) = shared_store(&dir, 8).await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 1).await;

    let mut students = Vec::new();
    for n in 0..pool.len() {
        students.push(student(&svc, &format!("SV{n:03}")).await);
    }
    let attempts = students.len();

    let results = enroll_concurrently(pool, students, &class.id).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let full = results
        .iter()
        .filter(|r| **r == Err(ErrorKind::CapacityExceeded))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(full, attempts - 1);
    assert_eq!(enrolled_count(&svc, &class.id).await, 1);

    let roster = svc.list_for_class(&class.id).await.unwrap();
    assert_eq!(roster.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrolls_into_roomy_class_all_succeed() {
    let dir = TempDir::new().unwrap();
    let (svc, pool) = shared_store(&dir, 6).await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 20).await;

    let mut students = Vec::new();
    for n in 0..pool.len() {
        students.push(student(&svc, &format!("SV{n:03}")).await);
    }

    let results = enroll_concurrently(pool, students, &class.id).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(enrolled_count(&svc, &class.id).await, 6);
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reenroll_after_drop_keeps_the_same_row() {
    let svc = test_service().await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 10).await;
    let (s, p) = student(&svc, "SV001").await;

    let first = svc.enroll(&p, &s.id, &class.id, None).await.unwrap();
    let id = first.enrollment.enrollment.id.clone();
    svc.drop_enrollment(&p, &id, &s.id).await.unwrap();
    let second = svc.enroll(&p, &s.id, &class.id, None).await.unwrap();

    assert!(second.reenrolled);
    assert_eq!(second.enrollment.enrollment.id, id);
    let rows = svc
        .list_for_student(&s.id, &reg_db::repos::enrollment::EnrollmentFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn drop_enroll_drop_is_net_zero() {
    let svc = test_service().await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 10).await;
    let (s, p) = student(&svc, "SV001").await;
    let id = svc
        .enroll(&p, &s.id, &class.id, None)
        .await
        .unwrap()
        .enrollment
        .enrollment
        .id;

    svc.drop_enrollment(&p, &id, &s.id).await.unwrap();
    let baseline = enrolled_count(&svc, &class.id).await;
    svc.enroll(&p, &s.id, &class.id, None).await.unwrap();
    svc.drop_enrollment(&p, &id, &s.id).await.unwrap();
    assert_eq!(enrolled_count(&svc, &class.id).await, baseline);

    let err = svc.drop_enrollment(&p, &id, &s.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyDropped);
    assert_eq!(enrolled_count(&svc, &class.id).await, baseline);
}

#[tokio::test]
async fn reconcile_agrees_with_ledger_after_mixed_activity() {
    let svc = test_service().await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 10).await;
    let mut ids = Vec::new();
    for n in ["SV001", "SV002", "SV003"] {
        let (s, p) = student(&svc, n).await;
        let id = svc
            .enroll(&p, &s.id, &class.id, None)
            .await
            .unwrap()
            .enrollment
            .enrollment
            .id;
        ids.push((id, s, p));
    }
    let (id, s, p) = &ids[0];
    svc.drop_enrollment(p, id, &s.id).await.unwrap();
    svc.assign_enrollment_status(&admin(), &ids[1].0, EnrollmentStatus::Waitlist, None)
        .await
        .unwrap();

    let response = svc.reconcile_enrolled_count(&admin(), &class.id).await.unwrap();
    assert_eq!(response.before, 1);
    assert_eq!(response.after, 1);
}

// ---------------------------------------------------------------------------
// GPA
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gpa_worked_examples() {
    let svc = test_service().await;
    let three = course(&svc, "CS101", 3).await;
    let two = course(&svc, "PE100", 2).await;
    let a = offering(&svc, &three, "CS101-01", 10).await;
    let b = offering(&svc, &two, "PE100-01", 10).await;
    let (s, p) = student(&svc, "SV001").await;

    let first = svc
        .enroll(&p, &s.id, &a.id, None)
        .await
        .unwrap()
        .enrollment
        .enrollment
        .id;
    let response = svc.enter_grade(&admin(), &first, grade(3.5)).await.unwrap();
    assert_eq!(
        response.gpa,
        GpaSummary {
            gpa: 3.5,
            total_credits: 3,
            total_points: 10.5,
            enrollments_count: 1,
        }
    );

    svc.enter_grade(&admin(), &first, grade(4.0)).await.unwrap();
    let second = svc
        .enroll(&p, &s.id, &b.id, None)
        .await
        .unwrap()
        .enrollment
        .enrollment
        .id;
    let response = svc.enter_grade(&admin(), &second, grade(0.0)).await.unwrap();
    assert_eq!(response.gpa.gpa, 4.0);
    assert_eq!(response.gpa.total_credits, 3);

    let again = svc.recompute_gpa(&p, &s.id).await.unwrap();
    assert_eq!(again.summary, response.gpa);
    assert_eq!(svc.get_student(&s.id).await.unwrap().gpa, Some(4.0));
}

// ---------------------------------------------------------------------------
// Deletion guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn course_with_offering_cannot_be_deleted() {
    let svc = test_service().await;
    let c = course(&svc, "CS101", 3).await;
    let class = offering(&svc, &c, "CS101-01", 10).await;

    let err = svc.delete_course(&admin(), &c.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(svc.get_course(&c.id).await.unwrap(), c);
    assert_eq!(svc.get_class_offering(&class.id).await.unwrap(), class);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registrar.db");
    let path = path.to_str().unwrap();

    let (class_id, student_id) = {
        let svc = RegistrarService::new_local(path).await.unwrap();
        let c = course(&svc, "CS101", 3).await;
        let class = offering(&svc, &c, "CS101-01", 10).await;
        let (s, p) = student(&svc, "SV001").await;
        svc.enroll(&p, &s.id, &class.id, None).await.unwrap();
        (class.id, s.id)
    };

    let svc = RegistrarService::new_local(path).await.unwrap();
    assert_eq!(enrolled_count(&svc, &class_id).await, 1);
    assert!(svc.find_enrollment(&student_id, &class_id).await.unwrap().is_some());
}
