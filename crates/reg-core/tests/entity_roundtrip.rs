//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use reg_core::audit_detail::{EnrolledDetail, GradedDetail, StatusChangedDetail};
use reg_core::entities::*;
use reg_core::enums::*;
use reg_core::errors::ErrorKind;
use reg_core::gpa::GpaSummary;
use reg_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_course() -> Course {
    Course {
        id: "crs-a3f8b2c1".into(),
        code: "CS101".into(),
        title: "Intro to Programming".into(),
        description: Some("Fundamentals".into()),
        credits: 3,
        contact_hours: Some(45),
        subject_area: Some("Computer Science".into()),
        faculty: Some("Engineering".into()),
        prerequisites: vec!["MATH100".into()],
        syllabus_url: None,
        status: CourseStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_offering() -> ClassOffering {
    ClassOffering {
        id: "cls-0b1c2d3e".into(),
        class_code: "CS101-01".into(),
        course_id: "crs-a3f8b2c1".into(),
        semester: Some("2026-fall".into()),
        instructor_name: Some("Dr. Tran".into()),
        section: Some("01".into()),
        room: Some("B204".into()),
        campus: None,
        mode: DeliveryMode::Hybrid,
        capacity: 30,
        enrolled_count: 12,
        status: OfferingStatus::Open,
        meetings: vec![Meeting {
            day_of_week: Weekday::Tuesday,
            start_time: Some("09:00".into()),
            end_time: Some("10:30".into()),
            room: Some("B204".into()),
            building: Some("B".into()),
        }],
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_enrollment() -> Enrollment {
    Enrollment {
        id: "enr-11223344".into(),
        student_id: "stu-55667788".into(),
        class_id: "cls-0b1c2d3e".into(),
        status: EnrollmentStatus::Completed,
        semester: Some("2026-fall".into()),
        score_breakdown: vec![ScoreEntry {
            label: "Midterm".into(),
            score: 82.5,
            max_score: Some(100.0),
            weight: Some(0.4),
            recorded_by: "acc-00000001".into(),
            recorded_at: Utc::now(),
        }],
        final_score: Some(88.0),
        letter_grade: Some("B+".into()),
        grade_point: Some(3.5),
        graded_by: Some("acc-00000001".into()),
        graded_at: Some(Utc::now()),
        registered_at: Utc::now(),
        completed_at: Some(Utc::now()),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    account_roundtrip,
    Account,
    Account {
        id: "acc-00000001".into(),
        email: "registrar@example.edu".into(),
        role: Role::Admin,
        status: AccountStatus::Active,
        display_name: Some("Registrar".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    student_roundtrip,
    Student,
    Student {
        id: "stu-55667788".into(),
        student_number: "SV2026001".into(),
        account_id: Some("acc-00000002".into()),
        first_name: "Linh".into(),
        last_name: "Nguyen".into(),
        middle_name: None,
        date_of_birth: NaiveDate::from_ymd_opt(2005, 3, 14),
        gender: Gender::Undisclosed,
        cohort_year: Some(2026),
        enrollment_year: Some(2026),
        status: StudentStatus::Active,
        is_active: true,
        email: Some("linh@example.edu".into()),
        phone: None,
        current_semester: Some("2026-fall".into()),
        gpa: Some(3.42),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(course_roundtrip, Course, sample_course());
roundtrip_and_validate!(offering_roundtrip, ClassOffering, sample_offering());
roundtrip_and_validate!(enrollment_roundtrip, Enrollment, sample_enrollment());

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-99887766".into(),
        actor_id: Some("acc-00000002".into()),
        entity_type: EntityType::Enrollment,
        entity_id: "enr-11223344".into(),
        action: AuditAction::Dropped,
        detail: Some(
            serde_json::to_value(StatusChangedDetail {
                from: "registered".into(),
                to: "dropped".into(),
                reason: None,
            })
            .unwrap()
        ),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    enrolled_detail_roundtrip,
    EnrolledDetail,
    EnrolledDetail {
        class_id: "cls-0b1c2d3e".into(),
        semester: Some("2026-fall".into()),
        enrolled_count: 13,
    }
);

roundtrip_and_validate!(
    graded_detail_roundtrip,
    GradedDetail,
    GradedDetail {
        final_score: Some(88.0),
        letter_grade: Some("B+".into()),
        grade_point: Some(3.5),
        components: 1,
    }
);

roundtrip_and_validate!(
    grade_response_roundtrip,
    GradeResponse,
    GradeResponse {
        enrollment: EnrollmentDetail {
            enrollment: sample_enrollment(),
            class_offering: Some(sample_offering()),
            course: Some(sample_course()),
            student: Some(StudentSummary {
                id: "stu-55667788".into(),
                student_number: "SV2026001".into(),
                first_name: "Linh".into(),
                last_name: "Nguyen".into(),
            }),
        },
        gpa: GpaSummary {
            gpa: 3.5,
            total_credits: 3,
            total_points: 10.5,
            enrollments_count: 1,
        },
    }
);

roundtrip_and_validate!(
    gpa_response_roundtrip,
    GpaResponse,
    GpaResponse {
        student: StudentSummary {
            id: "stu-55667788".into(),
            student_number: "SV2026001".into(),
            first_name: "Linh".into(),
            last_name: "Nguyen".into(),
        },
        summary: GpaSummary::empty(),
    }
);

roundtrip_and_validate!(
    available_offering_roundtrip,
    AvailableOffering,
    AvailableOffering {
        class_offering: sample_offering(),
        course: Some(sample_course()),
        remaining_seats: Some(18),
    }
);

roundtrip_and_validate!(
    failure_roundtrip,
    FailureResponse,
    FailureResponse::new(ErrorKind::AlreadyDropped, "enrollment enr-1 is already dropped")
);

#[test]
fn gpa_response_flattens_summary() {
    let response = GpaResponse {
        student: StudentSummary {
            id: "stu-1".into(),
            student_number: "SV1".into(),
            first_name: "A".into(),
            last_name: "B".into(),
        },
        summary: GpaSummary {
            gpa: 3.5,
            total_credits: 3,
            total_points: 10.5,
            enrollments_count: 1,
        },
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["gpa"], 3.5);
    assert_eq!(json["total_credits"], 3);
    assert_eq!(json["enrollments_count"], 1);
    assert_eq!(json["student"]["student_number"], "SV1");
}

#[test]
fn meeting_rejects_unknown_fields() {
    let raw = r#"{"day_of_week":"monday","start_time":"08:00","end_time":"09:00","room":null,"building":null,"lecturer":"x"}"#;
    assert!(serde_json::from_str::<Meeting>(raw).is_err());
}

#[test]
fn remaining_seats_respects_unlimited_capacity() {
    let mut offering = sample_offering();
    assert_eq!(offering.remaining_seats(), Some(18));
    assert!(offering.has_open_seat());

    offering.enrolled_count = 30;
    assert_eq!(offering.remaining_seats(), Some(0));
    assert!(!offering.has_open_seat());

    offering.capacity = 0;
    assert_eq!(offering.remaining_seats(), None);
    assert!(offering.has_open_seat());
}
