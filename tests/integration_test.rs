//! End-to-end flows through both stores: the registration scenario from
//! the product contract, a full enroll-learn-quiz-certificate run, and
//! persistence across reopen (including a corrupted session file).

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;
use chrono::Utc;

use learnhub::models::Role;
use learnhub::seed;
use learnhub::sim::clock::ManualClock;
use learnhub::sim::{Clock, PaymentError, PaymentGateway};
use learnhub::store::{LocalStore, Stores};

#[test]
fn registration_and_login_scenario() {
    let stores = Stores::in_memory();

    // register Jane -> ok
    let jane = stores
        .identity
        .register("Jane", "jane@x.com", "secret1", Role::Student)
        .expect("first registration succeeds");
    assert_eq!(jane.name, "Jane");

    // register again with the same email -> rejected
    assert!(stores
        .identity
        .register("Jane 2", "jane@x.com", "other", Role::Student)
        .is_err());

    // login with the original credentials -> ok, name preserved
    stores.identity.logout().unwrap();
    let user = stores
        .identity
        .login("jane@x.com", "secret1")
        .expect("login succeeds");
    assert!(stores.identity.is_authenticated());
    assert_eq!(user.name, "Jane");
}

#[test]
fn enroll_learn_quiz_certificate_flow() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    ));
    let stores = Stores::with_parts(
        Arc::new(LocalStore::in_memory()),
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    seed::seed_demo_users(&stores);
    seed::seed_demo_catalog(&stores).unwrap();

    let student = stores
        .identity
        .login("sam@learnhub.test", "learn-rust-2025")
        .unwrap();
    let course = stores
        .catalog
        .get_public_courses()
        .into_iter()
        .find(|course| course.is_free())
        .unwrap();

    stores.catalog.enroll_in_course(&student.id, &course.id).unwrap();

    // work through every lesson, one per day
    for lesson in course.ordered_lessons() {
        clock.advance(chrono::Duration::days(1));
        stores
            .catalog
            .update_progress(&student.id, &course.id, &lesson.id)
            .unwrap();
    }
    let progress = stores
        .catalog
        .get_course_progress(&student.id, &course.id)
        .unwrap();
    assert_eq!(progress.progress_percentage, 100);
    assert_eq!(progress.last_accessed, clock.now());

    // take and pass the quiz
    let quiz = stores.catalog.get_quiz_for_course(&course.id).unwrap();
    let answers = quiz
        .questions
        .iter()
        .map(|question| (question.id.clone(), question.correct_option))
        .collect();
    let attempt = stores
        .catalog
        .save_quiz_attempt(&student.id, &course.id, answers, 240)
        .unwrap();
    assert!(attempt.passed);
    assert_eq!(attempt.user_id, student.id);

    // certificate carries the pinned issue time in its number
    let certificate = stores
        .catalog
        .generate_certificate(&student.id, &course.id, "Ada Moreno")
        .unwrap();
    assert_eq!(
        certificate.certificate_number,
        format!("CERT-{}", clock.now().timestamp_millis())
    );
    assert_eq!(certificate.course_name, course.title);
    assert_eq!(stores.catalog.get_certificates(&student.id).len(), 1);
}

#[tokio::test]
async fn paid_enrollment_goes_through_payment_gateway() {
    let stores = Stores::in_memory();
    seed::seed_demo_users(&stores);
    seed::seed_demo_catalog(&stores).unwrap();

    let course = stores
        .catalog
        .get_public_courses()
        .into_iter()
        .find(|course| !course.is_free())
        .unwrap();

    // declined payment leaves the student unenrolled
    let declining =
        PaymentGateway::seeded(Arc::clone(&stores.clock), 1.0, Duration::ZERO, 11);
    let declined = declining.charge("student-1", &course).await;
    assert!(matches!(declined, Err(PaymentError::Declined)));
    assert!(!stores.catalog.is_enrolled("student-1", &course.id));

    // retry against an accepting gateway, then enroll
    let accepting =
        PaymentGateway::seeded(Arc::clone(&stores.clock), 0.0, Duration::ZERO, 11);
    let receipt = accepting.charge("student-1", &course).await.unwrap();
    assert_eq!(receipt.amount, course.price);
    stores.catalog.enroll_in_course("student-1", &course.id).unwrap();
    assert!(stores.catalog.is_enrolled("student-1", &course.id));
}

#[test]
fn identity_survives_reopen_catalog_does_not() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    let course_id = {
        let stores = Stores::open(&session_file).unwrap();
        stores
            .identity
            .register("Jane", "jane@x.com", "secret1", Role::Student)
            .unwrap();
        seed::seed_demo_catalog(&stores).unwrap();
        stores.catalog.get_public_courses()[0].id.clone()
    };

    let reopened = Stores::open(&session_file).unwrap();
    // identity came back from the file
    assert!(reopened.identity.is_authenticated());
    assert_eq!(reopened.identity.current_user().unwrap().email, "jane@x.com");
    // catalog state is in-memory only and is gone
    assert!(reopened.catalog.get_course_by_id(&course_id).is_none());
    assert_eq!(reopened.catalog.course_count(), 0);
}

#[test]
fn corrupted_session_file_yields_empty_usable_store() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, "definitely not json {{{").unwrap();

    let stores = Stores::open(&session_file).unwrap();
    assert!(!stores.identity.is_authenticated());
    assert_eq!(stores.identity.registered_count(), 0);

    // the store still works and re-persists over the bad file
    stores
        .identity
        .register("Jane", "jane@x.com", "secret1", Role::Student)
        .unwrap();
    let reopened = Stores::open(&session_file).unwrap();
    assert_eq!(reopened.identity.registered_count(), 1);
}
