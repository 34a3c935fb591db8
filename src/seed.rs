//! Demo data seeding for the binary and for integration tests.

use crate::models::{CourseLevel, LessonKind, Role};
use crate::store::catalog::{CourseDraft, LessonDraft, QuestionDraft, QuizDraft};
use crate::store::{CatalogError, Stores};

struct DemoUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "Ada Moreno",
        email: "ada@learnhub.test",
        password: "teach-rust-2025",
        role: Role::Instructor,
    },
    DemoUser {
        name: "Sam Okafor",
        email: "sam@learnhub.test",
        password: "learn-rust-2025",
        role: Role::Student,
    },
];

/// Register the demo roster if the store is empty. Leaves the session
/// logged out.
pub fn seed_demo_users(stores: &Stores) {
    if stores.identity.registered_count() > 0 {
        tracing::debug!("demo users already present, skipping seed");
        return;
    }

    for user in DEMO_USERS {
        match stores
            .identity
            .register(user.name, user.email, user.password, user.role)
        {
            Ok(registered) => tracing::info!(user_id = %registered.id, email = user.email, "seeded demo user"),
            Err(err) => tracing::warn!(email = user.email, error = %err, "failed to seed demo user"),
        }
    }

    if let Err(err) = stores.identity.logout() {
        tracing::warn!(error = %err, "failed to reset demo session");
    }
}

/// Create a couple of demo courses (one free with a quiz, one paid) owned
/// by the demo instructor. No-op if the catalog already has courses.
pub fn seed_demo_catalog(stores: &Stores) -> Result<(), CatalogError> {
    if stores.catalog.course_count() > 0 {
        tracing::debug!("catalog already seeded, skipping");
        return Ok(());
    }

    let instructor_id = demo_instructor_id(stores);

    let rust_course = stores.catalog.create_course(CourseDraft {
        title: "Rust Fundamentals".to_string(),
        description: "Ownership, borrowing, and the type system from scratch.".to_string(),
        thumbnail: "https://cdn.learnhub.test/rust-fundamentals.png".to_string(),
        instructor_id: instructor_id.clone(),
        price: 0.0,
        duration_minutes: 180,
        level: CourseLevel::Beginner,
        category: "programming".to_string(),
        lessons: vec![
            LessonDraft {
                title: "Hello, cargo".to_string(),
                description: "Toolchain setup and the first build.".to_string(),
                kind: LessonKind::Video,
                content: "https://cdn.learnhub.test/rust-01.mp4".to_string(),
                duration_minutes: Some(12),
                order: 1,
            },
            LessonDraft {
                title: "Ownership".to_string(),
                description: "Moves, clones, and drops.".to_string(),
                kind: LessonKind::Video,
                content: "https://cdn.learnhub.test/rust-02.mp4".to_string(),
                duration_minutes: Some(18),
                order: 2,
            },
            LessonDraft {
                title: "Borrow checker cheat sheet".to_string(),
                description: "Printable reference.".to_string(),
                kind: LessonKind::Pdf,
                content: "https://cdn.learnhub.test/rust-borrowing.pdf".to_string(),
                duration_minutes: None,
                order: 3,
            },
        ],
        is_public: true,
    })?;

    stores.catalog.set_course_quiz(
        &instructor_id,
        &rust_course.id,
        QuizDraft {
            title: "Rust Fundamentals final quiz".to_string(),
            questions: vec![
                QuestionDraft {
                    prompt: "Which keyword introduces a binding?".to_string(),
                    options: vec!["var".into(), "let".into(), "def".into()],
                    correct_option: 1,
                },
                QuestionDraft {
                    prompt: "What happens to a moved value?".to_string(),
                    options: vec![
                        "it is copied".into(),
                        "it can no longer be used".into(),
                        "it is garbage collected".into(),
                    ],
                    correct_option: 1,
                },
            ],
            passing_score: 70,
        },
    )?;

    stores.catalog.create_course(CourseDraft {
        title: "Async Rust in Production".to_string(),
        description: "Executors, pinning, and structured cancellation.".to_string(),
        thumbnail: "https://cdn.learnhub.test/async-rust.png".to_string(),
        instructor_id,
        price: 59.0,
        duration_minutes: 240,
        level: CourseLevel::Advanced,
        category: "programming".to_string(),
        lessons: vec![LessonDraft {
            title: "Futures under the hood".to_string(),
            description: "Poll, wake, repeat.".to_string(),
            kind: LessonKind::Video,
            content: "https://cdn.learnhub.test/async-01.mp4".to_string(),
            duration_minutes: Some(25),
            order: 1,
        }],
        is_public: true,
    })?;

    tracing::info!(courses = stores.catalog.course_count(), "seeded demo catalog");
    Ok(())
}

fn demo_instructor_id(stores: &Stores) -> String {
    // the seeded instructor if present, otherwise a fixed placeholder id
    stores
        .identity
        .find_by_email(DEMO_USERS[0].email)
        .map(|user| user.id)
        .unwrap_or_else(|| "instructor-demo".to_string())
}
