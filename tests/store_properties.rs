//! Property-based tests for the identity and catalog stores.
//!
//! Covered invariants:
//! - progress percentage always equals round(completed/total * 100)
//! - update_progress is idempotent per lesson
//! - enrollment adds a course to the enrolled list exactly once
//! - registration with a used email never mutates the roster
//! - quiz scores stay within 0..=100 and match the correct-answer count

use proptest::prelude::*;

use learnhub::models::{CourseLevel, LessonKind, Role};
use learnhub::quiz;
use learnhub::store::catalog::{CourseDraft, LessonDraft, QuestionDraft, QuizDraft};
use learnhub::store::Stores;

// ============================================================================
// Helpers
// ============================================================================

fn course_draft(lesson_count: usize) -> CourseDraft {
    CourseDraft {
        title: "Property course".to_string(),
        description: String::new(),
        thumbnail: String::new(),
        instructor_id: "instructor-1".to_string(),
        price: 0.0,
        duration_minutes: 60,
        level: CourseLevel::Beginner,
        category: "testing".to_string(),
        lessons: (0..lesson_count)
            .map(|i| LessonDraft {
                title: format!("Lesson {i}"),
                description: String::new(),
                kind: LessonKind::Video,
                content: format!("lesson-{i}"),
                duration_minutes: None,
                order: i as u32 + 1,
            })
            .collect(),
        is_public: true,
    }
}

// ============================================================================
// Progress invariants
// ============================================================================

proptest! {
    #[test]
    fn progress_percentage_matches_unique_completions(
        lesson_count in 1usize..15,
        completions in prop::collection::vec(0usize..15, 0..40),
    ) {
        let stores = Stores::in_memory();
        let course = stores.catalog.create_course(course_draft(lesson_count)).unwrap();
        stores.catalog.enroll_in_course("student-1", &course.id).unwrap();

        let mut completed = std::collections::HashSet::new();
        for index in completions {
            let lesson = &course.lessons[index % lesson_count];
            stores
                .catalog
                .update_progress("student-1", &course.id, &lesson.id)
                .unwrap();
            completed.insert(lesson.id.clone());

            let progress = stores
                .catalog
                .get_course_progress("student-1", &course.id)
                .unwrap();
            let expected =
                ((completed.len() as f64 / lesson_count as f64) * 100.0).round() as u32;
            prop_assert_eq!(progress.progress_percentage, expected);
            prop_assert_eq!(progress.completed_lessons.len(), completed.len());
        }
    }

    #[test]
    fn repeating_a_lesson_never_changes_percentage(
        lesson_count in 1usize..10,
        lesson_index in 0usize..10,
        repeats in 1usize..5,
    ) {
        let stores = Stores::in_memory();
        let course = stores.catalog.create_course(course_draft(lesson_count)).unwrap();
        stores.catalog.enroll_in_course("student-1", &course.id).unwrap();

        let lesson = &course.lessons[lesson_index % lesson_count];
        let first = stores
            .catalog
            .update_progress("student-1", &course.id, &lesson.id)
            .unwrap();
        for _ in 0..repeats {
            let again = stores
                .catalog
                .update_progress("student-1", &course.id, &lesson.id)
                .unwrap();
            prop_assert_eq!(again.progress_percentage, first.progress_percentage);
        }
    }
}

// ============================================================================
// Enrollment invariants
// ============================================================================

proptest! {
    #[test]
    fn enrollment_adds_course_exactly_once(extra_attempts in 0usize..4) {
        let stores = Stores::in_memory();
        let course = stores.catalog.create_course(course_draft(1)).unwrap();

        let before = stores.catalog.get_enrolled_courses("student-1").len();
        stores.catalog.enroll_in_course("student-1", &course.id).unwrap();

        for _ in 0..extra_attempts {
            prop_assert!(stores.catalog.enroll_in_course("student-1", &course.id).is_err());
        }

        let enrolled = stores.catalog.get_enrolled_courses("student-1");
        prop_assert_eq!(enrolled.len(), before + 1);
        prop_assert_eq!(
            enrolled.iter().filter(|c| c.id == course.id).count(),
            1
        );
    }
}

// ============================================================================
// Registration invariants
// ============================================================================

proptest! {
    #[test]
    fn duplicate_registration_never_mutates_roster(
        emails in prop::collection::vec(0u8..5, 1..20),
    ) {
        let stores = Stores::in_memory();
        let mut seen = std::collections::HashSet::new();

        for suffix in emails {
            let email = format!("user{suffix}@x.com");
            let result = stores
                .identity
                .register("User", &email, "password", Role::Student);

            if seen.insert(email) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
            prop_assert_eq!(stores.identity.registered_count(), seen.len());
        }
    }
}

// ============================================================================
// Quiz grading invariants
// ============================================================================

fn arb_quiz_and_answers() -> impl Strategy<Value = (Vec<usize>, Vec<Option<usize>>)> {
    (1usize..10).prop_flat_map(|len| {
        (
            prop::collection::vec(0usize..4, len..=len),
            prop::collection::vec(prop::option::of(0usize..4), len..=len),
        )
    })
}

proptest! {
    #[test]
    fn quiz_score_matches_correct_count((correct, chosen) in arb_quiz_and_answers()) {
        let stores = Stores::in_memory();
        let course = stores.catalog.create_course(course_draft(0)).unwrap();
        let quiz = stores
            .catalog
            .set_course_quiz(
                "instructor-1",
                &course.id,
                QuizDraft {
                    title: "Generated quiz".to_string(),
                    questions: correct
                        .iter()
                        .map(|&option| QuestionDraft {
                            prompt: "q".to_string(),
                            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                            correct_option: option,
                        })
                        .collect(),
                    passing_score: 70,
                },
            )
            .unwrap();

        let answers: std::collections::HashMap<String, usize> = quiz
            .questions
            .iter()
            .zip(chosen.iter())
            .filter_map(|(question, pick)| pick.map(|p| (question.id.clone(), p)))
            .collect();

        let expected_correct = quiz
            .questions
            .iter()
            .filter(|question| answers.get(&question.id) == Some(&question.correct_option))
            .count();

        let result = quiz::grade(&quiz, &answers);
        prop_assert_eq!(result.correct, expected_correct);
        prop_assert!(result.score <= 100);
        let expected_score = ((expected_correct as f64 / quiz.questions.len() as f64) * 100.0)
            .round() as u32;
        prop_assert_eq!(result.score, expected_score);
        prop_assert_eq!(result.passed, result.score >= 70);
    }
}
