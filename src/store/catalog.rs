//! Catalog store: courses, enrollments, per-user progress, quizzes and
//! their attempts, certificates, and notes.
//!
//! Everything lives in memory behind one lock and is lost when the store
//! is dropped; only the identity store persists. Every mutation is a
//! synchronous, all-or-nothing transformation of the in-memory vectors.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    progress_percentage, Certificate, Course, CourseLevel, Enrollment, Lesson, LessonKind, Note,
    Progress, Question, Quiz, QuizAttempt,
};
use crate::quiz;
use crate::sim::Clock;
use crate::store::events::{EventHub, StoreEvent};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("course not found: {0}")]
    CourseNotFound(String),
    #[error("lesson not found: {0}")]
    LessonNotFound(String),
    #[error("quiz not found for course: {0}")]
    QuizNotFound(String),
    #[error("note not found: {0}")]
    NoteNotFound(String),
    #[error("user {user_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { user_id: String, course_id: String },
    #[error("user {user_id} is not enrolled in course {course_id}")]
    NotEnrolled { user_id: String, course_id: String },
    #[error("instructor {instructor_id} does not own course {course_id}")]
    NotCourseOwner {
        instructor_id: String,
        course_id: String,
    },
    #[error("course {0} has no passing quiz attempt")]
    CourseNotCompleted(String),
    #[error("invalid course: {0}")]
    InvalidCourse(String),
    #[error("invalid quiz: {0}")]
    InvalidQuiz(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

// ========== Drafts and partial updates ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub title: String,
    pub description: String,
    pub kind: LessonKind,
    pub content: String,
    pub duration_minutes: Option<u32>,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub instructor_id: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub level: CourseLevel,
    pub category: String,
    pub lessons: Vec<LessonDraft>,
    pub is_public: bool,
}

impl CourseDraft {
    /// Form-level validation; the store itself never re-checks these.
    fn validate(&self) -> CatalogResult<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::InvalidCourse("title must not be empty".into()));
        }
        if self.level == CourseLevel::Beginner && self.price != 0.0 {
            return Err(CatalogError::InvalidCourse(
                "beginner courses must be free".into(),
            ));
        }
        if self.price < 0.0 {
            return Err(CatalogError::InvalidCourse("price must not be negative".into()));
        }
        Ok(())
    }
}

/// Partial course update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<u32>,
    pub level: Option<CourseLevel>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    pub questions: Vec<QuestionDraft>,
    pub passing_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub user_id: String,
    pub course_id: String,
    pub lesson_id: Option<String>,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

// ========== Store ==========

#[derive(Default)]
struct CatalogState {
    courses: Vec<Course>,
    quizzes: Vec<Quiz>,
    enrollments: Vec<Enrollment>,
    progress: Vec<Progress>,
    attempts: Vec<QuizAttempt>,
    certificates: Vec<Certificate>,
    notes: Vec<Note>,
}

pub struct CatalogStore {
    clock: Arc<dyn Clock>,
    hub: EventHub,
    state: parking_lot::RwLock<CatalogState>,
}

impl CatalogStore {
    pub fn new(clock: Arc<dyn Clock>, hub: EventHub) -> Self {
        Self {
            clock,
            hub,
            state: parking_lot::RwLock::new(CatalogState::default()),
        }
    }

    // ========== Getters ==========

    pub fn get_course_by_id(&self, course_id: &str) -> Option<Course> {
        self.state
            .read()
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .cloned()
    }

    pub fn get_public_courses(&self) -> Vec<Course> {
        self.state
            .read()
            .courses
            .iter()
            .filter(|course| course.is_public)
            .cloned()
            .collect()
    }

    pub fn get_instructor_courses(&self, instructor_id: &str) -> Vec<Course> {
        self.state
            .read()
            .courses
            .iter()
            .filter(|course| course.instructor_id == instructor_id)
            .cloned()
            .collect()
    }

    /// Courses the user is enrolled in, in enrollment order. Enrollments
    /// whose course has been deleted are skipped.
    pub fn get_enrolled_courses(&self, user_id: &str) -> Vec<Course> {
        let state = self.state.read();
        state
            .enrollments
            .iter()
            .filter(|enrollment| enrollment.user_id == user_id)
            .filter_map(|enrollment| {
                state
                    .courses
                    .iter()
                    .find(|course| course.id == enrollment.course_id)
                    .cloned()
            })
            .collect()
    }

    pub fn is_enrolled(&self, user_id: &str, course_id: &str) -> bool {
        self.state
            .read()
            .enrollments
            .iter()
            .any(|enrollment| enrollment.user_id == user_id && enrollment.course_id == course_id)
    }

    pub fn get_course_progress(&self, user_id: &str, course_id: &str) -> Option<Progress> {
        self.state
            .read()
            .progress
            .iter()
            .find(|progress| progress.user_id == user_id && progress.course_id == course_id)
            .cloned()
    }

    pub fn get_quiz_for_course(&self, course_id: &str) -> Option<Quiz> {
        self.state
            .read()
            .quizzes
            .iter()
            .find(|quiz| quiz.course_id == course_id)
            .cloned()
    }

    pub fn get_quiz_attempts(&self, user_id: &str, course_id: &str) -> Vec<QuizAttempt> {
        self.state
            .read()
            .attempts
            .iter()
            .filter(|attempt| attempt.user_id == user_id && attempt.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn get_certificates(&self, user_id: &str) -> Vec<Certificate> {
        self.state
            .read()
            .certificates
            .iter()
            .filter(|certificate| certificate.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn get_notes(&self, user_id: &str, course_id: &str) -> Vec<Note> {
        self.state
            .read()
            .notes
            .iter()
            .filter(|note| note.user_id == user_id && note.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn course_count(&self) -> usize {
        self.state.read().courses.len()
    }

    // ========== Course management ==========

    pub fn create_course(&self, draft: CourseDraft) -> CatalogResult<Course> {
        draft.validate()?;

        let now = self.clock.now();
        let course_id = Uuid::new_v4().to_string();
        let lessons = draft
            .lessons
            .into_iter()
            .map(|lesson| Lesson {
                id: Uuid::new_v4().to_string(),
                course_id: course_id.clone(),
                title: lesson.title,
                description: lesson.description,
                kind: lesson.kind,
                content: lesson.content,
                duration_minutes: lesson.duration_minutes,
                order: lesson.order,
            })
            .collect();

        let course = Course {
            id: course_id.clone(),
            title: draft.title,
            description: draft.description,
            thumbnail: draft.thumbnail,
            instructor_id: draft.instructor_id,
            price: draft.price,
            duration_minutes: draft.duration_minutes,
            level: draft.level,
            category: draft.category,
            lessons,
            enrolled_students: 0,
            rating: 0.0,
            is_public: draft.is_public,
            created_at: now,
            updated_at: now,
        };

        self.state.write().courses.push(course.clone());
        tracing::info!(course_id = %course.id, title = %course.title, "course created");
        self.hub.publish(StoreEvent::CourseCreated { course_id });
        Ok(course)
    }

    /// Apply a partial update. The acting instructor must own the course.
    pub fn update_course(
        &self,
        instructor_id: &str,
        course_id: &str,
        update: CourseUpdate,
    ) -> CatalogResult<Course> {
        let mut state = self.state.write();
        let now = self.clock.now();

        let course = state
            .courses
            .iter_mut()
            .find(|course| course.id == course_id)
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;

        if course.instructor_id != instructor_id {
            return Err(CatalogError::NotCourseOwner {
                instructor_id: instructor_id.to_string(),
                course_id: course_id.to_string(),
            });
        }

        if let Some(title) = update.title {
            course.title = title;
        }
        if let Some(description) = update.description {
            course.description = description;
        }
        if let Some(thumbnail) = update.thumbnail {
            course.thumbnail = thumbnail;
        }
        if let Some(price) = update.price {
            course.price = price;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            course.duration_minutes = duration_minutes;
        }
        if let Some(level) = update.level {
            course.level = level;
        }
        if let Some(category) = update.category {
            course.category = category;
        }
        if let Some(rating) = update.rating {
            course.rating = rating;
        }
        if let Some(is_public) = update.is_public {
            course.is_public = is_public;
        }
        course.updated_at = now;

        let updated = course.clone();
        drop(state);

        self.hub.publish(StoreEvent::CourseUpdated {
            course_id: course_id.to_string(),
        });
        Ok(updated)
    }

    /// Remove the course and its quiz. Enrollments, progress, attempts,
    /// certificates, and notes referencing it are left in place and
    /// skipped by the getters, the way the client's array filters did.
    pub fn delete_course(&self, instructor_id: &str, course_id: &str) -> CatalogResult<()> {
        let mut state = self.state.write();

        let course = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;

        if course.instructor_id != instructor_id {
            return Err(CatalogError::NotCourseOwner {
                instructor_id: instructor_id.to_string(),
                course_id: course_id.to_string(),
            });
        }

        state.courses.retain(|course| course.id != course_id);
        state.quizzes.retain(|quiz| quiz.course_id != course_id);
        drop(state);

        tracing::info!(course_id, "course deleted");
        self.hub.publish(StoreEvent::CourseDeleted {
            course_id: course_id.to_string(),
        });
        Ok(())
    }

    /// Attach or replace the course quiz. Only the owning instructor may.
    pub fn set_course_quiz(
        &self,
        instructor_id: &str,
        course_id: &str,
        draft: QuizDraft,
    ) -> CatalogResult<Quiz> {
        for (index, question) in draft.questions.iter().enumerate() {
            if question.correct_option >= question.options.len() {
                return Err(CatalogError::InvalidQuiz(format!(
                    "question {index} has correct option out of range"
                )));
            }
        }

        let mut state = self.state.write();

        let course = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;
        if course.instructor_id != instructor_id {
            return Err(CatalogError::NotCourseOwner {
                instructor_id: instructor_id.to_string(),
                course_id: course_id.to_string(),
            });
        }

        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title: draft.title,
            questions: draft
                .questions
                .into_iter()
                .map(|question| Question {
                    id: Uuid::new_v4().to_string(),
                    prompt: question.prompt,
                    options: question.options,
                    correct_option: question.correct_option,
                })
                .collect(),
            passing_score: draft.passing_score,
        };

        state.quizzes.retain(|existing| existing.course_id != course_id);
        state.quizzes.push(quiz.clone());
        drop(state);

        self.hub.publish(StoreEvent::QuizSet {
            course_id: course_id.to_string(),
        });
        Ok(quiz)
    }

    // ========== Enrollment and progress ==========

    /// Append an enrollment plus a zeroed progress record and bump the
    /// course counter. A second enrollment for the same pair is rejected,
    /// so the enrolled list grows by exactly one course per call.
    pub fn enroll_in_course(&self, user_id: &str, course_id: &str) -> CatalogResult<Enrollment> {
        let mut state = self.state.write();
        let now = self.clock.now();

        if !state.courses.iter().any(|course| course.id == course_id) {
            return Err(CatalogError::CourseNotFound(course_id.to_string()));
        }
        if state
            .enrollments
            .iter()
            .any(|enrollment| enrollment.user_id == user_id && enrollment.course_id == course_id)
        {
            return Err(CatalogError::AlreadyEnrolled {
                user_id: user_id.to_string(),
                course_id: course_id.to_string(),
            });
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            enrolled_at: now,
        };
        state.enrollments.push(enrollment.clone());

        state.progress.push(Progress {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            completed_lessons: Vec::new(),
            current_lesson: None,
            progress_percentage: 0,
            last_accessed: now,
        });

        if let Some(course) = state
            .courses
            .iter_mut()
            .find(|course| course.id == course_id)
        {
            course.enrolled_students += 1;
        }
        drop(state);

        tracing::info!(user_id, course_id, "enrolled in course");
        self.hub.publish(StoreEvent::EnrollmentAdded {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
        });
        Ok(enrollment)
    }

    /// Mark a lesson completed. Idempotent: repeating a lesson does not
    /// change the percentage.
    pub fn update_progress(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> CatalogResult<Progress> {
        let mut state = self.state.write();
        let now = self.clock.now();

        let total_lessons = {
            let course = state
                .courses
                .iter()
                .find(|course| course.id == course_id)
                .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;
            if course.lesson(lesson_id).is_none() {
                return Err(CatalogError::LessonNotFound(lesson_id.to_string()));
            }
            course.lessons.len()
        };

        let progress = state
            .progress
            .iter_mut()
            .find(|progress| progress.user_id == user_id && progress.course_id == course_id)
            .ok_or_else(|| CatalogError::NotEnrolled {
                user_id: user_id.to_string(),
                course_id: course_id.to_string(),
            })?;

        if !progress.completed_lessons.iter().any(|id| id == lesson_id) {
            progress.completed_lessons.push(lesson_id.to_string());
        }
        progress.current_lesson = Some(lesson_id.to_string());
        progress.progress_percentage =
            progress_percentage(progress.completed_lessons.len(), total_lessons);
        progress.last_accessed = now;

        let updated = progress.clone();
        drop(state);

        self.hub.publish(StoreEvent::ProgressUpdated {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            progress_percentage: updated.progress_percentage,
        });
        Ok(updated)
    }

    // ========== Quiz attempts and certificates ==========

    /// Grade the answers against the course quiz and record the attempt
    /// under the acting user.
    pub fn save_quiz_attempt(
        &self,
        user_id: &str,
        course_id: &str,
        answers: HashMap<String, usize>,
        time_spent_secs: u32,
    ) -> CatalogResult<QuizAttempt> {
        let mut state = self.state.write();
        let now = self.clock.now();

        if !state.courses.iter().any(|course| course.id == course_id) {
            return Err(CatalogError::CourseNotFound(course_id.to_string()));
        }
        let quiz = state
            .quizzes
            .iter()
            .find(|quiz| quiz.course_id == course_id)
            .ok_or_else(|| CatalogError::QuizNotFound(course_id.to_string()))?;

        let result = quiz::grade(quiz, &answers);

        let attempt = QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            answers,
            score: result.score,
            passed: result.passed,
            completed_at: now,
            time_spent_secs,
        };
        state.attempts.push(attempt.clone());
        drop(state);

        tracing::info!(
            user_id,
            course_id,
            score = attempt.score,
            passed = attempt.passed,
            "quiz attempt saved"
        );
        self.hub.publish(StoreEvent::QuizAttemptSaved {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            passed: attempt.passed,
        });
        Ok(attempt)
    }

    /// Any passed attempt for the pair counts as completion.
    pub fn has_course_completion(&self, user_id: &str, course_id: &str) -> bool {
        self.state
            .read()
            .attempts
            .iter()
            .any(|attempt| {
                attempt.user_id == user_id && attempt.course_id == course_id && attempt.passed
            })
    }

    /// Issue a certificate for a completed course. The number carries a
    /// millisecond-timestamp suffix; nothing guards against collisions.
    pub fn generate_certificate(
        &self,
        user_id: &str,
        course_id: &str,
        instructor_name: &str,
    ) -> CatalogResult<Certificate> {
        let mut state = self.state.write();
        let now = self.clock.now();

        let course_name = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .map(|course| course.title.clone())
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;

        let best_score = state
            .attempts
            .iter()
            .filter(|attempt| {
                attempt.user_id == user_id && attempt.course_id == course_id && attempt.passed
            })
            .map(|attempt| attempt.score)
            .max()
            .ok_or_else(|| CatalogError::CourseNotCompleted(course_id.to_string()))?;

        let certificate = Certificate {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            course_name,
            instructor_name: instructor_name.to_string(),
            issued_at: now,
            score: best_score,
            certificate_number: format!("CERT-{}", now.timestamp_millis()),
        };
        state.certificates.push(certificate.clone());
        drop(state);

        tracing::info!(user_id, course_id, number = %certificate.certificate_number, "certificate issued");
        self.hub.publish(StoreEvent::CertificateIssued {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            certificate_number: certificate.certificate_number.clone(),
        });
        Ok(certificate)
    }

    // ========== Notes ==========

    pub fn save_note(&self, draft: NoteDraft) -> Note {
        let now = self.clock.now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            course_id: draft.course_id,
            lesson_id: draft.lesson_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };

        self.state.write().notes.push(note.clone());
        self.hub.publish(StoreEvent::NoteSaved {
            note_id: note.id.clone(),
        });
        note
    }

    pub fn update_note(&self, note_id: &str, update: NoteUpdate) -> CatalogResult<Note> {
        let mut state = self.state.write();
        let now = self.clock.now();

        let note = state
            .notes
            .iter_mut()
            .find(|note| note.id == note_id)
            .ok_or_else(|| CatalogError::NoteNotFound(note_id.to_string()))?;

        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        note.updated_at = now;

        let updated = note.clone();
        drop(state);

        self.hub.publish(StoreEvent::NoteSaved {
            note_id: note_id.to_string(),
        });
        Ok(updated)
    }

    pub fn delete_note(&self, note_id: &str) -> CatalogResult<()> {
        let mut state = self.state.write();
        let before = state.notes.len();
        state.notes.retain(|note| note.id != note_id);
        if state.notes.len() == before {
            return Err(CatalogError::NoteNotFound(note_id.to_string()));
        }
        drop(state);

        self.hub.publish(StoreEvent::NoteDeleted {
            note_id: note_id.to_string(),
        });
        Ok(())
    }
}
