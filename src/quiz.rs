//! Quiz grading: score an `question id -> option index` answer map against
//! a course quiz.

use std::collections::HashMap;

use crate::models::{progress_percentage, Quiz};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    pub correct: usize,
    pub total: usize,
    /// 0-100, rounded.
    pub score: u32,
    pub passed: bool,
}

/// Grade `answers` against `quiz`. Answers for unknown question ids are
/// ignored; unanswered questions count as wrong. A quiz with no questions
/// never passes.
pub fn grade(quiz: &Quiz, answers: &HashMap<String, usize>) -> GradeResult {
    let total = quiz.questions.len();
    let correct = quiz
        .questions
        .iter()
        .filter(|question| answers.get(&question.id) == Some(&question.correct_option))
        .count();

    let score = progress_percentage(correct, total);
    let passed = total > 0 && score >= quiz.passing_score;

    GradeResult {
        correct,
        total,
        score,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn quiz(passing_score: u32, correct_options: &[usize]) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            course_id: "course-1".to_string(),
            title: "Final quiz".to_string(),
            questions: correct_options
                .iter()
                .enumerate()
                .map(|(i, &correct)| Question {
                    id: format!("q-{i}"),
                    prompt: format!("Question {i}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_option: correct,
                })
                .collect(),
            passing_score,
        }
    }

    fn answers(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs
            .iter()
            .map(|(id, option)| (id.to_string(), *option))
            .collect()
    }

    #[test]
    fn test_all_correct_passes() {
        let quiz = quiz(70, &[0, 1, 2]);
        let result = grade(&quiz, &answers(&[("q-0", 0), ("q-1", 1), ("q-2", 2)]));
        assert_eq!(result.score, 100);
        assert!(result.passed);
    }

    #[test]
    fn test_partial_score_rounds() {
        let quiz = quiz(70, &[0, 1, 2]);
        let result = grade(&quiz, &answers(&[("q-0", 0), ("q-1", 1), ("q-2", 0)]));
        assert_eq!(result.correct, 2);
        assert_eq!(result.score, 67);
        assert!(!result.passed);
    }

    #[test]
    fn test_unanswered_questions_count_as_wrong() {
        let quiz = quiz(50, &[0, 1]);
        let result = grade(&quiz, &answers(&[("q-0", 0)]));
        assert_eq!(result.score, 50);
        assert!(result.passed);
    }

    #[test]
    fn test_unknown_question_ids_are_ignored() {
        let quiz = quiz(100, &[0]);
        let result = grade(&quiz, &answers(&[("q-0", 0), ("q-999", 3)]));
        assert_eq!(result.correct, 1);
        assert_eq!(result.score, 100);
        assert!(result.passed);
    }

    #[test]
    fn test_empty_quiz_never_passes() {
        let quiz = quiz(0, &[]);
        let result = grade(&quiz, &HashMap::new());
        assert_eq!(result.score, 0);
        assert!(!result.passed);
    }
}
