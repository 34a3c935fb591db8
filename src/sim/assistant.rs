//! Support assistant: pure keyword matching against a fixed rule list.
//! First rule with any matching keyword wins; no state, no learning.

struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["refund", "money back"],
        reply: "Refunds are available within 14 days of purchase from your account page.",
    },
    Rule {
        keywords: &["certificate", "diploma"],
        reply: "Certificates are issued automatically once you pass the course quiz.",
    },
    Rule {
        keywords: &["enroll", "sign up", "join"],
        reply: "Open the course page and press Enroll. Free courses enroll instantly.",
    },
    Rule {
        keywords: &["password", "login", "log in"],
        reply: "You can reset your password from the login screen.",
    },
    Rule {
        keywords: &["progress", "completed"],
        reply: "Your progress updates every time you finish a lesson and is shown on the course page.",
    },
    Rule {
        keywords: &["quiz", "exam", "test"],
        reply: "Each course ends with a quiz; you need the passing score shown on the quiz page.",
    },
];

const FALLBACK: &str =
    "Sorry, I don't have an answer for that. Try asking about enrollment, quizzes, or certificates.";

/// Answer a free-form question by scanning the rule list.
pub fn answer(question: &str) -> &'static str {
    let normalized = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| normalized.contains(keyword))
        })
        .map(|rule| rule.reply)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(answer("How do I get a CERTIFICATE?").contains("Certificates"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // mentions both refund and certificate; refund rule comes first
        assert!(answer("refund before my certificate arrives?").contains("Refunds"));
    }

    #[test]
    fn test_unknown_question_gets_fallback() {
        assert_eq!(answer("what is the meaning of life"), FALLBACK);
    }
}
