use serde::Deserialize;

use crate::rules::RuleSet;

pub const FALLBACK_ANSWER: &str = "Sorry, I don't know the answer. Ask your mentor.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Matches when a known question appears anywhere in the asked one, ignoring case.
pub struct FaqBook {
    rules: RuleSet<str, String>,
}

impl FaqBook {
    pub fn new(entries: &[FaqEntry]) -> Self {
        let mut rules: RuleSet<str, String> = RuleSet::new();
        for entry in entries {
            let needle = entry.question.trim().to_lowercase();
            if needle.is_empty() {
                tracing::warn!(answer = %entry.answer, "skipping FAQ entry with blank question");
                continue;
            }
            rules.push(
                move |asked: &str| asked.to_lowercase().contains(&needle),
                entry.answer.clone(),
            );
        }
        Self { rules }
    }

    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.rules.evaluate(question).map(String::as_str)
    }

    pub fn answer(&self, question: &str) -> &str {
        self.lookup(question).unwrap_or(FALLBACK_ANSWER)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, answer: &str) -> FaqEntry {
        FaqEntry {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn substring_match_ignores_case() {
        let book = FaqBook::new(&[entry("exam date", "Finals start on 2 December.")]);
        assert_eq!(
            book.answer("When is the EXAM DATE this term?"),
            "Finals start on 2 December."
        );
    }

    #[test]
    fn earlier_entries_win() {
        let book = FaqBook::new(&[
            entry("fee", "Pay fees at the accounts office."),
            entry("fee deadline", "The fee deadline is 15 July."),
        ]);
        assert_eq!(
            book.answer("what is the fee deadline"),
            "Pay fees at the accounts office."
        );
    }

    #[test]
    fn unknown_question_gets_fallback() {
        let book = FaqBook::new(&[entry("library hours", "9am to 8pm.")]);
        assert_eq!(book.lookup("where is the canteen"), None);
        assert_eq!(book.answer("where is the canteen"), FALLBACK_ANSWER);
    }

    #[test]
    fn blank_questions_are_skipped() {
        let book = FaqBook::new(&[entry("  ", "matches everything"), entry("hostel", "Block C.")]);
        assert_eq!(book.len(), 1);
        assert_eq!(book.answer("canteen?"), FALLBACK_ANSWER);
    }
}
