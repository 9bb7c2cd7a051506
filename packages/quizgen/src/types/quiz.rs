//! Quiz types - questions, entities and the persisted quiz document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Letter of the correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    /// Parse a single option letter.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(AnswerKey::A),
            "B" => Some(AnswerKey::B),
            "C" => Some(AnswerKey::C),
            "D" => Some(AnswerKey::D),
            _ => None,
        }
    }

    /// Position of the option this letter names.
    pub fn index(&self) -> usize {
        match self {
            AnswerKey::A => 0,
            AnswerKey::B => 1,
            AnswerKey::C => 2,
            AnswerKey::D => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A multiple-choice question.
///
/// `options` always holds exactly four entries and `answer` always indexes
/// into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: [String; 4],
    pub answer: AnswerKey,
    pub difficulty: Difficulty,
    pub explanation: Option<String>,

    /// Section the question was drawn from. Not part of the stored document.
    #[serde(default, skip_serializing)]
    pub section_reference: Option<String>,
}

impl Question {
    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.answer.index()]
    }
}

/// Named entities grouped by kind. All three lists are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// The persisted quiz document, one per normalized article URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub key_entities: KeyEntities,
    pub sections: Vec<String>,
    pub quiz: Vec<Question>,
    pub related_topics: Vec<String>,
}

/// A stored quiz: the document plus the identity the store assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: i64,
    #[serde(flatten)]
    pub document: QuizDocument,
    pub created_at: DateTime<Utc>,
}

impl QuizRecord {
    pub fn url(&self) -> &str {
        &self.document.url
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn question_count(&self) -> usize {
        self.document.quiz.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_question() -> Question {
        Question {
            question: "Who designed Rust?".into(),
            options: [
                "Graydon Hoare".into(),
                "Guido van Rossum".into(),
                "Bjarne Stroustrup".into(),
                "James Gosling".into(),
            ],
            answer: AnswerKey::A,
            difficulty: Difficulty::Easy,
            explanation: Some("Rust began as his side project.".into()),
            section_reference: Some("History".into()),
        }
    }

    #[test]
    fn test_answer_indexes_options() {
        let q = sample_question();
        assert_eq!(q.correct_option(), "Graydon Hoare");
        assert_eq!(AnswerKey::from_letter("D").map(|a| a.index()), Some(3));
        assert_eq!(AnswerKey::from_letter("E"), None);
        assert_eq!(AnswerKey::from_letter("a"), None);
    }

    #[test]
    fn test_document_json_shape() {
        let doc = QuizDocument {
            url: "https://example.com/rust".into(),
            title: "Rust".into(),
            summary: "A language.".into(),
            key_entities: KeyEntities {
                people: vec!["Graydon Hoare".into()],
                ..Default::default()
            },
            sections: vec!["Introduction".into()],
            quiz: vec![sample_question()],
            related_topics: vec!["Cargo".into()],
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "https://example.com/rust",
                "title": "Rust",
                "summary": "A language.",
                "key_entities": {
                    "people": ["Graydon Hoare"],
                    "organizations": [],
                    "locations": []
                },
                "sections": ["Introduction"],
                "quiz": [{
                    "question": "Who designed Rust?",
                    "options": ["Graydon Hoare", "Guido van Rossum", "Bjarne Stroustrup", "James Gosling"],
                    "answer": "A",
                    "difficulty": "easy",
                    "explanation": "Rust began as his side project."
                }],
                "related_topics": ["Cargo"]
            })
        );
    }

    #[test]
    fn test_record_flattens_document() {
        let record = QuizRecord {
            id: 7,
            document: QuizDocument {
                url: "https://example.com".into(),
                title: "Example".into(),
                summary: String::new(),
                key_entities: KeyEntities::default(),
                sections: vec![],
                quiz: vec![sample_question()],
                related_topics: vec![],
            },
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(record.question_count(), 1);

        let back: QuizRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.document.quiz[0].section_reference, None);
    }
}
