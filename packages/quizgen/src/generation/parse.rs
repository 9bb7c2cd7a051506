//! Structured-response parsing and per-task shape validation.

use serde_json::Value;

use crate::error::AttemptError;
use crate::types::quiz::{AnswerKey, Difficulty, KeyEntities, Question};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Parse backend response text as JSON.
///
/// Tries the raw text, then the body of a ```` ```json ```` fenced block,
/// then the span from the first `{` to the last `}`. First success wins.
pub fn parse_structured(text: &str) -> Result<Value, AttemptError> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Ok(value);
    }

    if let Some(start) = text.find(FENCE_OPEN) {
        let body = &text[start + FENCE_OPEN.len()..];
        let inner = match body.find(FENCE_CLOSE) {
            Some(end) => &body[..end],
            None => body,
        };
        if let Ok(value) = serde_json::from_str(inner.trim()) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return serde_json::from_str(&text[start..=end])
                .map_err(|e| AttemptError::Parse(e.to_string()));
        }
    }

    Err(AttemptError::Parse("no JSON object found in response".to_string()))
}

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, AttemptError> {
    value
        .get(key)
        .ok_or_else(|| AttemptError::Shape(format!("missing field: {key}")))
}

fn array<'a>(value: &'a Value, key: &str) -> Result<&'a Vec<Value>, AttemptError> {
    field(value, key)?
        .as_array()
        .ok_or_else(|| AttemptError::Shape(format!("{key} must be a list")))
}

/// Trimmed, non-empty, de-duplicated strings from a list, at most `cap`.
fn string_list(items: &[Value], cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items.iter().filter_map(Value::as_str) {
        let item = item.trim();
        if item.is_empty() || out.iter().any(|seen| seen == item) {
            continue;
        }
        out.push(item.to_string());
        if out.len() >= cap {
            break;
        }
    }
    out
}

pub fn summary(value: &Value) -> Result<String, AttemptError> {
    field(value, "summary")?
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AttemptError::Shape("summary must be a string".to_string()))
}

/// All three entity keys are required; each list is capped at `cap`.
pub fn entities(value: &Value, cap: usize) -> Result<KeyEntities, AttemptError> {
    Ok(KeyEntities {
        people: string_list(array(value, "people")?, cap),
        organizations: string_list(array(value, "organizations")?, cap),
        locations: string_list(array(value, "locations")?, cap),
    })
}

pub fn related_topics(value: &Value, cap: usize) -> Result<Vec<String>, AttemptError> {
    Ok(string_list(array(value, "related_topics")?, cap))
}

/// Trim the quiz list to `count`, then validate every remaining item.
///
/// One malformed item fails the whole batch.
pub fn questions(value: &Value, count: usize) -> Result<Vec<Question>, AttemptError> {
    array(value, "quiz")?
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, item)| {
            question(item).map_err(|e| match e {
                AttemptError::Shape(msg) => AttemptError::Shape(format!("question {}: {msg}", i + 1)),
                other => other,
            })
        })
        .collect()
}

fn question(item: &Value) -> Result<Question, AttemptError> {
    let shape = |msg: &str| AttemptError::Shape(msg.to_string());

    let text = field(item, "question")?
        .as_str()
        .ok_or_else(|| shape("question must be a string"))?;

    let options: Vec<String> = field(item, "options")?
        .as_array()
        .ok_or_else(|| shape("options must be a list"))?
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| shape("options must be strings"))?;
    let options: [String; 4] = options
        .try_into()
        .map_err(|_| shape("options must be a list of 4 items"))?;

    let answer = field(item, "answer")?
        .as_str()
        .and_then(AnswerKey::from_letter)
        .ok_or_else(|| shape("answer must be A, B, C, or D"))?;

    let difficulty = field(item, "difficulty")?
        .as_str()
        .and_then(Difficulty::from_label)
        .ok_or_else(|| shape("difficulty must be easy, medium, or hard"))?;

    let explanation = match field(item, "explanation")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => return Err(shape("explanation must be a string or null")),
    };

    let section_reference = item
        .get("section_reference")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Question {
        question: text.to_string(),
        options,
        answer,
        difficulty,
        explanation,
        section_reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_question(n: usize) -> Value {
        json!({
            "question": format!("Question {n}?"),
            "options": ["a", "b", "c", "d"],
            "answer": "B",
            "difficulty": "medium",
            "explanation": "Because."
        })
    }

    #[test]
    fn test_fenced_matches_bare() {
        let bare = r#"{"summary": "A short summary."}"#;
        let fenced = format!("Here you go:\n```json\n{bare}\n```\nEnjoy!");
        assert_eq!(parse_structured(bare).unwrap(), parse_structured(&fenced).unwrap());
    }

    #[test]
    fn test_brace_span_fallback() {
        let text = r#"Sure! {"related_topics": ["Cargo"]} Let me know if you need more."#;
        assert_eq!(
            parse_structured(text).unwrap(),
            json!({"related_topics": ["Cargo"]})
        );
    }

    #[test]
    fn test_broken_fence_falls_back_to_braces() {
        let text = "```json\nnot json\n``` but later {\"summary\": \"ok\"}";
        // brace span starts at the first '{' which is inside the trailing object
        assert_eq!(parse_structured(text).unwrap(), json!({"summary": "ok"}));
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(
            parse_structured("I cannot help with that."),
            Err(AttemptError::Parse(_))
        ));
        assert!(matches!(
            parse_structured("} backwards {"),
            Err(AttemptError::Parse(_))
        ));
    }

    #[test]
    fn test_questions_trimmed_before_validation() {
        let mut items: Vec<Value> = (1..=6).map(valid_question).collect();
        items.push(json!({"question": "broken"}));
        let value = json!({ "quiz": items });

        let parsed = questions(&value, 6).unwrap();
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[0].answer, AnswerKey::B);

        assert!(matches!(questions(&value, 7), Err(AttemptError::Shape(_))));
    }

    #[test]
    fn test_question_shape_rules() {
        let check = |patch: Value| {
            let mut q = valid_question(1);
            for (k, v) in patch.as_object().unwrap() {
                q[k] = v.clone();
            }
            questions(&json!({ "quiz": [q] }), 10)
        };

        assert!(check(json!({})).is_ok());
        assert!(check(json!({"explanation": null})).is_ok());
        assert!(check(json!({"options": ["a", "b", "c"]})).is_err());
        assert!(check(json!({"options": ["a", "b", "c", 4]})).is_err());
        assert!(check(json!({"answer": "E"})).is_err());
        assert!(check(json!({"answer": "b"})).is_err());
        assert!(check(json!({"difficulty": "impossible"})).is_err());

        let mut missing = valid_question(1);
        missing.as_object_mut().unwrap().remove("explanation");
        let err = questions(&json!({ "quiz": [missing] }), 10).unwrap_err();
        assert!(err.to_string().contains("missing field: explanation"));
    }

    #[test]
    fn test_section_reference_kept_when_present() {
        let mut q = valid_question(1);
        q["section_reference"] = json!("History");
        let parsed = questions(&json!({ "quiz": [q] }), 5).unwrap();
        assert_eq!(parsed[0].section_reference.as_deref(), Some("History"));
    }

    #[test]
    fn test_entities_require_all_keys() {
        assert!(entities(&json!({"people": [], "organizations": []}), 10).is_err());

        let many: Vec<String> = (0..15).map(|i| format!("Person {i}")).collect();
        let value = json!({
            "people": many,
            "organizations": ["Mozilla", " Mozilla ", ""],
            "locations": []
        });
        let parsed = entities(&value, 10).unwrap();
        assert_eq!(parsed.people.len(), 10);
        assert_eq!(parsed.organizations, vec!["Mozilla"]);
        assert!(parsed.locations.is_empty());
    }

    #[test]
    fn test_related_topics_capped() {
        let topics: Vec<String> = (0..12).map(|i| format!("Topic {i}")).collect();
        let parsed = related_topics(&json!({ "related_topics": topics }), 8).unwrap();
        assert_eq!(parsed.len(), 8);
        assert_eq!(parsed[7], "Topic 7");
    }

    #[test]
    fn test_summary_must_be_string() {
        assert_eq!(summary(&json!({"summary": " Text. "})).unwrap(), "Text.");
        assert!(summary(&json!({"summary": 3})).is_err());
        assert!(summary(&json!({})).is_err());
    }
}
