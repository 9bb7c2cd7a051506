//! Prompt templates for the four generation tasks.
//!
//! Templates use `{placeholder}` fields filled by the `format_*` functions.
//! Each asks for a single JSON object so one parser serves every task.

use crate::error::TaskKind;
use crate::types::quiz::KeyEntities;

/// Prompt for the article summary.
pub const SUMMARY_PROMPT: &str = r#"Write a concise summary of the following article.

The summary should be 2-4 sentences, factual, and cover the article's main subject and its most important points. Do not add information that is not in the article.

Article Title: {title}

Article Content:
{content}

Output JSON:
{
    "summary": "2-4 sentence summary of the article"
}"#;

/// Prompt for named-entity extraction.
pub const ENTITIES_PROMPT: &str = r#"Extract the key named entities mentioned in the following article.

Group them into:
- people: individual people mentioned by name
- organizations: companies, institutions, governments, groups
- locations: countries, cities, regions, landmarks

List at most 10 of the most important entities per group. Use an empty list when a group has none.

Article Title: {title}

Article Content:
{content}

Output JSON:
{
    "people": ["Full Name"],
    "organizations": ["Organization Name"],
    "locations": ["Location Name"]
}"#;

/// Prompt for multiple-choice quiz questions.
pub const QUESTIONS_PROMPT: &str = r#"Create a multiple-choice quiz from the following article.

Write exactly {num_questions} questions. Each question must:
- be answerable from the article content alone
- have exactly 4 options, with exactly one correct
- give the correct option's letter as the answer: "A", "B", "C" or "D"
- have a difficulty of "easy", "medium" or "hard", with a mix across the quiz
- include a one-sentence explanation of why the answer is correct
- name the article section it was drawn from, if any

Article Title: {title}

Article Content:
{content}

Output JSON:
{
    "quiz": [
        {
            "question": "Question text?",
            "options": ["Option A", "Option B", "Option C", "Option D"],
            "answer": "A",
            "difficulty": "easy",
            "explanation": "Why the answer is correct",
            "section_reference": "Section name"
        }
    ]
}"#;

/// Prompt for further-reading suggestions.
pub const RELATED_TOPICS_PROMPT: &str = r#"Suggest related topics a reader of the following article could study next.

Suggest 5-8 topics. Each topic should be a short title suitable for looking up in an encyclopedia. Prefer topics connected to the article's key entities, and do not repeat the article's own title.

Article Title: {title}

Key Entities:
{entities}

Article Content:
{content}

Output JSON:
{
    "related_topics": ["Topic 1", "Topic 2"]
}"#;

/// Opening line of a task's template; distinct across tasks.
pub fn task_marker(task: TaskKind) -> &'static str {
    let template = match task {
        TaskKind::Summary => SUMMARY_PROMPT,
        TaskKind::Entities => ENTITIES_PROMPT,
        TaskKind::Questions => QUESTIONS_PROMPT,
        TaskKind::RelatedTopics => RELATED_TOPICS_PROMPT,
    };
    template.lines().next().unwrap_or(template)
}

/// Format the summary prompt.
pub fn format_summary_prompt(title: &str, content: &str) -> String {
    SUMMARY_PROMPT
        .replace("{title}", title)
        .replace("{content}", content)
}

/// Format the entity extraction prompt.
pub fn format_entities_prompt(title: &str, content: &str) -> String {
    ENTITIES_PROMPT
        .replace("{title}", title)
        .replace("{content}", content)
}

/// Format the quiz prompt for `num_questions` questions.
pub fn format_questions_prompt(title: &str, content: &str, num_questions: usize) -> String {
    QUESTIONS_PROMPT
        .replace("{title}", title)
        .replace("{num_questions}", &num_questions.to_string())
        .replace("{content}", content)
}

/// Format the related-topics prompt with a compact entity rendering.
pub fn format_related_topics_prompt(
    title: &str,
    content: &str,
    entities: &KeyEntities,
    per_kind: usize,
) -> String {
    RELATED_TOPICS_PROMPT
        .replace("{title}", title)
        .replace("{entities}", &render_entities(entities, per_kind))
        .replace("{content}", content)
}

/// Render the first `per_kind` entities of each kind, one kind per line.
pub fn render_entities(entities: &KeyEntities, per_kind: usize) -> String {
    let line = |label: &str, items: &[String]| {
        let shown: Vec<&str> = items.iter().take(per_kind).map(String::as_str).collect();
        format!("{}: {}", label, shown.join(", "))
    };

    [
        line("People", &entities.people),
        line("Organizations", &entities.organizations),
        line("Locations", &entities.locations),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS: [TaskKind; 4] = [
        TaskKind::Summary,
        TaskKind::Entities,
        TaskKind::Questions,
        TaskKind::RelatedTopics,
    ];

    #[test]
    fn test_render_entities_caps_each_kind() {
        let entities = KeyEntities {
            people: (1..=7).map(|i| format!("P{i}")).collect(),
            organizations: vec!["Mozilla".into()],
            locations: vec![],
        };
        assert_eq!(
            render_entities(&entities, 5),
            "People: P1, P2, P3, P4, P5\nOrganizations: Mozilla\nLocations: "
        );
    }

    #[test]
    fn test_questions_prompt_fills_placeholders() {
        let prompt = format_questions_prompt("Rust", "Rust is a language.", 6);
        assert!(prompt.contains("Write exactly 6 questions"));
        assert!(prompt.contains("Article Title: Rust"));
        assert!(prompt.contains("Rust is a language."));
        assert!(!prompt.contains("{title}"));
        assert!(!prompt.contains("{num_questions}"));
    }

    #[test]
    fn test_task_markers_identify_prompts() {
        let entities = KeyEntities::default();
        let rendered = [
            format_summary_prompt("T", "C"),
            format_entities_prompt("T", "C"),
            format_questions_prompt("T", "C", 5),
            format_related_topics_prompt("T", "C", &entities, 5),
        ];
        for (i, task) in TASKS.iter().enumerate() {
            for (j, prompt) in rendered.iter().enumerate() {
                assert_eq!(prompt.contains(task_marker(*task)), i == j, "{task} vs prompt {j}");
            }
        }
    }
}
