use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Catalog, Question, QuestionSet, Section, Topic};

const MIN_OPTIONS: usize = 2;

/// Embedded topics, keyed by the id they are expected to declare.
const BUILTIN_TOPICS: [(&str, &str); 3] = [
    ("nextjs", include_str!("../../content/nextjs.json")),
    ("react", include_str!("../../content/react.json")),
    ("typescript", include_str!("../../content/typescript.json")),
];

const BUILTIN_QUIZ: &str = include_str!("../../content/quiz.json");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid content at {location}: {reason}")]
    Invalid { location: String, reason: String },
}

impl LoadError {
    fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Build the catalog shipped with the binary.
pub fn builtin_catalog() -> Result<Catalog, LoadError> {
    let topics = BUILTIN_TOPICS
        .iter()
        .map(|(id, json)| {
            let topic = load_topic_from_str(id, json)?;
            if topic.id != *id {
                return Err(LoadError::invalid(
                    *id,
                    format!("embedded topic declares id `{}`", topic.id),
                ));
            }
            Ok(topic)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = Catalog {
        topics,
        quiz: load_quiz_from_str("quiz", BUILTIN_QUIZ)?,
    };
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Load a whole catalog (topics plus quiz) from a JSON file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog: Catalog = serde_json::from_str(&json).map_err(|source| LoadError::Parse {
        origin: path.display().to_string(),
        source,
    })?;

    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse and validate a single topic document.
pub fn load_topic_from_str(origin: &str, json: &str) -> Result<Topic, LoadError> {
    let topic: Topic = serde_json::from_str(json).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    validate_topic(&topic)?;
    Ok(topic)
}

/// Parse and validate a list of quiz categories.
pub fn load_quiz_from_str(origin: &str, json: &str) -> Result<Vec<QuestionSet>, LoadError> {
    let sets: Vec<QuestionSet> = serde_json::from_str(json).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    validate_quiz(&sets)?;
    Ok(sets)
}

impl Catalog {
    pub fn builtin() -> Result<Self, LoadError> {
        builtin_catalog()
    }

    /// Check every topic and quiz set, reporting the first offending location.
    pub fn validate(&self) -> Result<(), LoadError> {
        validate_catalog(self)
    }
}

pub(crate) fn validate_catalog(catalog: &Catalog) -> Result<(), LoadError> {
    if catalog.topics.is_empty() {
        return Err(LoadError::invalid("catalog", "no topics"));
    }

    let mut seen = HashSet::new();
    for topic in &catalog.topics {
        if !seen.insert(topic.id.as_str()) {
            return Err(LoadError::invalid(&topic.id, "duplicate topic id"));
        }
        validate_topic(topic)?;
    }

    validate_quiz(&catalog.quiz)
}

fn validate_topic(topic: &Topic) -> Result<(), LoadError> {
    if topic.sections.is_empty() {
        return Err(LoadError::invalid(&topic.id, "topic has no sections"));
    }
    validate_sections(&topic.id, &topic.sections)
}

fn validate_sections(parent: &str, sections: &[Section]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for section in sections {
        let location = format!("{}/{}", parent, section.id);
        if !seen.insert(section.id.as_str()) {
            return Err(LoadError::invalid(location, "duplicate section id"));
        }
        validate_questions(&location, &section.practice)?;
        validate_sections(&location, &section.children)?;
    }
    Ok(())
}

fn validate_quiz(sets: &[QuestionSet]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for set in sets {
        let location = format!("quiz/{}", set.id);
        if !seen.insert(set.id.as_str()) {
            return Err(LoadError::invalid(location, "duplicate category id"));
        }
        if set.is_empty() {
            return Err(LoadError::invalid(location, "category has no questions"));
        }
        validate_questions(&location, &set.questions)?;
    }
    Ok(())
}

fn validate_questions(parent: &str, questions: &[Question]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for question in questions {
        let location = format!("{}/{}", parent, question.id);
        if !seen.insert(question.id.as_str()) {
            return Err(LoadError::invalid(location, "duplicate question id"));
        }
        if question.options.len() < MIN_OPTIONS {
            return Err(LoadError::invalid(
                location,
                format!("needs at least {} options", MIN_OPTIONS),
            ));
        }
        if question.correct_option >= question.options.len() {
            return Err(LoadError::invalid(
                location,
                format!(
                    "correct option {} is out of range for {} options",
                    question.correct_option,
                    question.options.len()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TOPIC: &str = r#"{
        "id": "demo",
        "title": "Demo",
        "summary": "A demo topic",
        "sections": [{
            "id": "basics",
            "title": "Basics",
            "description": "The basics",
            "practice": [{
                "id": "q1",
                "prompt": "Pick A",
                "options": ["A", "B"],
                "correct_option": 0,
                "explanation": "A is right"
            }]
        }]
    }"#;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.topics.len(), 3);
        assert!(catalog.topic("react").is_some());
        assert!(catalog.question_count() > 0);
        assert!(catalog.practice_count() > 0);
    }

    #[test]
    fn parses_topic_with_defaults() {
        let topic = load_topic_from_str("demo", TOPIC).unwrap();
        let section = topic.section("basics").unwrap();
        assert!(section.examples.is_empty());
        assert!(section.children.is_empty());
        assert_eq!(section.practice[0].code(), None);
        assert_eq!(section.practice_set().len(), 1);
    }

    #[test]
    fn rejects_out_of_range_correct_option() {
        let json = TOPIC.replace("\"correct_option\": 0", "\"correct_option\": 2");
        let err = load_topic_from_str("demo", &json).unwrap_err();
        match err {
            LoadError::Invalid { location, .. } => assert_eq!(location, "demo/basics/q1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_single_option_question() {
        let json = TOPIC.replace("[\"A\", \"B\"]", "[\"A\"]");
        assert!(matches!(
            load_topic_from_str("demo", &json),
            Err(LoadError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_empty_quiz_category() {
        let json = r#"[{"id": "empty", "title": "Empty", "questions": []}]"#;
        assert!(matches!(
            load_quiz_from_str("quiz", json),
            Err(LoadError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let json = r#"[{"id": "c", "title": "C", "questions": [
            {"id": "q1", "prompt": "a", "options": ["x", "y"], "correct_option": 0, "explanation": ""},
            {"id": "q1", "prompt": "b", "options": ["x", "y"], "correct_option": 1, "explanation": ""}
        ]}]"#;
        assert!(matches!(
            load_quiz_from_str("quiz", json),
            Err(LoadError::Invalid { .. })
        ));
    }

    #[test]
    fn loads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"topics": [{}]}}"#, TOPIC).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.topics[0].id, "demo");
        assert!(catalog.quiz.is_empty());
    }

    #[test]
    fn reports_missing_file() {
        let err = load_catalog("does-not-exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn validate_rejects_duplicate_topics() {
        let mut catalog = Catalog::builtin().unwrap();
        assert!(catalog.validate().is_ok());

        let copy = catalog.topics[0].clone();
        catalog.topics.push(copy);
        assert!(matches!(catalog.validate(), Err(LoadError::Invalid { .. })));
    }
}
