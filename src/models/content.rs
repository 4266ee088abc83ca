use serde::{Deserialize, Serialize};

use super::question::{Kind, Question, QuestionSet};

/// A worked example shown on a section's Examples tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    #[serde(default)]
    pub kind: Kind,
    pub name: String,
    pub description: String,
    pub code: String,
    #[serde(default)]
    pub correct_usage: Option<String>,
    #[serde(default)]
    pub incorrect_usage: Option<String>,
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// A headed bullet list (features, use cases, cautions, notes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailGroup {
    pub heading: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub details: Vec<DetailGroup>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub practice: Vec<Question>,
    #[serde(default)]
    pub children: Vec<Section>,
}

impl Section {
    /// Practice questions packaged as a single-set quiz.
    pub fn practice_set(&self) -> QuestionSet {
        QuestionSet {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.practice.clone(),
        }
    }

    pub fn has_practice(&self) -> bool {
        !self.practice.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub sections: Vec<Section>,
}

impl Topic {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }
}

/// Every topic plus the cross-topic category quiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub quiz: Vec<QuestionSet>,
}

impl Catalog {
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    /// Number of questions in the category quiz.
    pub fn question_count(&self) -> usize {
        self.quiz.iter().map(QuestionSet::len).sum()
    }

    /// Number of practice questions across all topics, child sections included.
    pub fn practice_count(&self) -> usize {
        fn count(section: &Section) -> usize {
            section.practice.len() + section.children.iter().map(count).sum::<usize>()
        }

        self.topics
            .iter()
            .flat_map(|topic| topic.sections.iter())
            .map(count)
            .sum()
    }
}
