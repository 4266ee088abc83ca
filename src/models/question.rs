use serde::{Deserialize, Serialize};

/// What a question or example is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Component,
    Hook,
    State,
    Props,
    Event,
    Lifecycle,
    Context,
    Ref,
    Memo,
    Effect,
    Custom,
    Types,
    Routing,
    Rendering,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: String,
    #[serde(default)]
    pub kind: Kind,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }

    /// The code sample, treating an empty string as absent.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.trim().is_empty())
    }
}

/// A named group of questions, also called a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
