mod content;
mod question;

pub use content::{Catalog, DetailGroup, Example, Section, Topic};
pub use question::{Kind, Question, QuestionSet};
