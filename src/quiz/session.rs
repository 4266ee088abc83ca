use thiserror::Error;
use tracing::debug;

use crate::models::{Question, QuestionSet};

/// Where a session currently is in its select / submit / advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No option chosen for the current question.
    AnsweringPending,
    /// An option is chosen but not submitted.
    AnsweringSelected,
    /// The answer was submitted and feedback is showing.
    Feedback,
    /// Every question has been answered and acknowledged.
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a quiz needs at least one question set")]
    NoSets,
    #[error("question set `{0}` has no questions")]
    EmptySet(String),
}

/// One submitted answer, copied out of the question so it can be displayed later.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub set_index: usize,
    pub set_title: String,
    pub question_id: String,
    pub prompt: String,
    pub code: Option<String>,
    pub options: Vec<String>,
    pub selected: usize,
    pub correct: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Score of a single set on the completion screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub title: String,
    pub correct: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    sets: Vec<QuestionSet>,
    active_set: usize,
    active_question: usize,
    selected_answer: Option<usize>,
    is_answer_submitted: bool,
    answer_history: Vec<AnswerResult>,
    is_complete: bool,
}

impl QuizSession {
    pub fn new(sets: Vec<QuestionSet>) -> Result<Self, SessionError> {
        if sets.is_empty() {
            return Err(SessionError::NoSets);
        }
        if let Some(empty) = sets.iter().find(|set| set.is_empty()) {
            return Err(SessionError::EmptySet(empty.id.clone()));
        }

        Ok(Self {
            sets,
            active_set: 0,
            active_question: 0,
            selected_answer: None,
            is_answer_submitted: false,
            answer_history: Vec::new(),
            is_complete: false,
        })
    }

    pub fn single(set: QuestionSet) -> Result<Self, SessionError> {
        Self::new(vec![set])
    }

    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    pub fn active_set_index(&self) -> usize {
        self.active_set
    }

    pub fn active_question_index(&self) -> usize {
        self.active_question
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    pub fn is_answer_submitted(&self) -> bool {
        self.is_answer_submitted
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn answer_history(&self) -> &[AnswerResult] {
        &self.answer_history
    }

    pub fn current_set(&self) -> &QuestionSet {
        &self.sets[self.active_set]
    }

    pub fn current_question(&self) -> &Question {
        &self.current_set().questions[self.active_question]
    }

    /// The result recorded for the current question while feedback is showing.
    pub fn last_result(&self) -> Option<&AnswerResult> {
        if self.is_answer_submitted {
            self.answer_history.last()
        } else {
            None
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete {
            Phase::Complete
        } else if self.is_answer_submitted {
            Phase::Feedback
        } else if self.selected_answer.is_some() {
            Phase::AnsweringSelected
        } else {
            Phase::AnsweringPending
        }
    }

    /// Choose an option for the current question. Ignored after submission
    /// and for indices outside the option list.
    pub fn select_answer(&mut self, option: usize) {
        if self.is_answer_submitted || self.is_complete {
            debug!(option, "selection ignored after submit");
            return;
        }
        if option >= self.current_question().options.len() {
            debug!(option, "selection out of range ignored");
            return;
        }
        self.selected_answer = Some(option);
    }

    /// Move the selection by `delta` options, wrapping around.
    pub fn cycle_selection(&mut self, delta: isize) {
        let count = self.current_question().options.len() as isize;
        let next = match self.selected_answer {
            Some(current) => (current as isize + delta).rem_euclid(count),
            None if delta < 0 => count - 1,
            None => 0,
        };
        self.select_answer(next as usize);
    }

    /// Record the selected answer. Returns false when there was nothing to submit.
    pub fn submit_answer(&mut self) -> bool {
        if self.is_answer_submitted || self.is_complete {
            return false;
        }
        let Some(selected) = self.selected_answer else {
            return false;
        };

        let set = self.current_set();
        let question = self.current_question();
        let result = AnswerResult {
            set_index: self.active_set,
            set_title: set.title.clone(),
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            code: question.code().map(str::to_string),
            options: question.options.clone(),
            selected,
            correct: question.correct_option,
            is_correct: question.is_correct(selected),
            explanation: question.explanation.clone(),
        };

        debug!(
            set = %result.set_title,
            question = %result.question_id,
            correct = result.is_correct,
            "answer submitted"
        );
        self.answer_history.push(result);
        self.is_answer_submitted = true;
        true
    }

    /// Go to the next question, the next set, or completion.
    /// Returns false when no answer has been submitted yet.
    pub fn advance(&mut self) -> bool {
        if !self.is_answer_submitted || self.is_complete {
            return false;
        }

        if self.active_question + 1 < self.current_set().len() {
            self.active_question += 1;
        } else if self.active_set + 1 < self.sets.len() {
            self.active_set += 1;
            self.active_question = 0;
        } else {
            self.is_complete = true;
        }

        self.selected_answer = None;
        self.is_answer_submitted = false;
        true
    }

    pub fn reset(&mut self) {
        self.active_set = 0;
        self.active_question = 0;
        self.selected_answer = None;
        self.is_answer_submitted = false;
        self.answer_history.clear();
        self.is_complete = false;
    }

    pub fn total_questions(&self) -> usize {
        self.sets.iter().map(QuestionSet::len).sum()
    }

    /// (answered, total) across every set.
    pub fn overall_progress(&self) -> (usize, usize) {
        (self.answer_history.len(), self.total_questions())
    }

    /// (answered in set, set size).
    pub fn set_progress(&self, set_index: usize) -> (usize, usize) {
        let total = self.sets.get(set_index).map_or(0, QuestionSet::len);
        let answered = self
            .answer_history
            .iter()
            .filter(|result| result.set_index == set_index)
            .count();
        (answered, total)
    }

    pub fn correct_count(&self) -> usize {
        self.answer_history.iter().filter(|r| r.is_correct).count()
    }

    pub fn correct_count_in_set(&self, set_index: usize) -> usize {
        self.answer_history
            .iter()
            .filter(|r| r.set_index == set_index && r.is_correct)
            .count()
    }

    /// Share of correct answers so far, or `None` before the first submission.
    pub fn score_percent(&self) -> Option<u8> {
        if self.answer_history.is_empty() {
            None
        } else {
            Some(percent(self.correct_count(), self.answer_history.len()))
        }
    }

    pub fn set_summaries(&self) -> Vec<SetSummary> {
        self.sets
            .iter()
            .enumerate()
            .map(|(index, set)| {
                let correct = self.correct_count_in_set(index);
                SetSummary {
                    title: set.title.clone(),
                    correct,
                    total: set.len(),
                    percent: percent(correct, set.len()),
                }
            })
            .collect()
    }
}

/// Integer percentage rounded half up. Zero when `total` is zero.
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total);
    ((200 * part + total) / (2 * total)) as u8
}
