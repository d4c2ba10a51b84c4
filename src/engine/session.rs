// src/engine/session.rs

use std::sync::atomic::{AtomicI64, Ordering};

use rand::seq::SliceRandom;

use crate::config::{QUESTIONS_PER_ATTEMPT, SCENARIOS_PER_ATTEMPT};
use crate::engine::evaluator::{self, Submission, Verdict};
use crate::error::AppError;
use crate::models::question::Question;

/// Which attempt flow a session belongs to; determines the nominal
/// attempt length and which progress log the summary is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptKind {
    Quiz,
    Simulation,
}

impl AttemptKind {
    fn nominal_length(self) -> usize {
        match self {
            AttemptKind::Quiz => QUESTIONS_PER_ATTEMPT,
            AttemptKind::Simulation => SCENARIOS_PER_ATTEMPT,
        }
    }
}

static LAST_SESSION_ID: AtomicI64 = AtomicI64::new(0);

/// Time-derived session id, strictly increasing within the process even
/// when two sessions start in the same millisecond.
fn next_session_id() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    match LAST_SESSION_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => now.max(prev + 1),
    }
}

/// Result of recording one submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub verdict: Verdict,
    pub answered: usize,
    pub correct: usize,
    pub completed: bool,
}

/// One bounded run through a shuffled question pool.
///
/// Lifecycle: `start` shuffles the pool and resets counters; `submit`
/// evaluates the current question exactly once; `advance` moves to the
/// next question; the attempt completes when `answered` reaches the
/// target, which is the nominal length clamped to the pool size.
#[derive(Debug)]
pub struct AttemptSession {
    session_id: i64,
    kind: AttemptKind,
    questions: Vec<Question>,
    cursor: usize,
    target: usize,
    answered: usize,
    correct: usize,
    current_submitted: bool,
}

impl AttemptSession {
    pub fn start(kind: AttemptKind, mut pool: Vec<Question>) -> Result<Self, AppError> {
        if pool.is_empty() {
            return Err(AppError::NotFound("No questions available".to_string()));
        }

        pool.shuffle(&mut rand::thread_rng());
        let target = kind.nominal_length().min(pool.len());

        Ok(Self {
            session_id: next_session_id(),
            kind,
            questions: pool,
            cursor: 0,
            target,
            answered: 0,
            correct: 0,
            current_submitted: false,
        })
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn kind(&self) -> AttemptKind {
        self.kind
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.cursor]
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= self.target
    }

    /// Evaluates the current question. Each question is counted at most
    /// once per session; a second submission without advancing, or any
    /// submission after completion, is rejected without state change.
    pub fn submit(&mut self, submission: &Submission) -> Result<SubmissionOutcome, AppError> {
        if self.is_complete() {
            return Err(AppError::BadRequest(
                "Attempt already completed".to_string(),
            ));
        }
        if self.current_submitted {
            return Err(AppError::BadRequest(
                "This question was already answered".to_string(),
            ));
        }

        let verdict = evaluator::evaluate(self.current(), submission)?;

        self.current_submitted = true;
        self.answered += 1;
        if verdict.correct {
            self.correct += 1;
        }

        Ok(SubmissionOutcome {
            answered: self.answered,
            correct: self.correct,
            completed: self.is_complete(),
            verdict,
        })
    }

    /// Moves to the next question, wrapping around the pool. Only valid
    /// after the current question was answered.
    pub fn advance(&mut self) -> Result<&Question, AppError> {
        if self.is_complete() {
            return Err(AppError::BadRequest(
                "Attempt already completed".to_string(),
            ));
        }
        if !self.current_submitted {
            return Err(AppError::BadRequest(
                "Answer the current question first".to_string(),
            ));
        }

        self.cursor = (self.cursor + 1) % self.questions.len();
        self.current_submitted = false;
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionKind;

    fn mcq_pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: i as i64,
                prompt: format!("question {}", i),
                explanation: String::new(),
                category: "Phishing".to_string(),
                kind: QuestionKind::Mcq {
                    correct_answer: "A".to_string(),
                    incorrect_answers: vec!["B".to_string()],
                },
            })
            .collect()
    }

    fn answer(a: &str) -> Submission {
        Submission::Choice {
            answer: a.to_string(),
        }
    }

    #[test]
    fn empty_pool_cannot_start() {
        assert!(AttemptSession::start(AttemptKind::Quiz, Vec::new()).is_err());
    }

    #[test]
    fn target_clamps_to_pool_size() {
        let session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(3)).unwrap();
        assert_eq!(session.target(), 3);

        let session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(25)).unwrap();
        assert_eq!(session.target(), QUESTIONS_PER_ATTEMPT);

        let session = AttemptSession::start(AttemptKind::Simulation, mcq_pool(25)).unwrap();
        assert_eq!(session.target(), SCENARIOS_PER_ATTEMPT);
    }

    #[test]
    fn completes_exactly_once_after_clamped_target() {
        let mut session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(3)).unwrap();

        for i in 0..3 {
            let outcome = session.submit(&answer("A")).unwrap();
            assert_eq!(outcome.answered, i + 1);
            assert_eq!(outcome.completed, i == 2);
            if !outcome.completed {
                session.advance().unwrap();
            }
        }

        assert!(session.is_complete());
        assert_eq!(session.correct(), 3);
        assert!(session.submit(&answer("A")).is_err());
        assert!(session.advance().is_err());
    }

    #[test]
    fn same_question_is_never_double_counted() {
        let mut session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(3)).unwrap();
        session.submit(&answer("A")).unwrap();
        assert!(session.submit(&answer("A")).is_err());
        assert_eq!(session.answered(), 1);

        session.advance().unwrap();
        session.submit(&answer("B")).unwrap();
        assert_eq!(session.answered(), 2);
        assert_eq!(session.correct(), 1);
    }

    #[test]
    fn cannot_advance_past_an_unanswered_question() {
        let mut session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(3)).unwrap();
        assert!(session.advance().is_err());
    }

    #[test]
    fn rejected_submission_changes_no_state() {
        let mut session = AttemptSession::start(AttemptKind::Quiz, mcq_pool(3)).unwrap();
        assert!(session.submit(&answer("")).is_err());
        assert_eq!(session.answered(), 0);
        // A valid submission still goes through afterwards.
        assert!(session.submit(&answer("A")).is_ok());
    }

    #[test]
    fn session_ids_are_unique_and_increasing() {
        let a = AttemptSession::start(AttemptKind::Quiz, mcq_pool(1)).unwrap();
        let b = AttemptSession::start(AttemptKind::Quiz, mcq_pool(1)).unwrap();
        assert!(b.session_id() > a.session_id());
    }
}
