//! Workshop survey records.
//!
//! - `registration`: participants and the registration form
//! - `questions`: per-neighborhood dynamic questions
//! - `parks`: park catalog and 1..=5 park ratings
//!
//! Everything here is plain data plus validation; persistence lives in
//! [`crate::storage`].

mod parks;
mod questions;
mod registration;

pub use parks::{
    Park, ParkEvaluationSubmission, ParkRating, ParkScores, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE,
};
pub use questions::{split_values, AnswerValue, Question, QuestionKind};
pub use registration::{
    generate_participant_id, is_valid_participant_id, CoreValue, Participant, ParticipantRole,
    Registration, MAX_AGE, MIN_AGE, PARTICIPANT_ID_LEN,
};
