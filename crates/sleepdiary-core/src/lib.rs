//! # Sleepdiary Core Library
//!
//! This library provides the core business logic for Sleepdiary, a branching
//! sleep-questionnaire runner. It implements a library-first philosophy where
//! the whole wizard flow is driven through [`WizardController`], with any UI
//! (web, CLI, desktop) being a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Question Graph**: an immutable view of a questionnaire's questions,
//!   their order, and the conditional edges revealed by specific options
//! - **Answer Store**: typed answer values keyed by question id, owned by
//!   exactly one wizard session
//! - **Validator**: pure completeness checks plus the four fixed sleep-diary
//!   session rules (time ordering and the night-wake gate)
//! - **Navigator**: previous/last/jump queries over the main question line
//! - **Wizard Controller**: the session state machine a UI drives
//! - **Client**: abstract collaborators for fetching questions, asking the
//!   server for the next question, and submitting a finished response
//!
//! ## Key Components
//!
//! - [`WizardController`]: session state machine over one questionnaire run
//! - [`QuestionGraph`]: root/child structure with defensive edge folding
//! - [`QuestionnaireClient`]: trait for the external question/response API

pub mod answer;
pub mod client;
pub mod error;
pub mod graph;
pub mod navigate;
pub mod progress;
pub mod question;
pub mod validate;
pub mod wizard;

pub use answer::{AnswerStore, AnswerValue, ChoiceAnswer, MultiValue};
pub use client::{
    HttpClient, MemoryClient, NextQuestionRequest, QuestionnaireClient, ResponseRequest,
    SubmittedResponse,
};
pub use error::{ClientError, WizardError};
pub use graph::QuestionGraph;
pub use progress::{compute_progress, Progress};
pub use question::{
    ConditionalChild, Locale, Question, QuestionOption, QuestionType, QuestionnaireType,
};
pub use wizard::{AdvanceOutcome, WizardController, WizardState};
