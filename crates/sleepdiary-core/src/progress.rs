//! Linear progress over the main question line.
//!
//! Conditional children never count, even while visible and required; the
//! progress indicator tracks root questions only.

use serde::Serialize;

use crate::answer::AnswerStore;
use crate::graph::QuestionGraph;
use crate::question::QuestionnaireType;
use crate::validate::is_answer_complete;

/// Derived progress view; recomputed on every answer change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Root questions passing the completeness check.
    pub answered: usize,
    /// Total root questions.
    pub total: usize,
    /// round(answered / total * 100); 0 for an empty questionnaire.
    pub percentage: u32,
}

pub fn compute_progress(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    questionnaire_type: QuestionnaireType,
) -> Progress {
    let roots = graph.root_questions();
    let total = roots.len();
    let answered = roots
        .iter()
        .filter(|q| is_answer_complete(q, answers, graph, questionnaire_type))
        .count();
    let percentage = if total == 0 {
        0
    } else {
        ((answered as f64 / total as f64) * 100.0).round() as u32
    };
    Progress {
        answered,
        total,
        percentage,
    }
}
