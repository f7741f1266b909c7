//! Position queries over the main question line.
//!
//! A conditional question's position for navigation purposes is its parent
//! root question's order. These are pure functions; the wizard controller
//! applies their results.

use crate::answer::AnswerStore;
use crate::graph::QuestionGraph;
use crate::question::{Question, QuestionnaireType};
use crate::validate::is_answer_complete;

/// The main question immediately before the current position, if any.
pub fn previous_main_question<'a>(
    graph: &'a QuestionGraph,
    current_id: &str,
) -> Option<&'a Question> {
    let main = graph.main_ancestor(current_id)?;
    let roots = graph.root_questions();
    let index = roots.iter().position(|q| q.id == main.id)?;
    if index == 0 {
        return None;
    }
    Some(roots[index - 1])
}

/// Whether the current question is the last one the session will show:
/// no main question follows the current main ancestor, and the current
/// selection triggers no further conditional children.
pub fn is_last_question(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    current_id: &str,
    visible_conditionals: &[Question],
) -> bool {
    if graph.get(current_id).is_none() {
        return false;
    }
    let roots = graph.root_questions();
    if roots.is_empty() {
        return false;
    }
    let Some(main) = graph.main_ancestor(current_id) else {
        return false;
    };
    if roots.iter().any(|q| q.order > main.order) {
        return false;
    }

    if graph.is_conditional(current_id) {
        // On a conditional child: last only when it is the final triggered
        // child of the last main question.
        let Some(answer) = answers.get(&main.id) else {
            return false;
        };
        let triggered = graph.children_for(&main.id, answer);
        if triggered.is_empty() {
            return true;
        }
        match triggered.iter().position(|q| q.id == current_id) {
            Some(index) => index == triggered.len() - 1,
            None => false,
        }
    } else {
        // On the last main question: any visible or triggered children mean
        // more questions follow.
        if !visible_conditionals.is_empty() {
            return false;
        }
        if let Some(answer) = answers.get(current_id) {
            if !graph.children_for(current_id, answer).is_empty() {
                return false;
            }
        }
        true
    }
}

/// Whether a jump to `target_id` is permitted: the target is answered,
/// already visited, or at/before the current position in main-line order.
pub fn can_jump_to(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    history: &[String],
    current_id: &str,
    target_id: &str,
    questionnaire_type: QuestionnaireType,
) -> bool {
    let Some(target) = graph.get(target_id) else {
        return false;
    };
    if target_id == current_id {
        return true;
    }
    if is_answer_complete(target, answers, graph, questionnaire_type) {
        return true;
    }
    if history.iter().any(|h| h == target_id) {
        return true;
    }
    let (Some(target_main), Some(current_main)) = (
        graph.main_ancestor(target_id),
        graph.main_ancestor(current_id),
    ) else {
        return false;
    };
    target_main.order <= current_main.order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerValue;
    use crate::question::{QuestionOption, QuestionType};

    fn graph() -> QuestionGraph {
        QuestionGraph::new(vec![
            Question::new("q1", 1, QuestionType::Text),
            Question::new("q2", 2, QuestionType::Numeric),
            Question::new("q3", 3, QuestionType::MultipleChoice)
                .with_options(vec![
                    QuestionOption::new("yes", "Yes"),
                    QuestionOption::new("no", "No"),
                ])
                .with_conditional_child("yes", "q3a")
                .with_conditional_child("yes", "q3b"),
            Question::new("q3a", 30, QuestionType::Numeric),
            Question::new("q3b", 31, QuestionType::Numeric),
        ])
    }

    const MORNING: QuestionnaireType = QuestionnaireType::Morning;

    #[test]
    fn test_previous_main_question() {
        let g = graph();
        assert!(previous_main_question(&g, "q1").is_none());
        assert_eq!(previous_main_question(&g, "q2").unwrap().id, "q1");
        // a conditional child's previous is relative to its parent
        assert_eq!(previous_main_question(&g, "q3a").unwrap().id, "q2");
    }

    #[test]
    fn test_last_main_without_trigger() {
        let g = graph();
        let mut answers = AnswerStore::new();
        assert!(!is_last_question(&g, &answers, "q2", &[]));
        // unanswered last main: nothing triggered yet
        assert!(is_last_question(&g, &answers, "q3", &[]));
        answers.set("q3", AnswerValue::choice("no"));
        assert!(is_last_question(&g, &answers, "q3", &[]));
        answers.set("q3", AnswerValue::choice("yes"));
        assert!(!is_last_question(&g, &answers, "q3", &[]));
    }

    #[test]
    fn test_last_main_with_visible_children() {
        let g = graph();
        let answers = AnswerStore::new();
        let visible = vec![Question::new("q3a", 30, QuestionType::Numeric)];
        assert!(!is_last_question(&g, &answers, "q3", &visible));
    }

    #[test]
    fn test_last_conditional_child() {
        let g = graph();
        let mut answers = AnswerStore::new();
        answers.set("q3", AnswerValue::choice("yes"));
        assert!(!is_last_question(&g, &answers, "q3a", &[]));
        assert!(is_last_question(&g, &answers, "q3b", &[]));
    }

    #[test]
    fn test_jump_permissions() {
        let g = graph();
        let mut answers = AnswerStore::new();
        let history = vec!["q1".to_string(), "q2".to_string()];

        // backwards and same-position jumps are always allowed
        assert!(can_jump_to(&g, &answers, &history, "q2", "q1", MORNING));
        assert!(can_jump_to(&g, &answers, &history, "q2", "q2", MORNING));
        // forward to an unanswered, unvisited question is not
        assert!(!can_jump_to(&g, &answers, &history, "q1", "q3", MORNING));
        // answered targets are reachable from anywhere
        answers.set("q3", AnswerValue::choice("no"));
        assert!(can_jump_to(&g, &answers, &history, "q1", "q3", MORNING));
        // visited targets too, even when unanswered
        assert!(can_jump_to(&g, &AnswerStore::new(), &history, "q1", "q2", MORNING));
        // unknown targets never
        assert!(!can_jump_to(&g, &answers, &history, "q1", "nope", MORNING));
    }
}
