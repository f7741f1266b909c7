//! Immutable question-graph view of one questionnaire.
//!
//! Built once per session from the full question list. Conditional edges are
//! folded defensively into a `(parent id, option id) -> child id` map, last
//! write wins, so duplicate or inconsistent authored edges cannot corrupt
//! traversal.

use std::collections::{BTreeMap, HashSet};

use crate::answer::AnswerValue;
use crate::question::{Question, QuestionType};

/// Read-only graph over a questionnaire's questions and conditional edges.
#[derive(Debug, Clone)]
pub struct QuestionGraph {
    questions: Vec<Question>,
    /// (parent question id, option id) -> child question id, folded
    /// last-write-wins over the authored edge lists.
    edges: BTreeMap<(String, String), String>,
    child_ids: HashSet<String>,
}

impl QuestionGraph {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut edges = BTreeMap::new();
        for q in &questions {
            for cc in &q.conditional_children {
                edges.insert(
                    (q.id.clone(), cc.option_id.clone()),
                    cc.child_question_id.clone(),
                );
            }
        }
        let child_ids = edges.values().cloned().collect();
        Self {
            questions,
            edges,
            child_ids,
        }
    }

    /// All questions in their loaded order.
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Whether the question is some other question's conditional child.
    pub fn is_conditional(&self, question_id: &str) -> bool {
        self.child_ids.contains(question_id)
    }

    /// Main questions: never referenced as a conditional child, sorted by
    /// `order` ascending. This is the canonical line shown in progress UI.
    pub fn root_questions(&self) -> Vec<&Question> {
        let mut roots: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| !q.id.is_empty() && !self.child_ids.contains(&q.id))
            .collect();
        roots.sort_by_key(|q| q.order);
        roots
    }

    /// Conditional children of `parent_id` triggered by the given answer,
    /// sorted by the children's own `order`. Children referencing ids absent
    /// from the question list are skipped.
    pub fn children_for(&self, parent_id: &str, answer: &AnswerValue) -> Vec<&Question> {
        let selected = answer.selected_option_ids();
        let mut children: Vec<&Question> = self
            .edges
            .iter()
            .filter(|((parent, option), _)| {
                parent == parent_id && selected.iter().any(|s| s == option)
            })
            .filter_map(|(_, child_id)| self.get(child_id))
            .collect();
        children.sort_by_key(|q| q.order);
        children.dedup_by(|a, b| a.id == b.id);
        children
    }

    /// The main question whose position stands in for `question_id`: the
    /// question itself when it is a root, otherwise the root it hangs off.
    /// Returns `None` for unknown ids or orphaned/cyclic edges.
    pub fn main_ancestor(&self, question_id: &str) -> Option<&Question> {
        let mut current = question_id.to_string();
        let mut seen = HashSet::new();
        while self.child_ids.contains(&current) {
            if !seen.insert(current.clone()) {
                return None;
            }
            let parent = self
                .edges
                .iter()
                .find(|(_, child)| child.as_str() == current)
                .map(|((parent, _), _)| parent.clone())?;
            current = parent;
        }
        self.get(&current)
    }

    /// Lookup used by the fixed domain rules, which address questions by
    /// their authored order position and type.
    pub fn find_by_order(&self, order: u32, question_type: QuestionType) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| q.order == order && q.question_type == question_type)
    }

    /// Any question at the given order position, regardless of type.
    pub fn find_by_order_any(&self, order: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.order == order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionOption;

    fn small_graph() -> QuestionGraph {
        QuestionGraph::new(vec![
            Question::new("q1", 1, QuestionType::Text),
            Question::new("q2", 2, QuestionType::MultipleChoice)
                .with_options(vec![
                    QuestionOption::new("yes", "Yes"),
                    QuestionOption::new("no", "No"),
                ])
                .with_conditional_child("yes", "q2a")
                .with_conditional_child("yes", "q2b"),
            Question::new("q2b", 21, QuestionType::Numeric),
            Question::new("q2a", 20, QuestionType::Numeric),
            Question::new("q3", 3, QuestionType::Slider),
        ])
    }

    #[test]
    fn test_roots_exclude_children_and_sort_by_order() {
        let graph = small_graph();
        let ids: Vec<&str> = graph.root_questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_roots_never_contain_child_ids() {
        let graph = small_graph();
        for root in graph.root_questions() {
            assert!(!graph.is_conditional(&root.id));
        }
    }

    #[test]
    fn test_children_sorted_by_child_order() {
        let graph = small_graph();
        let children = graph.children_for("q2", &AnswerValue::choice("yes"));
        let ids: Vec<&str> = children.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q2a", "q2b"]);
        assert!(graph
            .children_for("q2", &AnswerValue::choice("no"))
            .is_empty());
    }

    #[test]
    fn test_duplicate_edges_fold_last_write_wins() {
        let graph = QuestionGraph::new(vec![
            Question::new("p", 1, QuestionType::MultipleChoice)
                .with_conditional_child("yes", "c1")
                .with_conditional_child("yes", "c2"),
            Question::new("c1", 10, QuestionType::Numeric),
            Question::new("c2", 11, QuestionType::Numeric),
        ]);
        // same (parent, option) key: the later edge replaces the earlier one
        let children = graph.children_for("p", &AnswerValue::choice("yes"));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "c2");
        assert!(!graph.is_conditional("c1"));
    }

    #[test]
    fn test_main_ancestor() {
        let graph = small_graph();
        assert_eq!(graph.main_ancestor("q2a").unwrap().id, "q2");
        assert_eq!(graph.main_ancestor("q3").unwrap().id, "q3");
        assert!(graph.main_ancestor("missing").is_none());
    }

    #[test]
    fn test_find_by_order_and_type() {
        let graph = small_graph();
        assert_eq!(
            graph
                .find_by_order(2, QuestionType::MultipleChoice)
                .unwrap()
                .id,
            "q2"
        );
        assert!(graph.find_by_order(2, QuestionType::Numeric).is_none());
    }

    #[test]
    fn test_dangling_child_edge_is_skipped() {
        let graph = QuestionGraph::new(vec![Question::new("p", 1, QuestionType::MultipleChoice)
            .with_conditional_child("yes", "ghost")]);
        assert!(graph.children_for("p", &AnswerValue::choice("yes")).is_empty());
        // the dangling id still counts as conditional and resolves to its parent
        assert!(graph.is_conditional("ghost"));
        assert_eq!(graph.main_ancestor("ghost").unwrap().id, "p");
    }
}
