//! Typed answer values and the per-session answer store.
//!
//! The wire format is the untyped JSON the original API speaks: numbers,
//! strings, `{optionId, customText}` objects, and arrays mixing bare option
//! ids with such objects. [`AnswerValue`] is the tagged-union view of that,
//! and [`AnswerValue::selected_option_ids`] is the single normalization rule
//! every consumer of "which options are selected" goes through.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single-choice selection, optionally carrying "other" free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceAnswer {
    pub option_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

/// One entry of a multi-choice answer: either a bare option id or a full
/// choice object (used for the "other" option).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultiValue {
    Choice(ChoiceAnswer),
    Id(String),
}

impl MultiValue {
    pub fn option_id(&self) -> &str {
        match self {
            MultiValue::Choice(c) => &c.option_id,
            MultiValue::Id(id) => id,
        }
    }
}

/// Answer to one question. Variant depends on the question type: numbers for
/// numeric/slider, strings for text and "HH:mm" times, choice objects and
/// lists for the choice types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
    Choice(ChoiceAnswer),
    Multi(Vec<MultiValue>),
}

impl AnswerValue {
    /// Single-choice value.
    pub fn choice(option_id: impl Into<String>) -> Self {
        AnswerValue::Choice(ChoiceAnswer {
            option_id: option_id.into(),
            custom_text: None,
        })
    }

    /// Single-choice "other" value with its free text.
    pub fn choice_with_text(option_id: impl Into<String>, custom_text: impl Into<String>) -> Self {
        AnswerValue::Choice(ChoiceAnswer {
            option_id: option_id.into(),
            custom_text: Some(custom_text.into()),
        })
    }

    /// Blank for gating purposes: empty/whitespace strings and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Multi(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Normalize to the list of selected option ids. Arrays map each entry
    /// through its option id; a choice object contributes its option id; any
    /// other non-empty scalar is wrapped as a one-element list.
    pub fn selected_option_ids(&self) -> Vec<String> {
        match self {
            AnswerValue::Multi(entries) => {
                entries.iter().map(|e| e.option_id().to_string()).collect()
            }
            AnswerValue::Choice(c) => vec![c.option_id.clone()],
            AnswerValue::Text(s) if !s.trim().is_empty() => vec![s.clone()],
            AnswerValue::Text(_) => Vec::new(),
            AnswerValue::Number(n) => vec![n.to_string()],
        }
    }

    /// The selected option id of a single-choice answer (bare string or
    /// choice object). `None` for lists, numbers, and blanks.
    pub fn option_id(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(c) => Some(&c.option_id),
            AnswerValue::Text(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    /// The "other" free text, if this is a choice object carrying one.
    pub fn custom_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(c) => c.custom_text.as_deref(),
            _ => None,
        }
    }

    /// Integer coercion: numbers directly, numeric strings parsed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Plain-text view of string answers (text and time questions).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String rendering used to compare a dependent default against the
    /// value it was copied from.
    pub fn display_string(&self) -> Option<String> {
        match self {
            AnswerValue::Text(s) => Some(s.trim().to_string()),
            AnswerValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

/// Answers keyed by question id. Owned by exactly one wizard session and
/// handed off wholesale to review/submit at session end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    map: HashMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.map.get(question_id)
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.map.insert(question_id.into(), value.into());
    }

    /// Removal is only used to clear an automatically-set default.
    pub fn remove(&mut self, question_id: &str) -> Option<AnswerValue> {
        self.map.remove(question_id)
    }

    /// Whether a non-blank answer exists for the question.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.map.get(question_id).is_some_and(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_wire_shapes() {
        let n: AnswerValue = serde_json::from_str("3").unwrap();
        assert_eq!(n, AnswerValue::Number(3));

        let t: AnswerValue = serde_json::from_str("\"22:15\"").unwrap();
        assert_eq!(t, AnswerValue::Text("22:15".into()));

        let c: AnswerValue =
            serde_json::from_str(r#"{"optionId": "opt_other", "customText": "melatonin"}"#)
                .unwrap();
        assert_eq!(c, AnswerValue::choice_with_text("opt_other", "melatonin"));

        let m: AnswerValue =
            serde_json::from_str(r#"["opt_a", {"optionId": "opt_other", "customText": "x"}]"#)
                .unwrap();
        assert_eq!(m.selected_option_ids(), vec!["opt_a", "opt_other"]);
    }

    #[test]
    fn test_normalization_of_every_shape() {
        assert_eq!(
            AnswerValue::choice("opt_a").selected_option_ids(),
            vec!["opt_a"]
        );
        assert_eq!(
            AnswerValue::from("opt_b").selected_option_ids(),
            vec!["opt_b"]
        );
        assert_eq!(AnswerValue::from(7).selected_option_ids(), vec!["7"]);
        assert!(AnswerValue::from("").selected_option_ids().is_empty());
        assert!(AnswerValue::Multi(vec![]).selected_option_ids().is_empty());
    }

    #[test]
    fn test_emptiness() {
        assert!(AnswerValue::from("   ").is_empty());
        assert!(AnswerValue::Multi(vec![]).is_empty());
        assert!(!AnswerValue::Number(0).is_empty());
        assert!(!AnswerValue::choice("x").is_empty());
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(AnswerValue::Number(5).as_int(), Some(5));
        assert_eq!(AnswerValue::from(" 12 ").as_int(), Some(12));
        assert_eq!(AnswerValue::from("12:30").as_int(), None);
        assert_eq!(AnswerValue::choice("x").as_int(), None);
    }

    #[test]
    fn test_store_answered() {
        let mut store = AnswerStore::new();
        assert!(!store.is_answered("q1"));
        store.set("q1", "");
        assert!(!store.is_answered("q1"));
        store.set("q1", "hello");
        assert!(store.is_answered("q1"));
        store.remove("q1");
        assert!(!store.is_answered("q1"));
    }

    #[test]
    fn test_store_round_trips_as_plain_map() {
        let mut store = AnswerStore::new();
        store.set("q5", 15);
        store.set("q3", "23:00");
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["q5"], 15);
        assert_eq!(json["q3"], "23:00");
        let back: AnswerStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
