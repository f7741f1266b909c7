//! Questionnaire data model.
//!
//! Mirrors the wire format of the questionnaire API (camelCase JSON).
//! Questions carry their display `order`, optional choice options, and the
//! conditional edges (`option -> child question`) that reveal follow-up
//! questions. The fixed order positions and sentinel option ids used by the
//! sleep-diary domain rules live in [`crate::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two authored questionnaires a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireType {
    Morning,
    Evening,
}

impl QuestionnaireType {
    /// Wire/API identifier ("morning" / "evening").
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionnaireType::Morning => "morning",
            QuestionnaireType::Evening => "evening",
        }
    }
}

impl fmt::Display for QuestionnaireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionnaireType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(QuestionnaireType::Morning),
            "evening" => Ok(QuestionnaireType::Evening),
            other => Err(format!("unknown questionnaire type: {other}")),
        }
    }
}

/// Input type of a question, which also fixes the shape of its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Free text.
    Text,
    /// Time of day, stored as an "HH:mm" string.
    TimePicker,
    /// Integer input.
    Numeric,
    /// Bounded integer slider.
    Slider,
    /// Single choice among options.
    MultipleChoice,
    /// Any number of choices among options.
    MultipleChoiceMultiple,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Text => "text",
            QuestionType::TimePicker => "time_picker",
            QuestionType::Numeric => "numeric",
            QuestionType::Slider => "slider",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultipleChoiceMultiple => "multiple_choice_multiple",
        };
        f.write_str(name)
    }
}

/// Display language for question text and rule messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Da,
    En,
}

impl Locale {
    /// Wire/API identifier ("da" / "en").
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Da => "da",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "da" => Ok(Locale::Da),
            "en" => Ok(Locale::En),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// Advisor-facing color band attached to an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCode {
    Green,
    Yellow,
    Red,
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_da: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_en: Option<String>,
    /// "Other" option -- requires accompanying free text to count as answered.
    #[serde(default)]
    pub is_other: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<ColorCode>,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            text_da: None,
            text_en: None,
            is_other: false,
            color_code: None,
        }
    }

    /// An "other" option whose selection requires custom text.
    pub fn other(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            is_other: true,
            ..Self::new(id, text)
        }
    }
}

/// Conditional edge: selecting `option_id` on the parent reveals the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalChild {
    pub option_id: String,
    pub child_question_id: String,
}

/// A single question of a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub questionnaire_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_da: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_en: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Authoring-time immutability flag; irrelevant to runtime traversal.
    #[serde(default)]
    pub is_locked: bool,
    /// Display/navigation position among main questions. Dense but not
    /// necessarily contiguous.
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_children: Vec<ConditionalChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// Lower bound for time questions, "HH:mm".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<String>,
    /// Upper bound for time questions, "HH:mm".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<String>,
}

impl Question {
    /// Create a question with the given identity and type; everything else
    /// defaults to empty. Builder-style `with_*` methods fill in the rest.
    pub fn new(id: impl Into<String>, order: u32, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            questionnaire_id: String::new(),
            text: String::new(),
            text_da: None,
            text_en: None,
            question_type,
            is_locked: false,
            order,
            options: Vec::new(),
            conditional_children: Vec::new(),
            min_value: None,
            max_value: None,
            min_time: None,
            max_time: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_conditional_child(
        mut self,
        option_id: impl Into<String>,
        child_question_id: impl Into<String>,
    ) -> Self {
        self.conditional_children.push(ConditionalChild {
            option_id: option_id.into(),
            child_question_id: child_question_id.into(),
        });
        self
    }

    pub fn with_value_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_time_bounds(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min_time = min.map(str::to_string);
        self.max_time = max.map(str::to_string);
        self
    }

    /// Localized question text with fallback to whatever is present.
    pub fn display_text(&self, locale: Locale) -> &str {
        let localized = match locale {
            Locale::En => self.text_en.as_deref(),
            Locale::Da => self.text_da.as_deref(),
        };
        localized
            .or(self.text_da.as_deref())
            .unwrap_or(&self.text)
    }

    /// The option with the given id, if any.
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// The "other" option of a choice question, if any.
    pub fn other_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.is_other)
    }
}
