//! Completeness checks and the fixed sleep-diary session rules.
//!
//! All rules here are pure functions of (graph, answers) returning an
//! optional user-facing message. They never panic and never error: missing
//! answers and malformed time strings simply produce no message, leaving
//! format problems to the field-level input check. Messages never block
//! typing -- the wizard only consults them on advance and submit.
//!
//! The four session rules address questions by their authored `order`
//! position in the morning questionnaire. This coupling is deliberate and
//! matches the authored data; reordering those questions would silently
//! detach the rules.

use chrono::NaiveTime;

use crate::answer::{AnswerStore, AnswerValue, MultiValue};
use crate::graph::QuestionGraph;
use crate::question::{Locale, Question, QuestionType, QuestionnaireType};

/// Fixed order positions in the morning questionnaire.
pub const ORDER_MEDICATION: u32 = 1;
pub const ORDER_ACTIVITY_LOG: u32 = 2;
pub const ORDER_WENT_TO_BED: u32 = 3;
pub const ORDER_LIGHTS_OFF: u32 = 4;
pub const ORDER_SLEEP_LATENCY: u32 = 5;
pub const ORDER_NIGHT_WAKE: u32 = 6;
pub const ORDER_WAKE_COUNT: u32 = 7;
pub const ORDER_WAKE_MINUTES: u32 = 8;
pub const ORDER_WOKE_UP: u32 = 9;
pub const ORDER_OUT_OF_BED: u32 = 10;
pub const ORDER_MOOD: u32 = 11;

/// Character cap on the activity-log text question.
pub const MAX_TEXT_LENGTH: usize = 200;

/// Sentinel option ids of the night-wake gate question.
pub const WAKE_YES: &str = "wake_yes";
pub const WAKE_NO: &str = "wake_no";

/// Strict "HH:mm" parse: exactly five characters, 00-23 hours, 00-59
/// minutes. Anything else is `None`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let hours: u32 = s[..2].parse().ok()?;
    let minutes: u32 = s[3..].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// A stored answer rendered as trimmed text together with its parsed time.
/// `None` when unanswered, blank, or not a well-formed "HH:mm" string.
fn time_answer(answers: &AnswerStore, question_id: &str) -> Option<(String, NaiveTime)> {
    let value = answers.get(question_id)?;
    if value.is_empty() {
        return None;
    }
    let text = value.display_string()?;
    let time = parse_time(&text)?;
    Some((text, time))
}

/// Whether the question counts as answered for progress and gating.
pub fn is_answer_complete(
    question: &Question,
    answers: &AnswerStore,
    graph: &QuestionGraph,
    questionnaire_type: QuestionnaireType,
) -> bool {
    let Some(answer) = answers.get(&question.id) else {
        return false;
    };
    if answer.is_empty() {
        return false;
    }

    // Activity-log cap: over-long text is incomplete, not just flagged.
    if question.question_type == QuestionType::Text
        && questionnaire_type == QuestionnaireType::Morning
        && question.order == ORDER_ACTIVITY_LOG
    {
        if let Some(text) = answer.as_text() {
            if text.trim().is_empty() || text.chars().count() > MAX_TEXT_LENGTH {
                return false;
            }
        }
    }

    // Wake-minutes cap: a "no" on the gate makes any positive value invalid.
    if questionnaire_type == QuestionnaireType::Morning
        && question.order == ORDER_WAKE_MINUTES
        && question.question_type == QuestionType::Numeric
    {
        if let Some(gate) = graph.find_by_order(ORDER_NIGHT_WAKE, QuestionType::MultipleChoice) {
            let gate_is_no = answers
                .get(&gate.id)
                .and_then(AnswerValue::option_id)
                .is_some_and(|id| id == WAKE_NO);
            if gate_is_no && answer.as_int().is_some_and(|v| v > 0) {
                return false;
            }
        }
    }

    // "Other" on a single choice needs its free text.
    if question.question_type == QuestionType::MultipleChoice {
        if let AnswerValue::Choice(choice) = answer {
            if let Some(option) = question.option(&choice.option_id) {
                if option.is_other {
                    return choice
                        .custom_text
                        .as_deref()
                        .is_some_and(|t| !t.trim().is_empty());
                }
            }
        }
    }

    // Same for "other" among multi-choice selections.
    if question.question_type == QuestionType::MultipleChoiceMultiple {
        if let (AnswerValue::Multi(entries), Some(other)) = (answer, question.other_option()) {
            for entry in entries {
                if let MultiValue::Choice(choice) = entry {
                    if choice.option_id == other.id
                        && !choice
                            .custom_text
                            .as_deref()
                            .is_some_and(|t| !t.trim().is_empty())
                    {
                        return false;
                    }
                }
            }
        }
    }

    true
}

/// R1: the lights-off time must not precede the went-to-bed time.
pub fn check_lights_off(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    questionnaire_type: QuestionnaireType,
    locale: Locale,
) -> Option<String> {
    if questionnaire_type != QuestionnaireType::Morning {
        return None;
    }
    let bed_q = graph.find_by_order(ORDER_WENT_TO_BED, QuestionType::TimePicker)?;
    let lights_q = graph.find_by_order(ORDER_LIGHTS_OFF, QuestionType::TimePicker)?;
    let (bed_text, bed_time) = time_answer(answers, &bed_q.id)?;
    let (lights_text, lights_time) = time_answer(answers, &lights_q.id)?;
    if lights_time < bed_time {
        return Some(msg_lights_off(locale, &lights_text, &bed_text));
    }
    None
}

/// R2: the out-of-bed time must not precede the woke-up time.
pub fn check_wake_times(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    questionnaire_type: QuestionnaireType,
    locale: Locale,
) -> Option<String> {
    if questionnaire_type != QuestionnaireType::Morning {
        return None;
    }
    let woke_q = graph.find_by_order(ORDER_WOKE_UP, QuestionType::TimePicker)?;
    let out_q = graph.find_by_order(ORDER_OUT_OF_BED, QuestionType::TimePicker)?;
    let (woke_text, woke_time) = time_answer(answers, &woke_q.id)?;
    let (out_text, out_time) = time_answer(answers, &out_q.id)?;
    if out_time < woke_time {
        return Some(msg_wake_times(locale, &out_text, &woke_text));
    }
    None
}

/// R3: sleep latency. As a time it must not precede bedtime; as a number of
/// minutes it must be non-negative.
pub fn check_sleep_latency(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    questionnaire_type: QuestionnaireType,
    locale: Locale,
) -> Option<String> {
    if questionnaire_type != QuestionnaireType::Morning {
        return None;
    }
    let bed_q = graph.find_by_order(ORDER_WENT_TO_BED, QuestionType::TimePicker)?;
    let latency_q = graph.find_by_order_any(ORDER_SLEEP_LATENCY)?;
    if !answers.is_answered(&bed_q.id) || !answers.is_answered(&latency_q.id) {
        return None;
    }
    match latency_q.question_type {
        QuestionType::TimePicker => {
            let (bed_text, bed_time) = time_answer(answers, &bed_q.id)?;
            let (latency_text, latency_time) = time_answer(answers, &latency_q.id)?;
            if latency_time < bed_time {
                return Some(msg_sleep_time(locale, &latency_text, &bed_text));
            }
            None
        }
        QuestionType::Numeric => {
            match answers.get(&latency_q.id).and_then(AnswerValue::as_int) {
                Some(minutes) if minutes >= 0 => None,
                _ => Some(msg_sleep_minutes(locale)),
            }
        }
        _ => None,
    }
}

/// R4: the night-wake gate. "Yes" requires both follow-up numerics, and a
/// wake count of at least one rules out zero minutes awake. "No" rules out
/// any positive minutes awake.
pub fn check_night_wake(
    graph: &QuestionGraph,
    answers: &AnswerStore,
    questionnaire_type: QuestionnaireType,
    locale: Locale,
) -> Option<String> {
    if questionnaire_type != QuestionnaireType::Morning {
        return None;
    }
    let gate_q = graph.find_by_order(ORDER_NIGHT_WAKE, QuestionType::MultipleChoice)?;
    let count_q = graph.find_by_order(ORDER_WAKE_COUNT, QuestionType::Numeric)?;
    let minutes_q = graph.find_by_order(ORDER_WAKE_MINUTES, QuestionType::Numeric)?;
    let gate_answer = answers.get(&gate_q.id)?;

    match gate_answer.option_id() {
        Some(WAKE_YES) => {
            if !answers.is_answered(&count_q.id) {
                return Some(msg_night_wake_missing(locale, count_q.order));
            }
            if !answers.is_answered(&minutes_q.id) {
                return Some(msg_night_wake_missing(locale, minutes_q.order));
            }
            let count = answers.get(&count_q.id).and_then(AnswerValue::as_int);
            let minutes = answers.get(&minutes_q.id).and_then(AnswerValue::as_int);
            let (Some(count), Some(minutes)) = (count, minutes) else {
                return Some(msg_night_wake_missing(locale, count_q.order));
            };
            if count >= 1 && minutes == 0 {
                return Some(msg_night_wake_conflict(locale, count));
            }
            None
        }
        Some(WAKE_NO) => {
            let exceeded = answers
                .get(&minutes_q.id)
                .filter(|v| !v.is_empty())
                .and_then(AnswerValue::as_int)
                .is_some_and(|v| v > 0);
            if exceeded {
                return Some(msg_night_wake_locked(locale));
            }
            None
        }
        _ => None,
    }
}

/// Field-level input validation, reported while typing but never blocking.
/// Covers numeric bounds, the text cap, and time format/bounds.
pub fn check_input(
    question: &Question,
    value: &AnswerValue,
    answers: &AnswerStore,
    graph: &QuestionGraph,
    questionnaire_type: QuestionnaireType,
    locale: Locale,
) -> Option<String> {
    match question.question_type {
        QuestionType::Numeric | QuestionType::Slider => {
            let Some(v) = value.as_int() else {
                return Some(msg_invalid_number(locale));
            };
            if questionnaire_type == QuestionnaireType::Morning
                && question.order == ORDER_WAKE_MINUTES
                && question.question_type == QuestionType::Numeric
            {
                let gate_is_no = graph
                    .find_by_order(ORDER_NIGHT_WAKE, QuestionType::MultipleChoice)
                    .and_then(|gate| answers.get(&gate.id))
                    .and_then(AnswerValue::option_id)
                    .is_some_and(|id| id == WAKE_NO);
                if gate_is_no && v > 0 {
                    return Some(msg_night_wake_locked(locale));
                }
            }
            if let Some(min) = question.min_value {
                if v < min {
                    return Some(msg_min_value(locale, min));
                }
            }
            if let Some(max) = question.max_value {
                if v > max {
                    return Some(msg_max_value(locale, max));
                }
            }
            if question.min_value.is_none() && v < 0 {
                return Some(msg_negative(locale));
            }
            None
        }
        QuestionType::Text => {
            let text = value.as_text().unwrap_or_default();
            if text.trim().is_empty() {
                return None; // blank is checked at submit, not while typing
            }
            if questionnaire_type == QuestionnaireType::Morning
                && question.order == ORDER_ACTIVITY_LOG
                && text.chars().count() > MAX_TEXT_LENGTH
            {
                return Some(msg_max_length(locale, MAX_TEXT_LENGTH));
            }
            None
        }
        QuestionType::TimePicker => {
            let Some(text) = value.as_text() else {
                return Some(msg_invalid_time(locale));
            };
            if text.trim().is_empty() {
                return None;
            }
            let Some(time) = parse_time(text) else {
                return Some(msg_invalid_time(locale));
            };
            if let Some(min_raw) = question.min_time.as_deref() {
                if let Some(min_time) = parse_time(min_raw) {
                    if time < min_time {
                        let is_lights_off = questionnaire_type == QuestionnaireType::Morning
                            && question.order == ORDER_LIGHTS_OFF;
                        return Some(if is_lights_off {
                            msg_lights_off(locale, text.trim(), min_raw.trim())
                        } else {
                            msg_min_time(locale, min_raw.trim())
                        });
                    }
                }
            }
            if let Some(max_raw) = question.max_time.as_deref() {
                if let Some(max_time) = parse_time(max_raw) {
                    if time > max_time {
                        let is_out_of_bed = questionnaire_type == QuestionnaireType::Morning
                            && question.order == ORDER_OUT_OF_BED;
                        return Some(if is_out_of_bed {
                            msg_wake_times(locale, text.trim(), max_raw.trim())
                        } else {
                            msg_max_time(locale, max_raw.trim())
                        });
                    }
                }
            }
            None
        }
        _ => None,
    }
}

// Rule messages, localized the way the original string tables were.

pub(crate) fn msg_must_answer_all(locale: Locale) -> String {
    match locale {
        Locale::Da => "Du skal besvare alle spørgsmål, før du kan fortsætte".to_string(),
        Locale::En => "You must answer all questions before continuing".to_string(),
    }
}

fn msg_lights_off(locale: Locale, lights_off: &str, bed_time: &str) -> String {
    match locale {
        Locale::Da => {
            format!("Du slukkede lyset kl. {lights_off}, men gik først i seng kl. {bed_time}")
        }
        Locale::En => {
            format!("You turned the light off at {lights_off}, but went to bed at {bed_time}")
        }
    }
}

fn msg_wake_times(locale: Locale, out_of_bed: &str, woke_up: &str) -> String {
    match locale {
        Locale::Da => {
            format!("Du stod op kl. {out_of_bed}, men vågnede først kl. {woke_up}")
        }
        Locale::En => {
            format!("You got out of bed at {out_of_bed}, but woke up at {woke_up}")
        }
    }
}

fn msg_sleep_time(locale: Locale, sleep_time: &str, bed_time: &str) -> String {
    match locale {
        Locale::Da => {
            format!("Du faldt i søvn kl. {sleep_time}, før du gik i seng kl. {bed_time}")
        }
        Locale::En => {
            format!("You fell asleep at {sleep_time}, before going to bed at {bed_time}")
        }
    }
}

fn msg_sleep_minutes(locale: Locale) -> String {
    match locale {
        Locale::Da => "Indsovningstiden skal være et antal minutter på mindst 0".to_string(),
        Locale::En => "Sleep latency must be a number of minutes, at least 0".to_string(),
    }
}

fn msg_night_wake_missing(locale: Locale, order: u32) -> String {
    match locale {
        Locale::Da => format!(
            "Du svarede ja til at være vågnet i løbet af natten, men spørgsmål {order} mangler et svar"
        ),
        Locale::En => format!(
            "You answered yes to waking during the night, but question {order} is missing an answer"
        ),
    }
}

fn msg_night_wake_conflict(locale: Locale, count: i64) -> String {
    match locale {
        Locale::Da => format!(
            "Du var vågen {count} gange i løbet af natten, men har angivet 0 minutter vågen"
        ),
        Locale::En => format!(
            "You woke {count} times during the night, but entered 0 minutes awake"
        ),
    }
}

fn msg_night_wake_locked(locale: Locale) -> String {
    match locale {
        Locale::Da => {
            "Du svarede nej til at være vågnet i løbet af natten, så minuttallet skal være 0"
                .to_string()
        }
        Locale::En => {
            "You answered no to waking during the night, so the minutes awake must be 0"
                .to_string()
        }
    }
}

fn msg_invalid_number(locale: Locale) -> String {
    match locale {
        Locale::Da => "Indtast et gyldigt tal".to_string(),
        Locale::En => "Enter a valid number".to_string(),
    }
}

fn msg_invalid_time(locale: Locale) -> String {
    match locale {
        Locale::Da => "Indtast et gyldigt tidspunkt (TT:mm)".to_string(),
        Locale::En => "Enter a valid time (HH:mm)".to_string(),
    }
}

fn msg_min_value(locale: Locale, min: i64) -> String {
    match locale {
        Locale::Da => format!("Værdien skal være mindst {min}"),
        Locale::En => format!("The value must be at least {min}"),
    }
}

fn msg_max_value(locale: Locale, max: i64) -> String {
    match locale {
        Locale::Da => format!("Værdien må højst være {max}"),
        Locale::En => format!("The value must be at most {max}"),
    }
}

fn msg_negative(locale: Locale) -> String {
    match locale {
        Locale::Da => "Negative værdier er ikke tilladt".to_string(),
        Locale::En => "Negative values are not allowed".to_string(),
    }
}

fn msg_max_length(locale: Locale, max: usize) -> String {
    match locale {
        Locale::Da => format!("Teksten må højst være {max} tegn"),
        Locale::En => format!("The text must be at most {max} characters"),
    }
}

fn msg_min_time(locale: Locale, min: &str) -> String {
    match locale {
        Locale::Da => format!("Tidspunktet skal være {min} eller senere"),
        Locale::En => format!("The time must be {min} or later"),
    }
}

fn msg_max_time(locale: Locale, max: &str) -> String {
    match locale {
        Locale::Da => format!("Tidspunktet skal være {max} eller tidligere"),
        Locale::En => format!("The time must be {max} or earlier"),
    }
}
