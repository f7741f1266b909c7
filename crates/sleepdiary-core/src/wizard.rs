//! The wizard session controller.
//!
//! One [`WizardController`] owns one questionnaire session end to end:
//! loading the question list, recording answers, revealing conditional
//! follow-ups, navigating, and submitting. Pure logic lives in
//! [`crate::graph`], [`crate::navigate`], [`crate::progress`] and
//! [`crate::validate`]; the controller sequences those pieces and talks to
//! the [`QuestionnaireClient`] collaborator.
//!
//! Session rules never block typing. They are consulted when recording a
//! time answer (to surface the message early), on advance, and on submit.
//! A rule failure on advance/submit is not an `Err`: the session stays
//! usable, the message lands in [`WizardController::error`], and advance
//! reports [`AdvanceOutcome::Blocked`].

use chrono::{DateTime, Utc};

use crate::answer::{AnswerStore, AnswerValue};
use crate::client::{NextQuestionRequest, QuestionnaireClient, ResponseRequest, SubmittedResponse};
use crate::error::{ClientError, WizardError};
use crate::graph::QuestionGraph;
use crate::navigate;
use crate::progress::{compute_progress, Progress};
use crate::question::{Locale, Question, QuestionType, QuestionnaireType};
use crate::validate::{
    check_lights_off, check_night_wake, check_sleep_latency, check_wake_times, is_answer_complete,
    msg_must_answer_all, parse_time, ORDER_LIGHTS_OFF, ORDER_NIGHT_WAKE, ORDER_OUT_OF_BED,
    ORDER_WAKE_MINUTES, ORDER_WENT_TO_BED, ORDER_WOKE_UP, WAKE_NO,
};

/// Lifecycle of a wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Questions are being fetched.
    Loading,
    /// Questions loaded; the user is answering.
    Active,
    /// Every question answered; awaiting review and submit.
    Reviewing,
    /// The response has been accepted by the server.
    Submitted,
}

/// What happened on an advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next question.
    Moved,
    /// No next question; the session entered review.
    Completed,
    /// A rule or unanswered conditional blocked the move. The message is in
    /// [`WizardController::error`] and the current question is unchanged.
    Blocked,
}

/// Source -> dependent default pairs among the morning time questions: the
/// dependent inherits the source's value until the user edits it.
const DEFAULT_PAIRS: [(u32, u32); 2] = [
    (ORDER_WENT_TO_BED, ORDER_LIGHTS_OFF),
    (ORDER_WOKE_UP, ORDER_OUT_OF_BED),
];

/// Controller for one questionnaire session.
pub struct WizardController<C: QuestionnaireClient> {
    client: C,
    state: WizardState,
    questionnaire_type: QuestionnaireType,
    questionnaire_id: String,
    locale: Locale,
    session_id: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    graph: QuestionGraph,
    answers: AnswerStore,
    current: Option<Question>,
    conditionals: Vec<Question>,
    history: Vec<String>,
    error: Option<String>,
}

impl<C: QuestionnaireClient> WizardController<C> {
    /// Load the questionnaire and position the session on its first main
    /// question.
    pub async fn start(
        client: C,
        questionnaire_type: QuestionnaireType,
        locale: Locale,
    ) -> Result<Self, WizardError> {
        let questions = client
            .fetch_questions(questionnaire_type.as_str(), locale, false)
            .await
            .map_err(WizardError::Client)?;
        if questions.is_empty() {
            return Err(WizardError::NoQuestions);
        }
        let questionnaire_id = questions
            .iter()
            .map(|q| q.questionnaire_id.clone())
            .find(|id| !id.is_empty())
            .unwrap_or_else(|| questionnaire_type.as_str().to_string());
        let graph = QuestionGraph::new(questions);
        let first = graph
            .root_questions()
            .first()
            .map(|q| (*q).clone())
            .ok_or(WizardError::NoQuestions)?;
        Ok(Self {
            client,
            state: WizardState::Active,
            questionnaire_type,
            questionnaire_id,
            locale,
            session_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            completed_at: None,
            graph,
            answers: AnswerStore::new(),
            history: vec![first.id.clone()],
            current: Some(first),
            conditionals: Vec::new(),
            error: None,
        })
    }

    /// Re-enter a session from previously saved answers, e.g. returning
    /// from a review step to edit one answer. Positions on
    /// `edit_question_id` when given and known, otherwise on the first main
    /// question; a failed fetch of the edit target also falls back to the
    /// first question.
    pub async fn resume(
        client: C,
        questionnaire_type: QuestionnaireType,
        locale: Locale,
        answers: AnswerStore,
        edit_question_id: Option<&str>,
    ) -> Result<Self, WizardError> {
        let mut wizard = Self::start(client, questionnaire_type, locale).await?;
        wizard.answers = answers;
        let target = match edit_question_id {
            Some(id) if wizard.graph.get(id).is_some() => {
                wizard.client.fetch_question(id, locale).await.ok()
            }
            _ => None,
        };
        if let Some(target) = target {
            wizard.push_history(&target.id);
            wizard.current = Some(target);
        }
        if let Some(current) = wizard.current.clone() {
            let stored = wizard.answers.get(&current.id).cloned();
            wizard.refresh_conditionals(&current, stored.as_ref()).await;
        }
        Ok(wizard)
    }

    /// Record an answer to the current question. Applies default propagation
    /// to the paired morning time questions, refreshes visible conditionals,
    /// and re-runs the time-ordering rules so their message shows up
    /// immediately rather than only on advance.
    pub async fn record_answer(&mut self, value: AnswerValue) -> Result<(), WizardError> {
        if self.state != WizardState::Active {
            return Err(WizardError::NotActive);
        }
        let current = self.current.clone().ok_or(WizardError::NotActive)?;

        self.propagate_default(&current, &value);
        self.answers.set(current.id.clone(), value.clone());
        self.error = None;
        self.recheck_time_rules(current.order);
        self.refresh_conditionals(&current, Some(&value)).await;
        Ok(())
    }

    /// Record an answer to one of the currently visible conditional
    /// children.
    pub fn record_child_answer(
        &mut self,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), WizardError> {
        if self.state != WizardState::Active {
            return Err(WizardError::NotActive);
        }
        if !self.conditionals.iter().any(|q| q.id == question_id) {
            return Err(WizardError::UnknownQuestion(question_id.to_string()));
        }
        self.answers.set(question_id.to_string(), value);
        self.error = None;
        Ok(())
    }

    /// Try to move past the current question. The server decides what comes
    /// next; `None` from it completes the session.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        if self.state != WizardState::Active {
            return Err(WizardError::NotActive);
        }
        let current = self.current.clone().ok_or(WizardError::NotActive)?;

        let unanswered_child = self
            .conditionals
            .iter()
            .any(|q| !is_answer_complete(q, &self.answers, &self.graph, self.questionnaire_type));
        if unanswered_child {
            self.error = Some(msg_must_answer_all(self.locale));
            return Ok(AdvanceOutcome::Blocked);
        }

        for check in [check_lights_off, check_sleep_latency, check_wake_times] {
            if let Some(message) = check(
                &self.graph,
                &self.answers,
                self.questionnaire_type,
                self.locale,
            ) {
                self.error = Some(message);
                return Ok(AdvanceOutcome::Blocked);
            }
        }

        let mut outgoing = self.answers.clone();
        self.force_wake_minutes(&current, &mut outgoing);

        let request = NextQuestionRequest {
            questionnaire_id: self.questionnaire_id.clone(),
            current_question_id: current.id.clone(),
            current_answers: outgoing.clone(),
        };
        match self.client.fetch_next_question(&request, self.locale).await {
            Ok(Some(next)) => {
                self.answers = outgoing;
                self.error = None;
                self.push_history(&next.id);
                let stored = self.answers.get(&next.id).cloned();
                self.refresh_conditionals(&next, stored.as_ref()).await;
                self.current = Some(next);
                Ok(AdvanceOutcome::Moved)
            }
            Ok(None) => {
                self.answers = outgoing;
                self.error = None;
                self.conditionals.clear();
                self.completed_at = Some(Utc::now());
                self.state = WizardState::Reviewing;
                Ok(AdvanceOutcome::Completed)
            }
            Err(ClientError::Server { message, .. }) => {
                self.error = Some(message);
                Ok(AdvanceOutcome::Blocked)
            }
            Err(err) => Err(WizardError::Client(err)),
        }
    }

    /// Move to the main question before the current position. `Ok(false)`
    /// when already on the first question.
    pub async fn go_back(&mut self) -> Result<bool, WizardError> {
        let current_id = match &self.current {
            Some(q) => q.id.clone(),
            None => return Err(WizardError::NotActive),
        };
        let Some(previous) = navigate::previous_main_question(&self.graph, &current_id) else {
            return Ok(false);
        };
        let target = previous.id.clone();
        self.jump_to(&target).await?;
        Ok(true)
    }

    /// Jump directly to a question. Only answered, already-visited, or
    /// backward targets are allowed. Jumping from the review step reopens
    /// the session for editing.
    pub async fn jump_to(&mut self, question_id: &str) -> Result<(), WizardError> {
        if !matches!(self.state, WizardState::Active | WizardState::Reviewing) {
            return Err(WizardError::NotActive);
        }
        let current = self.current.clone().ok_or(WizardError::NotActive)?;
        if current.id == question_id {
            self.state = WizardState::Active;
            return Ok(());
        }
        if self.graph.get(question_id).is_none() {
            return Err(WizardError::UnknownQuestion(question_id.to_string()));
        }
        if !navigate::can_jump_to(
            &self.graph,
            &self.answers,
            &self.history,
            &current.id,
            question_id,
            self.questionnaire_type,
        ) {
            return Err(WizardError::JumpRefused(question_id.to_string()));
        }

        let target = self
            .client
            .fetch_question(question_id, self.locale)
            .await
            .map_err(WizardError::Client)?;

        self.apply_wake_minutes_arrival(&target);
        self.push_history(&target.id);
        let stored = self.answers.get(&target.id).cloned();
        self.refresh_conditionals(&target, stored.as_ref()).await;
        self.error = None;
        self.recheck_time_rules(target.order);
        self.current = Some(target);
        self.state = WizardState::Active;
        Ok(())
    }

    /// Validate the full answer set and submit it. On a rule failure the
    /// message is stored and returned as [`WizardError::Validation`]; a
    /// server rejection comes back verbatim as [`WizardError::Submission`].
    pub async fn submit(&mut self) -> Result<SubmittedResponse, WizardError> {
        if !matches!(self.state, WizardState::Active | WizardState::Reviewing) {
            return Err(WizardError::NotActive);
        }
        for check in [
            check_lights_off,
            check_sleep_latency,
            check_wake_times,
            check_night_wake,
        ] {
            if let Some(message) = check(
                &self.graph,
                &self.answers,
                self.questionnaire_type,
                self.locale,
            ) {
                self.error = Some(message.clone());
                return Err(WizardError::Validation(message));
            }
        }
        let request = ResponseRequest {
            questionnaire_id: self.questionnaire_id.clone(),
            answers: self.answers.clone(),
        };
        match self.client.submit_response(&request).await {
            Ok(response) => {
                self.error = None;
                if self.completed_at.is_none() {
                    self.completed_at = Some(Utc::now());
                }
                self.state = WizardState::Submitted;
                Ok(response)
            }
            Err(ClientError::Server { message, .. }) => {
                self.error = Some(message.clone());
                Err(WizardError::Submission(message))
            }
            Err(err) => Err(WizardError::Client(err)),
        }
    }

    /// Switch the display language mid-session. Answers and position are
    /// kept; question texts are reloaded. Reload failures keep the previous
    /// texts rather than disturbing the session.
    pub async fn set_locale(&mut self, locale: Locale) {
        if locale == self.locale {
            return;
        }
        self.locale = locale;
        if let Ok(questions) = self
            .client
            .fetch_questions(self.questionnaire_type.as_str(), locale, false)
            .await
        {
            if !questions.is_empty() {
                self.graph = QuestionGraph::new(questions);
            }
        }
        if let Some(current) = &self.current {
            if let Ok(reloaded) = self.client.fetch_question(&current.id, locale).await {
                self.current = Some(reloaded);
            }
        }
        if let Some(current) = self.current.clone() {
            let stored = self.answers.get(&current.id).cloned();
            self.refresh_conditionals(&current, stored.as_ref()).await;
        }
    }

    // --- derived views ---

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// The stored answer to the current question, if any.
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        let current = self.current.as_ref()?;
        self.answers.get(&current.id)
    }

    /// Conditional children currently revealed under the current question.
    pub fn visible_conditionals(&self) -> &[Question] {
        &self.conditionals
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The pending rule or server message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> Progress {
        compute_progress(&self.graph, &self.answers, self.questionnaire_type)
    }

    pub fn can_go_back(&self) -> bool {
        self.current
            .as_ref()
            .and_then(|q| navigate::previous_main_question(&self.graph, &q.id))
            .is_some()
    }

    pub fn is_last_question(&self) -> bool {
        self.current.as_ref().is_some_and(|q| {
            navigate::is_last_question(&self.graph, &self.answers, &q.id, &self.conditionals)
        })
    }

    /// Effective lower time bound for a time question: the paired source
    /// answer when it parses, otherwise the question's authored `min_time`.
    pub fn effective_min_time(&self, question: &Question) -> Option<String> {
        if self.questionnaire_type == QuestionnaireType::Morning
            && question.question_type == QuestionType::TimePicker
        {
            let source_order = DEFAULT_PAIRS
                .iter()
                .find(|(_, dependent)| *dependent == question.order)
                .map(|(source, _)| *source);
            if let Some(order) = source_order {
                if let Some(source) = self.graph.find_by_order(order, QuestionType::TimePicker) {
                    let paired = self
                        .answers
                        .get(&source.id)
                        .and_then(AnswerValue::display_string)
                        .filter(|text| parse_time(text).is_some());
                    if paired.is_some() {
                        return paired;
                    }
                }
            }
        }
        question.min_time.clone()
    }

    /// Whether the question's value is locked by the night-wake gate (the
    /// minutes-awake numeric after a "no").
    pub fn is_value_locked(&self, question: &Question) -> bool {
        self.questionnaire_type == QuestionnaireType::Morning
            && question.order == ORDER_WAKE_MINUTES
            && question.question_type == QuestionType::Numeric
            && self.gate_is_no()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn questionnaire_type(&self) -> QuestionnaireType {
        self.questionnaire_type
    }

    pub fn questionnaire_id(&self) -> &str {
        &self.questionnaire_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    // --- internals ---

    /// Copy the value being recorded into its dependent time question, but
    /// only while the dependent is unset or still carries the previously
    /// propagated value. A manual edit of the dependent ends propagation.
    fn propagate_default(&mut self, current: &Question, value: &AnswerValue) {
        if self.questionnaire_type != QuestionnaireType::Morning
            || current.question_type != QuestionType::TimePicker
        {
            return;
        }
        let Some((_, dependent_order)) = DEFAULT_PAIRS
            .iter()
            .find(|(source, _)| *source == current.order)
        else {
            return;
        };
        let Some(dependent) = self
            .graph
            .find_by_order(*dependent_order, QuestionType::TimePicker)
        else {
            return;
        };
        let previous_source = self
            .answers
            .get(&current.id)
            .and_then(AnswerValue::display_string);
        let dependent_value = self.answers.get(&dependent.id);
        let follows = match dependent_value {
            None => true,
            Some(v) if v.is_empty() => true,
            Some(v) => match (v.display_string(), previous_source) {
                (Some(dep), Some(prev)) => dep == prev,
                _ => false,
            },
        };
        if follows {
            self.answers.set(dependent.id.clone(), value.clone());
        }
    }

    /// After a "no" on the night-wake gate the minutes-awake numeric is
    /// forced to zero in the answer set handed to the server.
    fn force_wake_minutes(&self, current: &Question, outgoing: &mut AnswerStore) {
        if self.questionnaire_type != QuestionnaireType::Morning
            || current.order != ORDER_NIGHT_WAKE
            || current.question_type != QuestionType::MultipleChoice
        {
            return;
        }
        let is_no = self
            .answers
            .get(&current.id)
            .and_then(AnswerValue::option_id)
            .is_some_and(|id| id == WAKE_NO);
        if !is_no {
            return;
        }
        if let Some(minutes) = self
            .graph
            .find_by_order(ORDER_WAKE_MINUTES, QuestionType::Numeric)
        {
            outgoing.set(minutes.id.clone(), 0);
        }
    }

    /// On arrival at the minutes-awake numeric: force zero while the gate
    /// says "no", and drop a leftover forced zero once an answered gate no
    /// longer does. An unanswered gate leaves the stored value alone.
    fn apply_wake_minutes_arrival(&mut self, target: &Question) {
        if self.questionnaire_type != QuestionnaireType::Morning
            || target.order != ORDER_WAKE_MINUTES
            || target.question_type != QuestionType::Numeric
        {
            return;
        }
        let Some(gate) = self
            .graph
            .find_by_order(ORDER_NIGHT_WAKE, QuestionType::MultipleChoice)
        else {
            return;
        };
        let Some(gate_answer) = self.answers.get(&gate.id) else {
            return;
        };
        if gate_answer.option_id().is_some_and(|id| id == WAKE_NO) {
            self.answers.set(target.id.clone(), 0);
        } else if self.answers.get(&target.id) == Some(&AnswerValue::Number(0)) {
            self.answers.remove(&target.id);
        }
    }

    /// History is a visited set in arrival order; revisits do not append.
    fn push_history(&mut self, question_id: &str) {
        if !self.history.iter().any(|h| h == question_id) {
            self.history.push(question_id.to_string());
        }
    }

    fn gate_is_no(&self) -> bool {
        self.graph
            .find_by_order(ORDER_NIGHT_WAKE, QuestionType::MultipleChoice)
            .and_then(|gate| self.answers.get(&gate.id))
            .and_then(AnswerValue::option_id)
            .is_some_and(|id| id == WAKE_NO)
    }

    /// Re-run the time-ordering rule touching the given order position so
    /// its message appears as soon as the offending answer is recorded.
    fn recheck_time_rules(&mut self, order: u32) {
        let message = if order == ORDER_WENT_TO_BED || order == ORDER_LIGHTS_OFF {
            check_lights_off(
                &self.graph,
                &self.answers,
                self.questionnaire_type,
                self.locale,
            )
        } else if order == ORDER_WOKE_UP || order == ORDER_OUT_OF_BED {
            check_wake_times(
                &self.graph,
                &self.answers,
                self.questionnaire_type,
                self.locale,
            )
        } else {
            None
        };
        if message.is_some() {
            self.error = message;
        }
    }

    /// Rebuild the visible conditional list for `parent` given its answer.
    /// Children are fetched localized; a fetch failure falls back to the
    /// graph's own copy of the child.
    async fn refresh_conditionals(&mut self, parent: &Question, answer: Option<&AnswerValue>) {
        self.conditionals.clear();
        let Some(answer) = answer else {
            return;
        };
        let children: Vec<Question> = self
            .graph
            .children_for(&parent.id, answer)
            .into_iter()
            .cloned()
            .collect();
        for child in children {
            match self.client.fetch_question(&child.id, self.locale).await {
                Ok(fetched) => self.conditionals.push(fetched),
                Err(_) => self.conditionals.push(child),
            }
        }
    }
}
