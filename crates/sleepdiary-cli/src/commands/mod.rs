pub mod check;
pub mod inspect;
pub mod run;

use std::path::Path;

use sleepdiary_core::{AnswerStore, Locale, Question, QuestionnaireType};

use crate::config::Config;

/// Load a questionnaire file: a JSON array of questions in the wire format.
pub(crate) fn load_questions(path: &Path) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Load an answers file: a JSON object mapping question id to answer value.
pub(crate) fn load_answers(path: &Path) -> Result<AnswerStore, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Resolve questionnaire type and locale from flags, falling back to the
/// config file defaults.
pub(crate) fn resolve_session(
    questionnaire: Option<String>,
    locale: Option<String>,
) -> Result<(QuestionnaireType, Locale), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let questionnaire_type = questionnaire
        .unwrap_or(config.questionnaire)
        .parse::<QuestionnaireType>()?;
    let locale = locale.unwrap_or(config.locale).parse::<Locale>()?;
    Ok((questionnaire_type, locale))
}
