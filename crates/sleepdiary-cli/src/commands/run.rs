use std::path::Path;

use sleepdiary_core::{AdvanceOutcome, MemoryClient, WizardController, WizardState};

use super::{load_answers, load_questions, resolve_session};

/// Replay a full session against an in-memory client: visit every question
/// the wizard presents, answering from the saved answer set, then submit.
pub async fn run(
    questions: &Path,
    answers: &Path,
    questionnaire: Option<String>,
    locale: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (questionnaire_type, locale) = resolve_session(questionnaire, locale)?;
    let client = MemoryClient::new(load_questions(questions)?);
    let saved = load_answers(answers)?;

    let mut wizard = WizardController::start(client, questionnaire_type, locale).await?;
    while wizard.state() == WizardState::Active {
        let current = wizard
            .current_question()
            .cloned()
            .ok_or("session has no current question")?;
        let value = saved
            .get(&current.id)
            .cloned()
            .ok_or_else(|| format!("no saved answer for question {}", current.id))?;
        println!(
            "{:>3}. {} = {}",
            current.order,
            current.id,
            serde_json::to_string(&value)?
        );
        wizard.record_answer(value).await?;

        for child in wizard.visible_conditionals().to_vec() {
            let value = saved
                .get(&child.id)
                .cloned()
                .ok_or_else(|| format!("no saved answer for question {}", child.id))?;
            println!("     + {} = {}", child.id, serde_json::to_string(&value)?);
            wizard.record_child_answer(&child.id, value)?;
        }

        match wizard.advance().await? {
            AdvanceOutcome::Moved => {}
            AdvanceOutcome::Completed => break,
            AdvanceOutcome::Blocked => {
                let message = wizard.error().unwrap_or("advance blocked").to_string();
                return Err(message.into());
            }
        }
    }

    let progress = wizard.progress();
    println!(
        "completed: {}/{} ({}%)",
        progress.answered, progress.total, progress.percentage
    );
    let response = wizard.submit().await?;
    println!("submitted response {}", response.id);
    Ok(())
}
