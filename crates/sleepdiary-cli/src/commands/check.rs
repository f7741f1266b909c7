use std::path::Path;

use sleepdiary_core::validate::{
    check_lights_off, check_night_wake, check_sleep_latency, check_wake_times, is_answer_complete,
};
use sleepdiary_core::{compute_progress, AnswerStore, Locale, QuestionGraph, QuestionnaireType};

use super::{load_answers, load_questions, resolve_session};

pub fn run(
    questions: &Path,
    answers: &Path,
    questionnaire: Option<String>,
    locale: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (questionnaire_type, locale) = resolve_session(questionnaire, locale)?;
    let graph = QuestionGraph::new(load_questions(questions)?);
    let answers = load_answers(answers)?;

    for root in graph.root_questions() {
        if !is_answer_complete(root, &answers, &graph, questionnaire_type) {
            println!("incomplete: {} (order {})", root.id, root.order);
        }
    }

    type Check = fn(&QuestionGraph, &AnswerStore, QuestionnaireType, Locale) -> Option<String>;
    let checks: [(&str, Check); 4] = [
        ("lights-off", check_lights_off),
        ("sleep-latency", check_sleep_latency),
        ("wake-times", check_wake_times),
        ("night-wake", check_night_wake),
    ];
    let mut violations = 0;
    for (name, check) in checks {
        if let Some(message) = check(&graph, &answers, questionnaire_type, locale) {
            println!("rule {name}: {message}");
            violations += 1;
        }
    }

    let progress = compute_progress(&graph, &answers, questionnaire_type);
    println!(
        "progress: {}/{} ({}%)",
        progress.answered, progress.total, progress.percentage
    );

    if violations > 0 {
        return Err(format!("{violations} rule violation(s)").into());
    }
    Ok(())
}
