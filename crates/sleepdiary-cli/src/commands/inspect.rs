use std::path::Path;

use sleepdiary_core::{Locale, QuestionGraph};

use super::load_questions;

pub fn run(questions: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let graph = QuestionGraph::new(load_questions(questions)?);
    let roots = graph.root_questions();

    println!("main line ({} questions):", roots.len());
    for root in &roots {
        let text = root.display_text(Locale::Da);
        if text.is_empty() {
            println!("  {:>3}. {} [{}]", root.order, root.id, root.question_type);
        } else {
            println!(
                "  {:>3}. {} [{}] {}",
                root.order, root.id, root.question_type, text
            );
        }
        for edge in &root.conditional_children {
            let known = graph.get(&edge.child_question_id).is_some();
            let marker = if known { "" } else { " (missing)" };
            println!(
                "       {} -> {}{}",
                edge.option_id, edge.child_question_id, marker
            );
        }
    }

    let conditionals: Vec<&str> = graph
        .all()
        .iter()
        .filter(|q| graph.is_conditional(&q.id))
        .map(|q| q.id.as_str())
        .collect();
    if !conditionals.is_empty() {
        println!("conditional questions: {}", conditionals.join(", "));
    }
    Ok(())
}
