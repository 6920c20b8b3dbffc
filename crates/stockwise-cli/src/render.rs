//! Terminal rendering of answers.

use console::style;
use stockwise_rag::{AnswerResponse, Source};

/// One-line summary of a source's identifying fields.
pub fn source_heading(index: usize, source: &Source) -> String {
    let fields = source
        .metadata
        .to_map()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Source {} · Metadata: {}", index + 1, fields)
}

/// Print an answer followed by its source documents.
pub fn render_answer(response: &AnswerResponse) {
    println!("{}", style("Answer").green().bold());
    println!("{}", response.answer);
    println!();

    println!("{}", style("Relevant Source Documents").bold());
    if response.sources.is_empty() {
        println!("  {}", style("(none)").dim());
        return;
    }

    for (i, source) in response.sources.iter().enumerate() {
        println!("{}", style(source_heading(i, source)).cyan());
        for line in source.content.lines() {
            println!("  {}", style(line).dim());
        }
        println!();
    }
}

/// Print a warning line to stderr.
pub fn render_warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}
