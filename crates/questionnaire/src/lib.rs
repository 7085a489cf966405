//! Diagnosis Questionnaire
//!
//! Walks the user through a branching set of multiple-choice questions and
//! turns the answers into facts for the rule engine.

mod category;
mod flows;
mod prompt;

pub use category::Category;
pub use prompt::{LinePrompter, Prompter};

use fact_store::FactStore;
use thiserror::Error;
use tracing::info;

/// Errors while collecting answers
#[derive(Debug, Error)]
pub enum QuestionnaireError {
    /// Input ended before the questionnaire finished
    #[error("Input closed before the questionnaire finished")]
    InputClosed,
    /// A prompter returned an index outside the offered options
    #[error("Choice {choice} is out of range for {options} options")]
    InvalidChoice { choice: usize, options: usize },
    /// Terminal I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opening question selecting the issue category
pub const CATEGORY_QUESTION: &str = "What type of issue are you experiencing?";

/// Ask for the issue category, then walk that category's questions
pub fn run<P: Prompter + ?Sized>(prompter: &mut P) -> Result<(Category, FactStore), QuestionnaireError> {
    let labels: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
    let choice = prompt::ask(prompter, CATEGORY_QUESTION, &labels)?;
    let category = Category::ALL[choice];
    info!("Questionnaire category: {}", category.slug());

    let facts = category.ask(prompter)?;
    info!("Collected {} facts", facts.len());
    Ok((category, facts))
}
