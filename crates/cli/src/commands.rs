//! CLI command implementations

use anyhow::Context;
use chrono::Local;
use fact_store::FactStore;
use history::{HistoryEntry, HistoryLog};
use questionnaire::{LinePrompter, QuestionnaireError};
use rule_engine::{DiagnosisSession, Payload, RuleTable};
use serde_json::json;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

use crate::console;

/// Read one trimmed line; `None` at end of input
fn read_answer<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run diagnosis sessions over `input`/`output` until the user stops.
///
/// Each round asks the questionnaire, prints and records the diagnosis, then
/// offers another round. Returns the diagnoses made; end of input cancels the
/// round in progress.
pub fn interactive<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    rules: Arc<RuleTable>,
    history: Option<&HistoryLog>,
) -> anyhow::Result<Vec<Payload>> {
    let mut session = DiagnosisSession::new(rules);
    let mut diagnoses = Vec::new();

    loop {
        console::print_header(&mut output)?;
        write!(output, "Press Enter to start diagnosis...")?;
        output.flush()?;
        if read_answer(&mut input)?.is_none() {
            writeln!(output, "\n\n👋 Diagnosis cancelled. Goodbye!")?;
            return Ok(diagnoses);
        }
        console::print_questionnaire_title(&mut output)?;

        let started = Local::now();
        let answers = questionnaire::run(&mut LinePrompter::new(&mut input, &mut output));
        let (category, facts) = match answers {
            Ok(answers) => answers,
            Err(QuestionnaireError::InputClosed) => {
                writeln!(output, "\n\n👋 Diagnosis cancelled. Goodbye!")?;
                return Ok(diagnoses);
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Answers for {}: {} facts", category.slug(), facts.len());

        session.clear();
        for fact in &facts {
            session.declare(fact.key.as_str(), fact.value.as_str())?;
        }
        let payload = session.resolve().clone();
        info!(
            "Resolved to '{}' via {}",
            payload.diagnosis,
            session.resolved_rule().unwrap_or("fallback")
        );
        console::print_diagnosis(&mut output, &payload)?;

        if let Some(log) = history {
            let entry = HistoryEntry::new(started, &payload, session.facts());
            if log.record(&entry) {
                writeln!(
                    output,
                    "\n✅ Diagnosis saved to history ({})",
                    log.path().display()
                )?;
            }
        }
        diagnoses.push(payload);

        writeln!(output, "\n{}", "=".repeat(75))?;
        write!(output, "\n🔄 Would you like to diagnose another problem? (y/n): ")?;
        output.flush()?;
        let again = read_answer(&mut input)?.map_or(false, |a| a.eq_ignore_ascii_case("y"));
        if !again {
            console::print_farewell(&mut output, history.map(HistoryLog::path))?;
            return Ok(diagnoses);
        }
    }
}

/// Resolve the given facts and print the outcome as JSON
pub fn resolve<W: Write>(
    output: &mut W,
    rules: &RuleTable,
    facts: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let facts: FactStore = facts.into_iter().collect();
    let resolution = rules.resolve_detailed(&facts);

    let body = json!({
        "rule": resolution.rule_id,
        "specificity": resolution.specificity,
        "diagnosis": resolution.payload.diagnosis,
        "solution": resolution.payload.solution,
        "severity": resolution.payload.severity,
    });
    writeln!(output, "{}", serde_json::to_string_pretty(&body)?)?;
    Ok(())
}

/// Print the most recent history entries
pub fn show_history<W: Write>(output: &mut W, log: &HistoryLog, limit: usize) -> anyhow::Result<()> {
    let entries = log
        .recent(None, limit)
        .with_context(|| format!("failed to read {}", log.path().display()))?;
    console::print_history(output, &entries)?;
    Ok(())
}

/// List the loaded rule table
pub fn list_rules<W: Write>(output: &mut W, rules: &RuleTable) -> anyhow::Result<()> {
    console::print_rules(output, rules.rules(), rules.fallback())?;
    Ok(())
}
