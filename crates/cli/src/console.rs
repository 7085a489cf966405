//! Terminal rendering

use chrono::{DateTime, Local};
use history::HistoryEntry;
use rule_engine::{Payload, Rule, Severity};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 75;

fn rule_line() -> String {
    "=".repeat(RULE_WIDTH)
}

fn title<W: Write>(out: &mut W, indent: usize, text: &str) -> io::Result<()> {
    writeln!(out, "\n{}", rule_line())?;
    writeln!(out, "{}{}", " ".repeat(indent), text)?;
    writeln!(out, "{}", rule_line())
}

/// Banner shown next to a diagnosis
pub fn severity_banner(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴 CRITICAL - URGENT ACTION REQUIRED",
        Severity::High => "🟠 HIGH - Address Soon",
        Severity::Medium => "🟡 MEDIUM - Should Fix",
        Severity::Low => "🟢 LOW - Minor Issue",
    }
}

/// Welcome screen
pub fn print_header<W: Write>(out: &mut W) -> io::Result<()> {
    title(out, 15, "COMPUTER PROBLEM DIAGNOSIS EXPERT SYSTEM")?;
    writeln!(
        out,
        "\n🖥️  Welcome! This expert system will help diagnose your computer problems."
    )?;
    writeln!(out, "\n📋 System covers:")?;
    writeln!(out, "   • Hardware Issues    • Software Issues    • Network Problems")?;
    writeln!(out, "   • BSOD Errors        • Boot Problems      • Performance Issues")?;
    writeln!(out, "   • Peripheral Devices • Audio Issues       • Security Concerns")?;
    writeln!(out, "   • Storage Problems   • Windows Updates    • Display Issues")?;
    writeln!(out, "\n{}\n", rule_line())
}

/// Banner above the first question
pub fn print_questionnaire_title<W: Write>(out: &mut W) -> io::Result<()> {
    title(out, 25, "DIAGNOSIS QUESTIONNAIRE")
}

/// Closing lines after the last diagnosis
pub fn print_farewell<W: Write>(out: &mut W, history: Option<&Path>) -> io::Result<()> {
    writeln!(out, "\n👋 Thank you for using the Computer Diagnosis Expert System!")?;
    if let Some(path) = history {
        writeln!(out, "📁 Your diagnosis history is saved in {}", path.display())?;
    }
    writeln!(out, "\n{}\n", rule_line())
}

/// Diagnosis result with its remediation steps
pub fn print_diagnosis<W: Write>(out: &mut W, payload: &Payload) -> io::Result<()> {
    title(out, 25, "DIAGNOSIS RESULT")?;
    writeln!(out, "\n⚠️  Severity: {}", severity_banner(payload.severity))?;
    writeln!(out, "\n🔍 Diagnosis:\n   {}", payload.diagnosis)?;
    writeln!(out, "\n💡 Recommended Solution:")?;
    for step in payload.steps() {
        writeln!(out, "   {}", step)?;
    }
    writeln!(out, "\n{}", rule_line())
}

fn short_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// One line per history entry, newest first
pub fn print_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No diagnoses recorded yet.");
    }
    for entry in entries {
        writeln!(
            out,
            "{}  {:<8}  {}",
            short_timestamp(&entry.timestamp),
            entry.severity,
            entry.diagnosis
        )?;
    }
    Ok(())
}

/// Rule listing: id, condition count, severity, conditions
pub fn print_rules<W: Write>(out: &mut W, rules: &[Rule], fallback: &Payload) -> io::Result<()> {
    for rule in rules {
        let conditions: Vec<String> = rule.when.iter().map(ToString::to_string).collect();
        writeln!(
            out,
            "{:<28} {:>2}  {:<8}  {}",
            rule.id,
            rule.specificity(),
            rule.payload.severity,
            conditions.join(", ")
        )?;
    }
    writeln!(
        out,
        "{:<28} {:>2}  {:<8}  {}",
        "(fallback)", 0, fallback.severity, fallback.diagnosis
    )
}
