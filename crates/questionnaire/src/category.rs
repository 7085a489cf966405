//! Issue Categories

use crate::flows;
use crate::prompt::Prompter;
use crate::QuestionnaireError;
use fact_store::FactStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level issue category chosen at the start of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PowerBoot,
    Performance,
    Bsod,
    Network,
    Application,
    Peripheral,
    Audio,
    Security,
    Storage,
    WindowsUpdate,
    Display,
}

impl Category {
    /// All categories in menu order
    pub const ALL: [Category; 11] = [
        Category::PowerBoot,
        Category::Performance,
        Category::Bsod,
        Category::Network,
        Category::Application,
        Category::Peripheral,
        Category::Audio,
        Category::Security,
        Category::Storage,
        Category::WindowsUpdate,
        Category::Display,
    ];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Category::PowerBoot => "Power/Boot Problems",
            Category::Performance => "Performance Issues (Slow/Freezing)",
            Category::Bsod => "Blue Screen of Death (BSOD)",
            Category::Network => "Network/Internet Problems",
            Category::Application => "Application Issues",
            Category::Peripheral => "Peripheral Devices (Printer/USB/Keyboard/Mouse)",
            Category::Audio => "Audio/Sound Problems",
            Category::Security => "Security Concerns (Malware/Virus)",
            Category::Storage => "Storage/Disk Problems",
            Category::WindowsUpdate => "Windows Update Issues",
            Category::Display => "Display Problems",
        }
    }

    /// Machine name
    pub fn slug(&self) -> &'static str {
        match self {
            Category::PowerBoot => "power_boot",
            Category::Performance => "performance",
            Category::Bsod => "bsod",
            Category::Network => "network",
            Category::Application => "application",
            Category::Peripheral => "peripheral",
            Category::Audio => "audio",
            Category::Security => "security",
            Category::Storage => "storage",
            Category::WindowsUpdate => "windows_update",
            Category::Display => "display",
        }
    }

    /// Look up a category by slug
    pub fn from_slug(slug: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.slug() == slug)
    }

    /// Value of the `issue_category` fact this category declares.
    ///
    /// Power/boot questions identify themselves through `power_status`
    /// instead, so they declare no category fact.
    pub fn issue_category(&self) -> Option<&'static str> {
        match self {
            Category::PowerBoot => None,
            other => Some(other.slug()),
        }
    }

    /// Walk this category's questions and collect facts
    pub fn ask<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<FactStore, QuestionnaireError> {
        let mut facts = FactStore::new();
        if let Some(value) = self.issue_category() {
            facts.declare("issue_category", value);
        }

        match self {
            Category::PowerBoot => flows::power_boot(prompter, &mut facts)?,
            Category::Performance => flows::performance(prompter, &mut facts)?,
            Category::Bsod => flows::bsod(prompter, &mut facts)?,
            Category::Network => flows::network(prompter, &mut facts)?,
            Category::Application => flows::application(prompter, &mut facts)?,
            Category::Peripheral => flows::peripheral(prompter, &mut facts)?,
            Category::Audio => flows::audio(prompter, &mut facts)?,
            Category::Security => flows::security(prompter, &mut facts)?,
            Category::Storage => flows::storage(prompter, &mut facts)?,
            Category::WindowsUpdate => flows::windows_update(prompter, &mut facts)?,
            Category::Display => flows::display(prompter, &mut facts)?,
        }

        Ok(facts)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
