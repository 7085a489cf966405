//! Resolution scenarios against the built-in table

use crate::builtin;
use proptest::prelude::*;
use rule_engine::{FactStore, RuleTable, Severity};

fn table() -> RuleTable {
    builtin().unwrap()
}

fn facts(pairs: &[(&str, &str)]) -> FactStore {
    pairs.iter().copied().collect()
}

#[test]
fn test_psu_failure() {
    let f = facts(&[
        ("power_status", "not_turning_on"),
        ("power_cable", "connected"),
        ("outlet_working", "yes"),
        ("lights", "none"),
    ]);
    let payload = table().resolve(&f).clone();

    assert_eq!(payload.diagnosis, "Power Supply Unit (PSU) Failure");
    assert_eq!(payload.severity, Severity::High);
}

#[test]
fn test_memory_management_bsod() {
    let f = facts(&[("issue_category", "bsod"), ("error_code", "MEMORY_MANAGEMENT")]);
    let payload = table().resolve(&f).clone();

    assert_eq!(payload.diagnosis, "Memory Management Error");
    assert_eq!(payload.severity, Severity::High);
}

#[test]
fn test_empty_facts_fall_back() {
    let table = table();
    let resolution = table.resolve_detailed(&FactStore::new());

    assert!(resolution.is_fallback());
    assert_eq!(resolution.payload.severity, Severity::Low);
}

#[test]
fn test_malware_disjunction() {
    let table = table();
    for sign in ["popup_ads", "slow_performance", "unknown_programs", "browser_redirects"] {
        let f = facts(&[
            ("issue_category", "security"),
            ("symptom", "malware_suspected"),
            ("signs", sign),
        ]);
        let payload = table.resolve(&f);
        assert_eq!(payload.diagnosis, "Possible Malware Infection", "sign {}", sign);
        assert_eq!(payload.severity, Severity::Critical);
    }

    // "Suspected malware/virus" alone declares no sign, so the group fails
    let bare = facts(&[("issue_category", "security"), ("symptom", "malware_suspected")]);
    assert!(table.resolve_detailed(&bare).is_fallback());
}

#[test]
fn test_performance_tie_prefers_first_declared() {
    let f = facts(&[
        ("issue_category", "performance"),
        ("symptom", "very_slow"),
        ("disk_type", "hdd"),
        ("disk_health", "poor"),
        ("cpu_usage", "high"),
        ("process", "unknown"),
        ("ram_usage", "high"),
        ("available_ram", "low"),
    ]);
    let table = table();

    assert_eq!(table.matching(&f).count(), 3);
    let resolution = table.resolve_detailed(&f);
    assert_eq!(resolution.rule_id, Some("failing_hdd"));
    assert_eq!(resolution.payload.severity, Severity::Critical);
}

#[test]
fn test_beep_code_during_boot() {
    let f = facts(&[
        ("power_status", "turning_on"),
        ("boot_stage", "bios_shows"),
        ("beep_code", "continuous"),
    ]);
    let resolution = table().resolve_detailed(&f).rule_id.map(str::to_string);
    assert_eq!(resolution.as_deref(), Some("ram_beep"));
}

#[test]
fn test_network_branches() {
    let table = table();

    let pc_only = facts(&[
        ("issue_category", "network"),
        ("symptom", "no_internet"),
        ("other_devices", "working"),
    ]);
    assert_eq!(table.resolve(&pc_only).diagnosis, "Network Adapter or Driver Issue");

    let dns = facts(&[
        ("issue_category", "network"),
        ("dns_working", "no"),
        ("can_ping_ip", "yes"),
    ]);
    assert_eq!(table.resolve(&dns).diagnosis, "DNS Resolution Problem");
}

#[test]
fn test_stale_category_value_misses() {
    // Overwriting the category moves the session off the BSOD rules
    let mut f = facts(&[("issue_category", "bsod"), ("error_code", "MEMORY_MANAGEMENT")]);
    f.declare("issue_category", "storage");

    assert!(table().resolve_detailed(&f).is_fallback());
}

proptest! {
    #[test]
    fn prop_every_fact_set_gets_a_payload(
        pairs in proptest::collection::vec(("[a-z_]{1,16}", "[a-z_]{1,16}"), 0..12),
    ) {
        let table = table();
        let f: FactStore = pairs.into_iter().collect();
        let resolution = table.resolve_detailed(&f);

        prop_assert!(!resolution.payload.diagnosis.is_empty());
        prop_assert_eq!(resolution.is_fallback(), table.matching(&f).next().is_none());
    }

    #[test]
    fn prop_rule_conditions_select_that_rule_or_better(index in 0usize..42) {
        let table = table();
        let rule = &table.rules()[index];

        // Satisfy the rule using the first alternative of any group
        let mut f = FactStore::new();
        for condition in &rule.when {
            match condition {
                rule_engine::Condition::Match(m) => f.declare(m.key.clone(), m.value.clone()),
                rule_engine::Condition::AnyOf { alternatives } => {
                    f.declare(alternatives[0].key.clone(), alternatives[0].value.clone())
                }
            }
        }

        let resolution = table.resolve_detailed(&f);
        prop_assert!(!resolution.is_fallback());
        prop_assert!(resolution.specificity >= rule.specificity());
    }
}
