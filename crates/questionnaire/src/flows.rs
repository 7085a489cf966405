//! Per-Category Question Trees
//!
//! Each function asks its category's questions in order and declares the
//! facts the rule table expects. Branches that the rule table cannot use
//! simply declare nothing further.

use crate::prompt::{ask, Prompter};
use crate::QuestionnaireError;
use fact_store::FactStore;

type Flow = Result<(), QuestionnaireError>;

const YES_NO: &[&str] = &["Yes", "No"];

pub(crate) fn power_boot<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let status = ask(
        p,
        "What is the power status?",
        &[
            "Computer won't turn on at all",
            "Computer turns on but won't boot",
            "Computer shows BIOS then stops",
        ],
    )?;

    match status {
        0 => {
            facts.declare("power_status", "not_turning_on");

            let cable = ask(p, "Is the power cable connected properly?", YES_NO)?;
            facts.declare("power_cable", if cable == 0 { "connected" } else { "disconnected" });
            if cable != 0 {
                return Ok(());
            }

            let outlet = ask(p, "Is the power outlet working? (Test with another device)", YES_NO)?;
            facts.declare("outlet_working", if outlet == 0 { "yes" } else { "no" });
            if outlet != 0 {
                return Ok(());
            }

            let lights = ask(
                p,
                "When you press the power button, do any lights turn on?",
                &["No lights at all", "Lights turn on", "Fans spin but no display"],
            )?;
            match lights {
                0 => facts.declare("lights", "none"),
                1 => {
                    facts.declare("lights", "on");
                    facts.declare("display", "no_signal");
                }
                _ => {}
            }
        }
        1 => {
            facts.declare("power_status", "turning_on");

            let boot = ask(
                p,
                "What stage does it reach?",
                &["No BIOS screen", "BIOS shows then stops", "Searching for boot device"],
            )?;
            match boot {
                0 => facts.declare("boot_stage", "no_bios"),
                1 => {
                    facts.declare("boot_stage", "bios_shows");
                    let beep = ask(
                        p,
                        "Do you hear any beep codes?",
                        &["No beeps", "1 long, 2 short beeps", "Continuous beeping"],
                    )?;
                    match beep {
                        1 => facts.declare("beep_code", "1_long_2_short"),
                        2 => facts.declare("beep_code", "continuous"),
                        _ => {}
                    }
                }
                _ => {
                    facts.declare("boot_stage", "bios_shows");
                    facts.declare("boot_device", "not_found");
                }
            }
        }
        // "Shows BIOS then stops" has no follow-up questions
        _ => {}
    }

    Ok(())
}

pub(crate) fn performance<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What performance issue are you experiencing?",
        &[
            "Very slow performance",
            "Computer freezing/hanging",
            "Random shutdowns",
            "Overheating",
        ],
    )?;

    match symptom {
        0 => {
            facts.declare("symptom", "very_slow");

            let disk = ask(
                p,
                "What type of drive do you have?",
                &["HDD (Hard Disk)", "SSD (Solid State)", "Don't know"],
            )?;
            if disk == 0 {
                facts.declare("disk_type", "hdd");
                let health = ask(
                    p,
                    "Have you checked disk health? Any warnings?",
                    &["Yes, shows warnings", "No warnings", "Haven't checked"],
                )?;
                if health == 0 {
                    facts.declare("disk_health", "poor");
                }
            }

            let cpu = ask(p, "Check Task Manager - Is CPU usage constantly high (>80%)?", YES_NO)?;
            if cpu == 0 {
                facts.declare("cpu_usage", "high");
                let process = ask(
                    p,
                    "Can you identify which program is using CPU?",
                    &["Yes, I know the program", "No, unknown process", "Multiple processes"],
                )?;
                if process == 1 {
                    facts.declare("process", "unknown");
                }
            }

            let ram = ask(
                p,
                "Check Task Manager - Memory (RAM) usage high?",
                &["Yes, >80%", "No, <50%"],
            )?;
            if ram == 0 {
                facts.declare("ram_usage", "high");
                let available = ask(
                    p,
                    "How much RAM do you have?",
                    &["4GB or less", "8GB", "16GB or more"],
                )?;
                if available < 2 {
                    facts.declare("available_ram", "low");
                }
            }
        }
        3 => facts.declare("temperature", "very_high"),
        _ => {}
    }

    Ok(())
}

/// Stop codes with a dedicated question option; the last option is "Other/Don't know"
const BSOD_CODES: &[&str] = &[
    "DRIVER_IRQL_NOT_LESS_OR_EQUAL",
    "MEMORY_MANAGEMENT",
    "KERNEL_DATA_INPAGE_ERROR",
    "SYSTEM_SERVICE_EXCEPTION",
    "PAGE_FAULT_IN_NONPAGED_AREA",
    "Other/Don't know",
];

pub(crate) fn bsod<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let error = ask(p, "What error code does the blue screen show?", BSOD_CODES)?;
    if error < BSOD_CODES.len() - 1 {
        facts.declare("error_code", BSOD_CODES[error]);
    }
    Ok(())
}

pub(crate) fn network<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the network problem?",
        &[
            "No internet connection",
            "Very slow internet",
            "Can't connect to WiFi",
            "Intermittent connection (keeps dropping)",
            "Connected but no access",
        ],
    )?;

    match symptom {
        0 => {
            facts.declare("symptom", "no_internet");
            let other = ask(
                p,
                "Are other devices (phone/tablet) working on same network?",
                &["Yes, they work", "No, nothing works"],
            )?;
            facts.declare("other_devices", if other == 0 { "working" } else { "not_working" });
        }
        1 => {
            facts.declare("symptom", "slow_internet");
            let connection = ask(p, "Are you using WiFi or Ethernet cable?", &["WiFi", "Ethernet"])?;
            if connection == 0 {
                facts.declare("connection", "wifi");
                let signal = ask(
                    p,
                    "Is WiFi signal strength good?",
                    &["Weak signal (1-2 bars)", "Good signal (3-4 bars)"],
                )?;
                facts.declare("signal", if signal == 0 { "weak" } else { "good" });
            } else {
                facts.declare("connection", "ethernet");
            }
        }
        2 => {
            facts.declare("symptom", "cannot_connect");
            facts.declare("connection", "wifi");
            let visible = ask(p, "Can you see your WiFi network in the list?", YES_NO)?;
            facts.declare("network_visible", if visible == 0 { "yes" } else { "no" });
        }
        4 => {
            let dns = ask(
                p,
                "Can you open websites if you type IP address like 8.8.8.8?",
                &["Yes, IP works", "No, nothing works"],
            )?;
            if dns == 0 {
                facts.declare("dns_working", "no");
                facts.declare("can_ping_ip", "yes");
            }
        }
        _ => {}
    }

    Ok(())
}

pub(crate) fn application<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the application problem?",
        &["Programs crash frequently", "Can't install software", "Program won't start"],
    )?;

    match symptom {
        0 => {
            facts.declare("symptom", "crashes");
            let which = ask(
                p,
                "Which programs crash?",
                &["One specific program", "Multiple/all programs"],
            )?;
            facts.declare("which_apps", if which == 0 { "specific" } else { "all" });
        }
        1 => facts.declare("symptom", "wont_install"),
        _ => {}
    }

    Ok(())
}

pub(crate) fn peripheral<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let device = ask(
        p,
        "Which device has a problem?",
        &["Printer", "USB Device (flash drive, external HDD)", "Keyboard/Mouse"],
    )?;

    match device {
        0 => {
            facts.declare("device", "printer");
            let symptom = ask(
                p,
                "What is the printer issue?",
                &["Not detected/found", "Print queue stuck", "Poor print quality"],
            )?;
            match symptom {
                0 => facts.declare("symptom", "not_detected"),
                1 => facts.declare("symptom", "queue_stuck"),
                _ => {}
            }
        }
        1 => {
            facts.declare("device", "usb");
            let symptom = ask(
                p,
                "What is the USB issue?",
                &["Not recognized/detected", "Keeps disconnecting", "Very slow"],
            )?;
            match symptom {
                0 => facts.declare("symptom", "not_recognized"),
                1 => facts.declare("symptom", "keeps_disconnecting"),
                _ => {}
            }
        }
        _ => {
            facts.declare("device", "keyboard_mouse");
            let connection = ask(p, "Is it wired or wireless?", &["Wired (USB)", "Wireless"])?;
            facts.declare("connection", if connection == 1 { "wireless" } else { "wired" });
            facts.declare("symptom", "not_working");
        }
    }

    Ok(())
}

pub(crate) fn audio<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the audio problem?",
        &["No sound at all", "Crackling/distorted sound", "Sound from wrong device"],
    )?;

    match symptom {
        0 => {
            facts.declare("symptom", "no_sound");
            let detected = ask(
                p,
                "Is audio device shown in Sound settings?",
                &["Yes, I see it", "No, not listed"],
            )?;
            facts.declare("device_detected", if detected == 0 { "yes" } else { "no" });

            if detected == 0 {
                let muted = ask(
                    p,
                    "Is it muted or volume at 0?",
                    &["No, volume is up", "Yes, was muted"],
                )?;
                facts.declare("muted", if muted == 0 { "no" } else { "yes" });
            }
        }
        1 => facts.declare("symptom", "crackling"),
        _ => {}
    }

    Ok(())
}

pub(crate) fn security<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What security concern do you have?",
        &[
            "Suspected malware/virus",
            "Pop-up ads everywhere",
            "Browser redirects to strange sites",
            "Files encrypted (ransomware)",
            "Unknown programs running",
        ],
    )?;

    match symptom {
        0 => facts.declare("symptom", "malware_suspected"),
        1 => {
            facts.declare("symptom", "malware_suspected");
            facts.declare("signs", "popup_ads");
        }
        2 => {
            facts.declare("symptom", "malware_suspected");
            facts.declare("signs", "browser_redirects");
        }
        3 => facts.declare("symptom", "ransomware"),
        _ => {
            facts.declare("symptom", "malware_suspected");
            facts.declare("signs", "unknown_programs");
        }
    }

    Ok(())
}

pub(crate) fn storage<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the storage problem?",
        &[
            "Disk full/low space",
            "External drive not showing",
            "Drive errors/warnings",
            "Very slow drive",
        ],
    )?;

    match symptom {
        0 => facts.declare("symptom", "disk_full"),
        1 => facts.declare("symptom", "external_not_showing"),
        2 => facts.declare("symptom", "drive_errors"),
        _ => {}
    }

    Ok(())
}

pub(crate) fn windows_update<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the Windows Update problem?",
        &["Update keeps failing", "Update stuck/frozen", "Update taking too long"],
    )?;

    match symptom {
        0 => facts.declare("symptom", "update_failing"),
        _ => facts.declare("symptom", "update_stuck"),
    }

    Ok(())
}

pub(crate) fn display<P: Prompter + ?Sized>(p: &mut P, facts: &mut FactStore) -> Flow {
    let symptom = ask(
        p,
        "What is the display problem?",
        &[
            "No display/black screen",
            "Screen flickering",
            "Wrong resolution",
            "Display colors wrong",
        ],
    )?;

    match symptom {
        0 => {
            facts.declare("symptom", "no_display");
            let power = ask(p, "Is the computer powered on (lights/fans)?", YES_NO)?;
            facts.declare("power_on", if power == 0 { "yes" } else { "no" });
        }
        1 => facts.declare("symptom", "flickering"),
        _ => {}
    }

    Ok(())
}
