use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse guess at what the user is doing, derived from the foreground
/// application's process name alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntentLabel {
    Coding,
    #[serde(rename = "Browsing/Research")]
    Browsing,
    Communication,
    Drafting,
    Calculation,
    #[serde(rename = "General Task")]
    GeneralTask,
    Idle,
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IntentLabel::Coding => "Coding",
            IntentLabel::Browsing => "Browsing/Research",
            IntentLabel::Communication => "Communication",
            IntentLabel::Drafting => "Drafting",
            IntentLabel::Calculation => "Calculation",
            IntentLabel::GeneralTask => "General Task",
            IntentLabel::Idle => "Idle",
        };
        f.write_str(text)
    }
}

/// One row of the classification table. `folded` needles are matched against
/// the lowercased owner name; `verbatim` needles against the name exactly as
/// the OS reported it. The verbatim rule for "Terminal" and "browser" is a
/// deliberate compatibility quirk, not an oversight here.
struct Rule {
    label: IntentLabel,
    folded: &'static [&'static str],
    verbatim: &'static [&'static str],
}

/// Evaluated top to bottom, first match wins.
const RULES: &[Rule] = &[
    Rule {
        label: IntentLabel::Coding,
        folded: &["code"],
        verbatim: &["Terminal"],
    },
    Rule {
        label: IntentLabel::Browsing,
        folded: &["chrome"],
        verbatim: &["browser"],
    },
    Rule {
        label: IntentLabel::Communication,
        folded: &["slack", "whatsapp"],
        verbatim: &[],
    },
    Rule {
        label: IntentLabel::Drafting,
        folded: &["notepad", "text"],
        verbatim: &[],
    },
    Rule {
        label: IntentLabel::Calculation,
        folded: &["calc"],
        verbatim: &[],
    },
];

/// Total, deterministic classification of an owner-process name. A missing
/// name is not an error; it falls through to `GeneralTask`.
pub fn classify(owner_name: Option<&str>) -> IntentLabel {
    let Some(name) = owner_name else {
        return IntentLabel::GeneralTask;
    };

    let folded = name.to_lowercase();
    for rule in RULES {
        let folded_hit = rule.folded.iter().any(|needle| folded.contains(needle));
        let verbatim_hit = rule.verbatim.iter().any(|needle| name.contains(needle));
        if folded_hit || verbatim_hit {
            return rule.label;
        }
    }

    IntentLabel::GeneralTask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_apps_per_precedence_table() {
        assert_eq!(classify(Some("Visual Studio Code")), IntentLabel::Coding);
        assert_eq!(classify(Some("Google Chrome")), IntentLabel::Browsing);
        assert_eq!(classify(Some("Slack")), IntentLabel::Communication);
        assert_eq!(classify(Some("Notepad")), IntentLabel::Drafting);
        assert_eq!(classify(Some("Calculator")), IntentLabel::Calculation);
        assert_eq!(classify(Some("Spotify")), IntentLabel::GeneralTask);
    }

    #[test]
    fn coding_wins_over_later_rules() {
        // "Code.exe" also fails every later rule, but precedence matters for
        // names hitting several rows. "CodeSlack" must resolve as Coding.
        assert_eq!(classify(Some("Code.exe")), IntentLabel::Coding);
        assert_eq!(classify(Some("CodeSlack")), IntentLabel::Coding);
    }

    #[test]
    fn terminal_and_browser_match_verbatim_casing_only() {
        assert_eq!(classify(Some("Terminal")), IntentLabel::Coding);
        assert_eq!(classify(Some("iTerm Terminal")), IntentLabel::Coding);
        // Lowercase "terminal" misses the verbatim needle and every folded one.
        assert_eq!(classify(Some("terminal")), IntentLabel::GeneralTask);

        assert_eq!(classify(Some("my browser")), IntentLabel::Browsing);
        assert_eq!(classify(Some("My Browser")), IntentLabel::GeneralTask);
    }

    #[test]
    fn folded_needles_ignore_case() {
        assert_eq!(classify(Some("CHROME")), IntentLabel::Browsing);
        assert_eq!(classify(Some("WhatsApp")), IntentLabel::Communication);
        assert_eq!(classify(Some("TextEdit")), IntentLabel::Drafting);
        assert_eq!(classify(Some("GNOME CALCULATOR")), IntentLabel::Calculation);
    }

    #[test]
    fn missing_or_empty_owner_is_a_general_task() {
        assert_eq!(classify(None), IntentLabel::GeneralTask);
        assert_eq!(classify(Some("")), IntentLabel::GeneralTask);
    }

    #[test]
    fn classification_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify(Some("Code.exe")), IntentLabel::Coding);
        }
    }
}
