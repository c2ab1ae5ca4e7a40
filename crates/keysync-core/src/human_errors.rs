// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for errors and merge conflicts.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how a front end presents it.

use crate::error::KeysyncError;
use crate::types::FieldConflict;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Two sources disagree; sync continued with the first value.
    Warning,
    /// The user must do something (fix a file, edit a setting).
    ActionRequired,
    /// The key store cannot be used as-is.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `KeysyncError` into a `HumanError`.
pub fn humanize_error(err: &KeysyncError) -> HumanError {
    match err {
        KeysyncError::MalformedEncoding(detail) => HumanError {
            message: "A key file is damaged or in an unexpected format.".into(),
            suggestion: format!(
                "Keys from this application were skipped. Other applications are still synced. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        KeysyncError::UnsupportedAlgorithm(oid) => HumanError {
            message: "This key uses a type we can't sync.".into(),
            suggestion: format!("Only RSA and DSA keys can be synced. (Algorithm: {oid})"),
            severity: Severity::Permanent,
        },

        KeysyncError::InvalidParameters(detail) => HumanError {
            message: "A key is missing some of its parts.".into(),
            suggestion: format!("The key could not be written. ({detail})"),
            severity: Severity::Permanent,
        },

        KeysyncError::InvalidFingerprint(detail) => HumanError {
            message: "A saved fingerprint doesn't look right.".into(),
            suggestion: format!(
                "Fingerprints are 40 characters of 0-9 and a-f. Check the trust file. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        KeysyncError::InvalidRecord(detail) => HumanError {
            message: "A saved trust list doesn't match up with itself.".into(),
            suggestion: format!(
                "Each entry must be filed under its own name. Check the trust file. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        KeysyncError::Base64(e) => HumanError {
            message: "A key file contains text that isn't valid key data.".into(),
            suggestion: format!("The file may have been edited by hand. ({e})"),
            severity: Severity::Permanent,
        },

        KeysyncError::Io(e) => HumanError {
            message: "We couldn't read a file.".into(),
            suggestion: format!("Check that the file exists and you can open it. ({e})"),
            severity: Severity::ActionRequired,
        },

        KeysyncError::Serialization(e) => HumanError {
            message: "The settings file couldn't be understood.".into(),
            suggestion: format!("Fix or remove the settings file and try again. ({e})"),
            severity: Severity::ActionRequired,
        },
    }
}

/// Render a merge conflict for a user-facing report.
pub fn describe_conflict(conflict: &FieldConflict) -> HumanError {
    HumanError {
        message: format!(
            "Two apps disagree about the {} for {}.",
            conflict.field, conflict.identity
        ),
        suggestion: format!(
            "Kept \"{}\" and ignored \"{}\". Check which one is right before trusting this key.",
            conflict.kept, conflict.discarded
        ),
        severity: Severity::Warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_is_permanent() {
        let human = humanize_error(&KeysyncError::malformed("truncated length"));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("truncated length"));
    }

    #[test]
    fn bad_fingerprint_is_action_required() {
        let human = humanize_error(&KeysyncError::InvalidFingerprint("too short".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn mismatched_record_is_action_required() {
        let human = humanize_error(&KeysyncError::InvalidRecord("alice filed as bob".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("alice filed as bob"));
    }

    #[test]
    fn unsupported_algorithm_names_oid() {
        let human = humanize_error(&KeysyncError::UnsupportedAlgorithm("1.3.101.112".into()));
        assert!(human.suggestion.contains("1.3.101.112"));
    }

    #[test]
    fn conflict_is_warning() {
        let conflict = FieldConflict {
            identity: "alice@example.org".into(),
            field: "protocol".into(),
            kept: "prpl-jabber".into(),
            discarded: "prpl-irc".into(),
        };
        let human = describe_conflict(&conflict);
        assert_eq!(human.severity, Severity::Warning);
        assert!(human.message.contains("alice@example.org"));
        assert!(human.suggestion.contains("prpl-irc"));
    }
}
