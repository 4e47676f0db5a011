//! Activity Log Rendering
//!
//! Maps each activity entry's action tag to one fixed human-readable
//! sentence. Unrecognized tags fall back to a humanized version of the
//! raw tag.

use crate::models::ActivityLogEntry;

fn template(action: &str) -> Option<&'static str> {
    Some(match action {
        "created" => "created this card",
        "edited" => "edited this card",
        "moved" => "moved this card to another column",
        "attached" => "added an attachment",
        "assigned" => "changed the assigned members",
        "dated" => "changed the dates",
        "closed" => "closed this card",
        "reopened" => "reopened this card",
        _ => return None,
    })
}

/// Underscores become spaces, everything lower-cased
fn humanize(action: &str) -> String {
    action.replace('_', " ").to_lowercase()
}

/// One rendered sentence per log entry
pub fn activity_sentence(entry: &ActivityLogEntry) -> String {
    match template(&entry.action) {
        Some(text) => format!("{} {}", entry.actor_name, text),
        None => format!("{} {}", entry.actor_name, humanize(&entry.action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(action: &str, actor: &str) -> ActivityLogEntry {
        ActivityLogEntry {
            action: action.to_string(),
            actor_name: actor.to_string(),
            data_json: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_known_actions_use_templates() {
        assert_eq!(
            activity_sentence(&make_entry("created", "Ana")),
            "Ana created this card"
        );
        assert_eq!(
            activity_sentence(&make_entry("moved", "Ana")),
            "Ana moved this card to another column"
        );
        assert_eq!(
            activity_sentence(&make_entry("reopened", "Ben")),
            "Ben reopened this card"
        );
    }

    #[test]
    fn test_unknown_action_is_humanized() {
        assert_eq!(
            activity_sentence(&make_entry("CHANGED_COVER_IMAGE", "Ana")),
            "Ana changed cover image"
        );
    }
}
