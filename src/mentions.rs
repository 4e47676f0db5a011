//! Mentions
//!
//! Composer-side trigger detection (`@` plus a run of word characters at
//! the caret), the per-composer mention accumulator, and render-side
//! highlighting of mention tokens inside comment text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Member, Mention, MentionKind};

/// Reserved tokens recognized without any metadata, never resolvable to
/// a user profile.
pub const SPECIAL_MENTIONS: [&str; 2] = ["card", "board"];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Browsers report caret positions in UTF-16 code units
pub fn utf16_to_byte_index(text: &str, utf16: u32) -> usize {
    let mut units: u32 = 0;
    for (byte_index, ch) in text.char_indices() {
        if units >= utf16 {
            return byte_index;
        }
        units += ch.len_utf16() as u32;
    }
    text.len()
}

fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// An in-progress mention at the caret
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionQuery {
    /// Byte offset of the `@`
    pub trigger_start: usize,
    /// Word run between the `@` and the caret; may be empty right after
    /// the trigger was typed
    pub query: String,
}

/// Detect an active mention trigger ending at the caret.
///
/// The character before the `@` must not be a word character, so typing
/// inside an email address does not re-trigger the lookup.
pub fn mention_query_at(text: &str, caret_utf16: u32) -> Option<MentionQuery> {
    let caret = utf16_to_byte_index(text, caret_utf16);
    let prefix = &text[..caret];

    let mut trigger_start = None;
    for (idx, ch) in prefix.char_indices().rev() {
        if ch == '@' {
            trigger_start = Some(idx);
            break;
        }
        if !is_word_char(ch) {
            return None;
        }
    }
    let trigger_start = trigger_start?;

    if let Some(before) = prefix[..trigger_start].chars().next_back() {
        if is_word_char(before) {
            return None;
        }
    }
    Some(MentionQuery {
        trigger_start,
        query: prefix[trigger_start + '@'.len_utf8()..].to_string(),
    })
}

/// Replace the active trigger text with the member's literal email token
/// (plus a trailing space). Returns the new text and the new caret in
/// UTF-16 units.
pub fn apply_suggestion(text: &str, caret_utf16: u32, member: &Member) -> Option<(String, u32)> {
    let query = mention_query_at(text, caret_utf16)?;
    let caret = utf16_to_byte_index(text, caret_utf16);

    let mut out = String::with_capacity(text.len() + member.email.len());
    out.push_str(&text[..query.trigger_start]);
    out.push_str(&member.email);
    out.push(' ');
    let new_caret = utf16_len(&out);
    out.push_str(&text[caret..]);
    Some((out, new_caret))
}

/// Mentions picked from the suggestion box while composing one comment.
/// Scoped to a single composer instance so two open composers never mix
/// their metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MentionAccumulator {
    entries: Vec<Mention>,
}

impl MentionAccumulator {
    pub fn record(&mut self, member: &Member) {
        if self.entries.iter().any(|m| m.email == member.email) {
            return;
        }
        self.entries.push(Mention::user(member.name.clone(), member.email.clone()));
    }

    pub fn entries(&self) -> &[Mention] {
        &self.entries
    }

    /// Hand the accumulated metadata to the outgoing post and reset
    pub fn drain(&mut self) -> Vec<Mention> {
        std::mem::take(&mut self.entries)
    }
}

/// One run of rendered comment text
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Plain(String),
    Highlight { text: String, mention: Mention },
}

struct Needle {
    token: String,
    mention: Mention,
    /// `@name`-style tokens must not continue into a word character
    bounded: bool,
}

/// Split comment text into plain runs and mention highlights.
///
/// Metadata emails and `@name` forms wrap wherever they occur literally;
/// `@card` / `@board` always highlight; when no metadata is present at
/// all, bare email-shaped substrings still highlight so hand-typed
/// mentions stay clickable.
pub fn highlight(text: &str, mentions: &[Mention]) -> Vec<Segment> {
    let mut needles: Vec<Needle> = Vec::new();
    for mention in mentions {
        if !mention.email.is_empty() {
            needles.push(Needle {
                token: mention.email.clone(),
                mention: mention.clone(),
                bounded: false,
            });
        }
        if !mention.name.is_empty() {
            needles.push(Needle {
                token: format!("@{}", mention.name),
                mention: mention.clone(),
                bounded: true,
            });
        }
    }
    for special in SPECIAL_MENTIONS {
        needles.push(Needle {
            token: format!("@{}", special),
            mention: Mention {
                name: special.to_string(),
                email: String::new(),
                kind: MentionKind::Special,
            },
            bounded: true,
        });
    }

    let mut matches: Vec<(usize, usize, Mention)> = Vec::new();
    for needle in &needles {
        for (start, _) in text.match_indices(&needle.token) {
            let end = start + needle.token.len();
            if needle.bounded {
                if let Some(next) = text[end..].chars().next() {
                    if is_word_char(next) {
                        continue;
                    }
                }
            }
            matches.push((start, end, needle.mention.clone()));
        }
    }
    if mentions.is_empty() {
        for found in EMAIL_RE.find_iter(text) {
            matches.push((
                found.start(),
                found.end(),
                Mention::user("", found.as_str()),
            ));
        }
    }

    // Earlier match wins; on a tie the longer token does
    matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (start, end, mention) in matches {
        if start < cursor {
            continue;
        }
        if start > cursor {
            segments.push(Segment::Plain(text[cursor..start].to_string()));
        }
        segments.push(Segment::Highlight {
            text: text[start..end].to_string(),
            mention,
        });
        cursor = end;
    }
    if cursor < text.len() {
        segments.push(Segment::Plain(text[cursor..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_member(name: &str, email: &str) -> Member {
        Member {
            user_id: 1,
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            role: String::new(),
        }
    }

    fn highlights(segments: &[Segment]) -> Vec<&str> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Highlight { text, .. } => Some(text.as_str()),
                Segment::Plain(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_trigger_at_caret() {
        let q = mention_query_at("hello @jo", 9).unwrap();
        assert_eq!(q.query, "jo");
        assert_eq!(q.trigger_start, 6);
    }

    #[test]
    fn test_trigger_just_typed() {
        let q = mention_query_at("ping @", 6).unwrap();
        assert_eq!(q.query, "");
    }

    #[test]
    fn test_no_trigger_after_space() {
        assert!(mention_query_at("@jo done", 8).is_none());
    }

    #[test]
    fn test_no_trigger_inside_email() {
        // The @ of a typed email address must not open the suggestion box
        assert!(mention_query_at("john@x", 6).is_none());
    }

    #[test]
    fn test_trigger_handles_diacritics() {
        let q = mention_query_at("cc @josé", 8).unwrap();
        assert_eq!(q.query, "josé");
    }

    #[test]
    fn test_apply_suggestion_replaces_trigger() {
        let member = make_member("John", "john@x.com");
        let (text, caret) = apply_suggestion("ping @jo please", 8, &member).unwrap();
        assert_eq!(text, "ping john@x.com  please");
        assert_eq!(caret, 16);
    }

    #[test]
    fn test_accumulator_dedupes_by_email() {
        let mut acc = MentionAccumulator::default();
        acc.record(&make_member("John", "john@x.com"));
        acc.record(&make_member("John again", "john@x.com"));
        acc.record(&make_member("Ana", "ana@x.com"));
        assert_eq!(acc.entries().len(), 2);

        let drained = acc.drain();
        assert_eq!(drained.len(), 2);
        assert!(acc.entries().is_empty());
    }

    #[test]
    fn test_highlight_metadata_email_once() {
        let mentions = vec![Mention::user("John", "john@x.com")];
        let segments = highlight("ping john@x.com please", &mentions);
        assert_eq!(highlights(&segments), vec!["john@x.com"]);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("ping ".to_string()),
                Segment::Highlight {
                    text: "john@x.com".to_string(),
                    mention: Mention::user("John", "john@x.com"),
                },
                Segment::Plain(" please".to_string()),
            ]
        );
    }

    #[test]
    fn test_highlight_special_without_metadata() {
        let segments = highlight("see @card for details", &[]);
        let special: Vec<_> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Highlight { text, mention } => Some((text.as_str(), mention.kind)),
                Segment::Plain(_) => None,
            })
            .collect();
        assert_eq!(special, vec![("@card", MentionKind::Special)]);
    }

    #[test]
    fn test_highlight_special_is_bounded() {
        let segments = highlight("my @cardigan", &[]);
        assert!(highlights(&segments).is_empty());
    }

    #[test]
    fn test_highlight_at_name_form() {
        let mentions = vec![Mention::user("John", "john@x.com")];
        let segments = highlight("thanks @John!", &mentions);
        assert_eq!(highlights(&segments), vec!["@John"]);
    }

    #[test]
    fn test_highlight_email_fallback_without_metadata() {
        let segments = highlight("ask ana@x.com about it", &[]);
        assert_eq!(highlights(&segments), vec!["ana@x.com"]);
    }

    #[test]
    fn test_fallback_off_when_metadata_present() {
        // Metadata exists, so the regex fallback must not fire for other
        // email-shaped substrings.
        let mentions = vec![Mention::user("John", "john@x.com")];
        let segments = highlight("john@x.com and other@y.com", &mentions);
        assert_eq!(highlights(&segments), vec!["john@x.com"]);
    }

    #[test]
    fn test_highlight_plain_text_untouched() {
        let segments = highlight("no mentions here", &[]);
        assert_eq!(segments, vec![Segment::Plain("no mentions here".to_string())]);
    }
}
