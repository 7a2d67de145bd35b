//! Weighted multi-field relevance scoring for one (query, guide) pair.
//!
//! Field weights:
//!
//! | match                                   | points                  |
//! |-----------------------------------------|-------------------------|
//! | title contains query                    | 10 (+5 if it starts so) |
//! | tag contains query                      | 5 per tag               |
//! | tag contains a query token (multi-word) | 2 per (tag, token)      |
//! | summary contains query                  | 4                       |
//! | step title contains query               | 2 per step              |
//! | step body contains query                | 1 + min(0.5 * hits, 3)  |
//! | token in title / summary / step body    | 1 / 0.5 / 0.3 per step  |
//!
//! Matching is literal substring search over lowercased text; the query is never
//! compiled into a pattern.
use crate::model::{Guide, Highlight, HighlightField};
use crate::tokenize::{collapse_whitespace, count_occurrences, strip_markup};

const TITLE_MATCH: f64 = 10.0;
const TITLE_PREFIX_BONUS: f64 = 5.0;
const TAG_MATCH: f64 = 5.0;
const TAG_TOKEN_MATCH: f64 = 2.0;
const SUMMARY_MATCH: f64 = 4.0;
const STEP_TITLE_MATCH: f64 = 2.0;
const STEP_BODY_MATCH: f64 = 1.0;
const OCCURRENCE_WEIGHT: f64 = 0.5;
const OCCURRENCE_CAP: f64 = 3.0;
const TOKEN_IN_TITLE: f64 = 1.0;
const TOKEN_IN_SUMMARY: f64 = 0.5;
const TOKEN_IN_STEP_BODY: f64 = 0.3;

const SNIPPET_CONTEXT_CHARS: usize = 40;
const ELLIPSIS: &str = "...";

/// Score `guide` against an already-normalized query and its tokens.
///
/// Pure and infallible. An empty query scores 0 for every guide.
pub fn score(normalized_query: &str, query_tokens: &[String], guide: &Guide) -> f64 {
    let query = normalized_query;
    if query.is_empty() {
        return 0.0;
    }
    let multi_token = query_tokens.len() > 1;
    let mut total = 0.0;

    let title = guide.title.to_lowercase();
    if title.contains(query) {
        total += TITLE_MATCH;
        if title.starts_with(query) {
            total += TITLE_PREFIX_BONUS;
        }
    }

    for tag in &guide.tags {
        let tag = tag.to_lowercase();
        if tag.contains(query) {
            total += TAG_MATCH;
        }
        if multi_token {
            let hits = query_tokens.iter().filter(|t| tag.contains(t.as_str())).count();
            total += TAG_TOKEN_MATCH * hits as f64;
        }
    }

    let summary = guide.summary.to_lowercase();
    if summary.contains(query) {
        total += SUMMARY_MATCH;
    }

    let bodies: Vec<String> = guide
        .steps
        .iter()
        .map(|s| strip_markup(&s.body_rich).to_lowercase())
        .collect();

    for (step, body) in guide.steps.iter().zip(&bodies) {
        if step.title.to_lowercase().contains(query) {
            total += STEP_TITLE_MATCH;
        }
        if body.contains(query) {
            let occurrences = count_occurrences(body, query) as f64;
            total += STEP_BODY_MATCH + (occurrences * OCCURRENCE_WEIGHT).min(OCCURRENCE_CAP);
        }
    }

    if multi_token {
        for token in query_tokens {
            let token = token.as_str();
            if title.contains(token) {
                total += TOKEN_IN_TITLE;
            }
            if summary.contains(token) {
                total += TOKEN_IN_SUMMARY;
            }
            let steps_with_token = bodies.iter().filter(|b| b.contains(token)).count();
            total += TOKEN_IN_STEP_BODY * steps_with_token as f64;
        }
    }

    total
}

/// Best-effort highlight snippets for UI display. Never affects the score.
pub fn highlights(normalized_query: &str, guide: &Guide) -> Vec<Highlight> {
    let mut out = Vec::new();
    if normalized_query.is_empty() {
        return out;
    }

    if guide.title.to_lowercase().contains(normalized_query) {
        out.push(Highlight {
            field: HighlightField::Title,
            text: guide.title.clone(),
        });
    }

    let content = readable_content(guide);
    if let Some(text) = snippet_around(&content, normalized_query) {
        out.push(Highlight {
            field: HighlightField::Body,
            text,
        });
    }

    out
}

/// Summary, step titles and plain-text step bodies joined into one line.
fn readable_content(guide: &Guide) -> String {
    let mut parts = Vec::with_capacity(1 + guide.steps.len() * 2);
    parts.push(guide.summary.clone());
    for step in &guide.steps {
        parts.push(step.title.clone());
        parts.push(strip_markup(&step.body_rich));
    }
    collapse_whitespace(&parts.join(" "))
}

fn snippet_around(content: &str, needle: &str) -> Option<String> {
    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > folded.len() {
        return None;
    }

    let start = folded
        .windows(needle.len())
        .position(|w| w == needle.as_slice())?;
    let end = start + needle.len();
    let from = start.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let to = (end + SNIPPET_CONTEXT_CHARS).min(chars.len());

    let mut snippet = String::new();
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[from..to]);
    if to < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use crate::tokenize::{normalize, tokenize};

    fn score_for(query: &str, guide: &Guide) -> f64 {
        let normalized = normalize(query);
        let tokens: Vec<String> = tokenize(&normalized).collect();
        score(&normalized, &tokens, guide)
    }

    fn password_guide() -> Guide {
        Guide {
            id: "pw".to_string(),
            title: "Password Reset Procedure".to_string(),
            summary: "Step-by-step guide to reset user passwords".to_string(),
            tags: vec!["password".to_string(), "active-directory".to_string()],
            steps: vec![Step {
                title: "Verify User Identity".to_string(),
                body_rich: "<p>password password</p>".to_string(),
            }],
        }
    }

    #[test]
    fn password_example_scores_26() {
        assert_eq!(score_for("password", &password_guide()), 26.0);
    }

    #[test]
    fn empty_guide_scores_zero() {
        assert_eq!(score_for("password", &Guide::default()), 0.0);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(score_for("   ", &password_guide()), 0.0);
    }

    #[test]
    fn title_contains_without_prefix() {
        let guide = Guide {
            title: "How to reset a password".to_string(),
            ..Guide::default()
        };
        assert_eq!(score_for("password", &guide), 10.0);
    }

    #[test]
    fn occurrence_bonus_is_capped() {
        let guide = Guide {
            steps: vec![Step {
                title: String::new(),
                body_rich: "vpn ".repeat(20),
            }],
            ..Guide::default()
        };
        // 1 for the match plus the capped bonus of 3
        assert_eq!(score_for("vpn", &guide), 4.0);
    }

    #[test]
    fn step_title_and_body_both_count() {
        let guide = Guide {
            steps: vec![Step {
                title: "Restart the Printer".to_string(),
                body_rich: "<b>printer</b> off, then on".to_string(),
            }],
            ..Guide::default()
        };
        assert_eq!(score_for("printer", &guide), 2.0 + 1.0 + 0.5);
    }

    #[test]
    fn multi_token_bonus_applies_per_field() {
        let guide = Guide {
            title: "Reset VPN".to_string(),
            summary: "How to reset things".to_string(),
            tags: vec!["vpn-client".to_string()],
            steps: vec![
                Step {
                    title: String::new(),
                    body_rich: "<p>reset the vpn</p>".to_string(),
                },
                Step {
                    title: String::new(),
                    body_rich: "<p>vpn again</p>".to_string(),
                },
            ],
            ..Guide::default()
        };
        // no full-phrase match for "reset vpn client" anywhere
        // tag: "vpn" and "client" hit "vpn-client" -> 2 * 2
        // "reset": title 1 + summary 0.5 + one body 0.3
        // "vpn": title 1 + two bodies 0.6
        // "client": nothing else
        let expected = 4.0 + (1.0 + 0.5 + 0.3) + (1.0 + 0.6);
        let got = score_for("reset vpn client", &guide);
        assert!((got - expected).abs() < 1e-9, "got {got}, expected {expected}");
    }

    #[test]
    fn single_token_query_skips_token_bonuses() {
        let guide = Guide {
            tags: vec!["email".to_string()],
            ..Guide::default()
        };
        assert_eq!(score_for("email", &guide), 5.0);
    }

    #[test]
    fn metacharacters_are_matched_literally() {
        let guide = Guide {
            steps: vec![Step {
                title: String::new(),
                body_rich: "use (a|b)* here and (a|b)* there".to_string(),
            }],
            ..Guide::default()
        };
        assert_eq!(score_for("(a|b)*", &guide), 1.0 + 1.0);
        assert_eq!(score_for("a.b", &guide), 0.0);
    }

    #[test]
    fn highlights_title_and_body_snippet() {
        let guide = password_guide();
        let hl = highlights("password", &guide);
        assert_eq!(hl.len(), 2);
        assert_eq!(hl[0].field, HighlightField::Title);
        assert_eq!(hl[0].text, "Password Reset Procedure");
        assert_eq!(hl[1].field, HighlightField::Body);
        assert!(hl[1].text.to_lowercase().contains("password"));
    }

    #[test]
    fn body_snippet_is_truncated_with_ellipsis() {
        let before = "x".repeat(60);
        let after = "y".repeat(60);
        let guide = Guide {
            summary: format!("{before} needle {after}"),
            ..Guide::default()
        };
        let hl = highlights("needle", &guide);
        assert_eq!(hl.len(), 1);
        let text = &hl[0].text;
        assert!(text.starts_with("..."));
        assert!(text.ends_with("..."));
        let expected = format!("...{} needle {}...", "x".repeat(39), "y".repeat(39));
        assert_eq!(text, &expected);
    }

    #[test]
    fn no_match_yields_no_highlights() {
        assert!(highlights("printer", &password_guide()).is_empty());
    }
}
