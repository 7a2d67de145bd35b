//! Keyword ranking over a whole guide collection.
use crate::model::{Guide, ScoredGuide};
use crate::scorer;
use crate::tokenize::{normalize, tokenize};

/// Rank `guides` for `query`, best first.
///
/// A blank query returns the collection unchanged. Otherwise guides scoring 0 are
/// dropped and the rest sorted by descending score, equal scores keeping input order.
pub fn rank<'a>(query: &str, guides: &'a [Guide]) -> Vec<&'a Guide> {
    rank_scored(query, guides)
        .into_iter()
        .map(|s| s.guide)
        .collect()
}

/// Same ordering as [`rank`], with scores and highlight snippets attached.
pub fn rank_scored<'a>(query: &str, guides: &'a [Guide]) -> Vec<ScoredGuide<'a>> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return guides
            .iter()
            .map(|guide| ScoredGuide {
                guide,
                score: 0.0,
                highlights: Vec::new(),
            })
            .collect();
    }

    let tokens: Vec<String> = tokenize(&normalized).collect();
    let mut scored: Vec<ScoredGuide<'a>> = guides
        .iter()
        .filter_map(|guide| {
            let score = scorer::score(&normalized, &tokens, guide);
            (score > 0.0).then(|| ScoredGuide {
                guide,
                score,
                highlights: scorer::highlights(&normalized, guide),
            })
        })
        .collect();

    // sort_by is stable: ties keep collection order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;

    fn guide(id: &str, title: &str, summary: &str) -> Guide {
        Guide {
            id: id.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            ..Guide::default()
        }
    }

    fn ids(guides: &[&Guide]) -> Vec<String> {
        guides.iter().map(|g| g.id.clone()).collect()
    }

    fn collection() -> Vec<Guide> {
        vec![
            guide("printer", "Clear a printer queue", "Spooler troubleshooting"),
            guide("vpn-1", "Connect to VPN", "Remote access"),
            guide("email", "Set up email on phone", "Mobile mail"),
            guide("vpn-2", "Connect to VPN", "Remote access"),
            guide("vpn-reset", "VPN token reset", "Reset the VPN token"),
        ]
    }

    #[test]
    fn blank_query_is_identity() {
        let guides = collection();
        for query in ["", "   ", "\t\n"] {
            let ranked = rank(query, &guides);
            assert_eq!(ranked.len(), guides.len());
            for (got, want) in ranked.iter().zip(&guides) {
                assert!(std::ptr::eq(*got, want));
            }
        }
    }

    #[test]
    fn blank_query_on_empty_collection() {
        assert!(rank("", &[]).is_empty());
        assert!(rank("vpn", &[]).is_empty());
    }

    #[test]
    fn non_matching_guides_are_filtered() {
        let guides = collection();
        let ranked = rank("vpn", &guides);
        assert_eq!(ids(&ranked), vec!["vpn-reset", "vpn-1", "vpn-2"]);
    }

    #[test]
    fn scores_descend_and_are_positive() {
        let guides = collection();
        let scored = rank_scored("reset", &guides);
        assert!(!scored.is_empty());
        assert!(scored.iter().all(|s| s.score > 0.0));
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let guides = vec![
            guide("b", "Map a network drive", ""),
            guide("a", "Map a network drive", ""),
            guide("c", "Map a network drive", ""),
        ];
        let ranked = rank("network", &guides);
        assert_eq!(ids(&ranked), vec!["b", "a", "c"]);
    }

    #[test]
    fn ranking_does_not_mutate_input() {
        let guides = collection();
        let before = guides.clone();
        let _ = rank("vpn", &guides);
        assert_eq!(guides, before);
    }

    #[test]
    fn rank_scored_attaches_highlights() {
        let guides = vec![Guide {
            id: "g".to_string(),
            title: "Printer offline".to_string(),
            steps: vec![Step {
                title: "Check cable".to_string(),
                body_rich: "<p>Make sure the printer is plugged in.</p>".to_string(),
            }],
            ..Guide::default()
        }];
        let scored = rank_scored("PRINTER", &guides);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].highlights.len(), 2);
    }
}
