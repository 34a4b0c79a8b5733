//! Plain-text summary of an analysis.

use super::{ReportPayload, ReportSection, SectionKind};

fn section_heading(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::OneWayOut => "PEOPLE YOU FOLLOW WHO DON'T FOLLOW BACK",
        SectionKind::OneWayIn => "PEOPLE WHO FOLLOW YOU BUT YOU DON'T FOLLOW BACK",
        SectionKind::Mutual => "MUTUAL FOLLOWS",
    }
}

fn push_section(lines: &mut Vec<String>, section: &ReportSection) {
    lines.push(format!(
        "{} {} ({}):",
        section.kind.emoji(),
        section_heading(section.kind),
        section.entities.len()
    ));
    lines.extend(
        section
            .entities
            .iter()
            .map(|e| format!("- @{} - {}", e.handle, e.profile_url)),
    );
    lines.push(String::new());
}

/// Renders the payload as a human-readable summary.
#[must_use]
pub fn render_text(payload: &ReportPayload) -> String {
    let stats = &payload.stats;
    let mut lines = vec![
        format!("GitHub Follower Analysis for @{}", payload.account),
        format!(
            "Generated: {}",
            payload.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        String::new(),
    ];
    if payload.partial {
        lines.push(
            "Note: at least one list could not be fetched completely; counts may be low."
                .to_string(),
        );
        lines.push(String::new());
    }
    lines.extend([
        "📊 STATISTICS:".to_string(),
        format!("- Total Followers: {}", stats.followers),
        format!("- Total Following: {}", stats.following),
        format!("- Mutual Follows: {}", stats.mutual),
        format!("- Don't Follow Back: {}", stats.one_way_out),
        format!("- You Don't Follow Back: {}", stats.one_way_in),
        format!("- Follow-back Rate: {:.1}%", stats.follow_back_rate()),
        String::new(),
    ]);
    for section in payload.sections() {
        push_section(&mut lines, section);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::AnalysisResult;
    use crate::report::assemble;
    use crate::report::tests::{fixed_time, sample_payload};

    #[test]
    fn test_text_contains_stats_and_sections() {
        let text = render_text(&sample_payload());

        assert!(text.starts_with("GitHub Follower Analysis for @octocat"));
        assert!(text.contains("Generated: 2024-05-17 09:30:15 UTC"));
        assert!(text.contains("- Total Followers: 3"));
        assert!(text.contains("- Mutual Follows: 2"));
        assert!(text.contains("- Follow-back Rate: 66.7%"));
        assert!(text.contains("PEOPLE YOU FOLLOW WHO DON'T FOLLOW BACK (1):\n- @d - https://github.com/d"));
        assert!(text.contains(
            "PEOPLE WHO FOLLOW YOU BUT YOU DON'T FOLLOW BACK (1):\n- @a - https://github.com/a"
        ));
        assert!(text.contains("MUTUAL FOLLOWS (2):\n- @b - https://github.com/b\n- @c"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn test_text_section_order() {
        let text = render_text(&sample_payload());
        let out = text.find("DON'T FOLLOW BACK (").unwrap_or(usize::MAX);
        let incoming = text.find("BUT YOU DON'T").unwrap_or(usize::MAX);
        let mutual = text.find("MUTUAL FOLLOWS (").unwrap_or(usize::MAX);
        assert!(out < incoming && incoming < mutual);
    }

    #[test]
    fn test_text_for_empty_account() {
        let payload = assemble("nobody", &[], &[], &AnalysisResult::default(), fixed_time());
        let text = render_text(&payload);
        assert!(text.contains("- Total Following: 0"));
        assert!(text.contains("- Follow-back Rate: 0.0%"));
        assert!(text.contains("MUTUAL FOLLOWS (0):"));
    }

    #[test]
    fn test_text_flags_partial_data() {
        let mut payload = sample_payload();
        payload.partial = true;
        assert!(render_text(&payload).contains("Note: at least one list"));
    }
}
