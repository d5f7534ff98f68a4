//! Plain-text rendering for command output.

use fixit_auth::Role;
use fixit_runtime::ReportCollection;
use fixit_types::{Report, TriageResult};
use std::fmt::Write;

/// Renders the report list.
///
/// Elevated sessions get an `Admin` marker in the heading; `verbose` adds
/// the description and photo presence for each report.
pub fn report_list(reports: &ReportCollection, role: Role, verbose: bool) -> String {
    let mut out = String::new();
    let marker = if role.is_elevated() { " [Admin]" } else { "" };
    let _ = writeln!(out, "Reports ({}){marker}", reports.len());

    if reports.is_empty() {
        out.push_str("  no reports yet\n");
        return out;
    }

    for report in reports {
        out.push('\n');
        report_entry(&mut out, report, verbose);
    }
    out
}

fn report_entry(out: &mut String, report: &Report, verbose: bool) {
    let _ = writeln!(
        out,
        "#{:<4} {:<12} {:<7} {}",
        report.id.to_string(),
        report.status.label(),
        report.priority.to_string(),
        report.category
    );
    let _ = writeln!(out, "      {}", report.title);
    if !report.ai_summary.is_empty() {
        let _ = writeln!(out, "      AI: {}", report.ai_summary);
    }
    if report.suspicious_flag {
        out.push_str("      ! flagged as suspicious\n");
    }
    if verbose {
        let _ = writeln!(out, "      {}", report.description);
        if report.photo.is_some() {
            out.push_str("      (photo attached)\n");
        }
    }
}

/// Renders the one-shot triage result of a new report.
pub fn triage(result: &TriageResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Report #{} submitted", result.report_id);
    let _ = writeln!(out, "  Category:   {}", result.category);
    let _ = writeln!(out, "  Priority:   {}", result.priority);
    let _ = writeln!(out, "  Summary:    {}", result.ai_summary);
    let _ = writeln!(
        out,
        "  Suspicious: {}",
        if result.suspicious_flag { "yes" } else { "no" }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixit_runtime::testing::sample_report;
    use fixit_types::{Priority, ReportId, ReportStatus};

    #[test]
    fn empty_list() {
        let text = report_list(&ReportCollection::default(), Role::Standard, false);
        assert_eq!(text, "Reports (0)\n  no reports yet\n");
    }

    #[test]
    fn admin_marker_only_when_elevated() {
        let reports = ReportCollection::new(vec![sample_report(1, ReportStatus::Pending)]);
        assert!(report_list(&reports, Role::Elevated, false).starts_with("Reports (1) [Admin]"));
        assert!(!report_list(&reports, Role::Standard, false).contains("[Admin]"));
    }

    #[test]
    fn entry_shows_triage_fields() {
        let mut report = sample_report(12, ReportStatus::InProgress);
        report.suspicious_flag = true;
        report.photo = Some("data:image/png;base64,AA==".into());
        let reports = ReportCollection::new(vec![report]);

        let text = report_list(&reports, Role::Standard, false);
        assert!(text.contains("#12"));
        assert!(text.contains("In Progress"));
        assert!(text.contains("Medium"));
        assert!(text.contains("AI: Summary of report 12"));
        assert!(text.contains("flagged as suspicious"));
        assert!(!text.contains("photo attached"));

        let verbose = report_list(&reports, Role::Standard, true);
        assert!(verbose.contains("Description of report 12"));
        assert!(verbose.contains("photo attached"));
    }

    #[test]
    fn triage_lists_all_fields() {
        let text = triage(&TriageResult {
            report_id: ReportId::new(4),
            category: "Sanitation".into(),
            priority: Priority::High,
            ai_summary: "Overflowing bin".into(),
            suspicious_flag: false,
        });
        assert!(text.starts_with("Report #4 submitted"));
        assert!(text.contains("Sanitation"));
        assert!(text.contains("High"));
        assert!(text.contains("Overflowing bin"));
        assert!(text.contains("Suspicious: no"));
    }
}
