//! Plain-text report rendering for the terminal

use privscope_core::Badge;
use privscope_reporter::{DetailList, PrivacyScore, ReportBundle};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Expand every detail list.
    pub details: bool,
}

pub fn render_report(report: &ReportBundle, badge: Option<&Badge>, opts: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("═══ Tab {} ═══\n", report.session));
    out.push_str(&format!("URL: {}\n", report.url));
    if let Some(badge) = badge {
        out.push_str(&format!("Badge: [{}] ({})\n", badge.text, badge.color));
    }
    out.push('\n');

    out.push_str(&format!("Privacy score: {}\n", report.score));
    out.push_str(&render_deductions(&report.score));
    out.push('\n');

    out.push_str(&format!("Third-party domains:   {}\n", report.third_party_domain_count));
    out.push_str(&format!(
        "Cookies:               {} ({} first-party, {} third-party)\n",
        report.cookie_count, report.cookies.first_party, report.cookies.third_party
    ));
    out.push_str(&format!("Local storage items:   {}\n", report.local_storage_count));
    out.push_str(&format!("Session storage items: {}\n", report.session_storage_count));
    out.push_str(&format!(
        "Canvas fingerprinting: {}\n",
        match report.canvas_access {
            Some(method) => format!("detected ({})", method),
            None => "not detected".to_string(),
        }
    ));
    out.push_str(&format!(
        "Hijacking attempt:     {}\n",
        report.hijacking.as_deref().unwrap_or("none")
    ));

    if opts.details {
        for list in DetailList::ALL {
            let items = report.detail_items(list);
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", list.title()));
            for item in items {
                out.push_str(&format!("  - {}\n", item));
            }
        }
    }

    out.push_str(&format!("\nGenerated: {}\n", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    out
}

pub fn render_deductions(score: &PrivacyScore) -> String {
    let mut out = String::new();
    for deduction in &score.deductions {
        out.push_str(&format!("  -{} {}\n", deduction.points, deduction.signal.describe()));
    }
    out
}
