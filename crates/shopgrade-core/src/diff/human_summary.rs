//! Human-readable summary renderer for upgrade previews.

use crate::model::{PreviewReport, ShopId};

/// Render a Markdown summary of a [`PreviewReport`].
///
/// Used by the operator CLI. Informational only; the JSON report is the
/// contract.
pub fn render_upgrade_summary(shop_id: &ShopId, report: &PreviewReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Upgrade preview: {}\n\n", shop_id));

    if report.components.is_empty() {
        out.push_str("_All locked components are current._\n");
    } else {
        out.push_str(&format!(
            "### Components ({})\n\n| Package | From | To | Summary |\n|---|---|---|---|\n",
            report.components.len()
        ));
        for change in &report.components {
            let from = change.from.as_deref().unwrap_or("(unlocked)");
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                change.name,
                from,
                change.to,
                escape_cell(&change.summary)
            ));
        }
    }

    if let Some(drift) = &report.config_diff {
        out.push_str("\n### Config drift\n\n");
        if drift.is_empty() {
            out.push_str("_No differences from the template app._\n");
        } else {
            render_paths(&mut out, "Templates", &drift.templates);
            render_paths(&mut out, "Translations", &drift.translations);
        }
    }

    out
}

fn render_paths(out: &mut String, label: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    let mut sorted: Vec<&String> = paths.iter().collect();
    sorted.sort();
    out.push_str(&format!("- **{}** ({})\n", label, sorted.len()));
    for path in sorted {
        out.push_str(&format!("  - `{}`\n", path));
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
