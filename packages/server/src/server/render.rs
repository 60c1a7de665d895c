//! HTML rendering for the report page.
//!
//! The core keeps missing and failed fields apart; this is where they are
//! flattened into the text a reader sees.

use telemetry::{ErrorKind, FieldId, FieldValue, Report, TargetResult};

const PAGE_TITLE: &str = "太陽能三期數據整合";

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; }
h2 { color: #666; }
ul { list-style-type: none; padding: 0; }
li { background: #f4f4f4; margin: 5px 0; padding: 10px; border-radius: 5px; }
li.failed { background: #fbe9e7; }
.totals li { background: #e8f5e9; }";

/// Human-readable label for a field.
pub fn field_label(field: FieldId) -> &'static str {
    match field {
        FieldId::OnlineDate => "系統掛表日期",
        FieldId::DailyPower => "今日發電量kw",
        FieldId::TodayPrice => "今日收入",
        FieldId::TotalPrice => "掛表至今總收入",
        FieldId::SystemTime => "更新時間",
    }
}

/// Display text for one field value. `tag` is the element kind that was searched.
pub fn display_value(value: &FieldValue, tag: &str) -> String {
    match value {
        FieldValue::Present(text) => text.clone(),
        FieldValue::Missing(field) => format!("找不到 id 為 {} 的 {} 元素", field, tag),
        FieldValue::Error { kind, message } => match kind {
            ErrorKind::Timeout => format!("Timeout error occurred: {}", message),
            ErrorKind::Network | ErrorKind::HttpStatus => {
                format!("Client error occurred: {}", message)
            }
            ErrorKind::Internal => format!("Internal error occurred: {}", message),
        },
    }
}

/// Escape text for use inside HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_target(out: &mut String, index: usize, result: &TargetResult, tag: &str) {
    let class = if result.is_failed() { " class=\"failed\"" } else { "" };

    out.push_str("  <section>\n");
    out.push_str(&format!("    <h2>太陽能第{}期</h2>\n", index + 1));
    out.push_str("    <ul>\n");
    for (field, value) in &result.fields {
        out.push_str(&format!(
            "      <li{}>{}: {}</li>\n",
            class,
            escape_html(field_label(*field)),
            escape_html(&display_value(value, tag))
        ));
    }
    out.push_str("    </ul>\n  </section>\n");
}

fn render_totals(out: &mut String, report: &Report) {
    if report.aggregates.is_empty() {
        return;
    }

    out.push_str("  <section class=\"totals\">\n    <h2>合計</h2>\n    <ul>\n");
    for (field, total) in &report.aggregates {
        out.push_str(&format!(
            "      <li>{}: {}</li>\n",
            escape_html(field_label(*field)),
            total
        ));
    }
    out.push_str("    </ul>\n  </section>\n");
}

/// Render the full report page.
pub fn render_page(report: &Report, tag: &str) -> String {
    let mut out = format!(
        "<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>{title}</title>\n  <style>\n{style}\n  </style>\n</head>\n<body>\n  <h1>{title}</h1>\n",
        title = PAGE_TITLE,
        style = STYLE
    );

    for (index, result) in report.results.iter().enumerate() {
        render_target(&mut out, index, result, tag);
    }
    render_totals(&mut out, report);

    out.push_str(&format!(
        "  <footer>{}</footer>\n</body>\n</html>\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}
