use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options
});

/// Full markdown pipeline for backend-rendered report content.
pub fn report_markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Chat rendering for assistant-authored content: escape the raw text
/// FIRST, then apply the restricted markdown subset (bold and line breaks).
/// The ordering is the XSS safeguard and must not change. User content goes
/// through `escape_html` alone and is never markdown-rendered.
pub fn render_assistant_markdown(raw: &str) -> String {
    let escaped = escape_html(raw);
    apply_bold(&escaped).replace('\n', "<br>")
}

/// Replace complete `**text**` pairs with `<strong>`. An unmatched marker
/// stays literal.
fn apply_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        match after_open.find("**") {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push_str("<strong>");
                out.push_str(&after_open[..close]);
                out.push_str("</strong>");
                rest = &after_open[close + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

pub fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Report timestamps arrive as RFC 3339 strings; show the date part and fall
/// back to the raw string if the server sends something else.
pub fn format_report_date(raw: &str) -> String {
    use time::format_description::well_known::Rfc3339;
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(parsed) => {
            let format = format_description!("[year]-[month]-[day]");
            parsed.format(format).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_markup_is_escaped() {
        assert_eq!(
            escape_html("<img src=x onerror=alert(1)>"),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
        // Markdown characters in user text stay inert.
        assert_eq!(escape_html("**bold**"), "**bold**");
    }

    #[test]
    fn assistant_markdown_escapes_before_rendering() {
        let html = render_assistant_markdown("**<b>hi</b>**\nnext");
        assert_eq!(html, "<strong>&lt;b&gt;hi&lt;/b&gt;</strong><br>next");
    }

    #[test]
    fn unmatched_bold_marker_stays_literal() {
        assert_eq!(render_assistant_markdown("a **b"), "a **b");
        assert_eq!(
            render_assistant_markdown("**a** and **b"),
            "<strong>a</strong> and **b"
        );
    }

    #[test]
    fn report_date_falls_back_to_raw() {
        assert_eq!(format_report_date("2026-08-01T10:00:00Z"), "2026-08-01");
        assert_eq!(format_report_date("yesterday"), "yesterday");
    }
}
