//! Markup fragments rendered by the router and page behaviours.

#[cfg(test)]
#[path = "html_test.rs"]
mod html_test;

/// Placeholder rendered while a page template is loading.
pub const LOADING_HTML: &str = r#"<div class="p-4 text-center text-slate-500">Loading...</div>"#;

/// Placeholder rendered while the auth gate waits for the initial check.
pub const WAITING_HTML: &str =
    r#"<div class="p-4 text-center text-slate-500">Checking your session...</div>"#;

/// Escape text for inclusion in element content or a quoted attribute.
pub fn escape(text: &str) -> String {
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

/// Error panel shown in place of a page that failed to load.
pub fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="text-center p-5 text-red-600"><h3>Error Loading Page</h3><p>{}</p></div>"#,
        escape(message)
    )
}

/// Centered one-line message used for empty and error list states.
pub fn notice(class: &str, message: &str) -> String {
    format!(r#"<p class="text-center {class}">{}</p>"#, escape(message))
}
