#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::constants::TRUNCATION_NOTICE;

/// Largest index `<= limit` that falls on a char boundary of `content`.
pub fn floor_char_boundary(content: &str, limit: usize) -> usize {
    if limit >= content.len() {
        return content.len();
    }

    let mut end = limit;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Truncates `content` to at most `limit` bytes, appending a notice to
/// indicate omitted output. Content within the limit is returned unchanged.
pub fn truncate_with_notice(content: &str, limit: usize) -> String {
    if content.len() <= limit {
        return content.to_string();
    }

    let mut truncated = content[..floor_char_boundary(content, limit)].to_string();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}

/// Escapes the characters that are significant in HTML text and attribute
/// values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for embedding inside a JavaScript template literal
/// (`` `...` ``).
///
/// Backslash, backtick, newline, dollar sign and tab are backslash-escaped, in
/// that order.
pub fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('\n', "\\n")
        .replace('$', "\\$")
        .replace('\t', "\\t")
}

/// Escapes text for embedding inside a double-quoted JavaScript string that
/// itself lives in a `<script>` element.
pub fn escape_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces the first `{}` placeholders of `template` with `args`, in order.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();

    while let Some(pos) = rest.find("{}") {
        let Some(arg) = args.next() else { break };
        out.push_str(&rest[..pos]);
        out.push_str(arg);
        rest = &rest[pos + 2..];
    }

    out.push_str(rest);
    out
}
