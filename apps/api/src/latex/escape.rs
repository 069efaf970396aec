//! LaTeX escaping for user-supplied free text.

/// Characters that LaTeX reserves and that take a plain backslash prefix.
const BACKSLASH_ESCAPED: &[char] = &['&', '%', '$', '#', '_', '{', '}'];

fn is_backslash_escaped(c: char) -> bool {
    BACKSLASH_ESCAPED.contains(&c)
}

/// Replacement text for `\`, `~` and `^`. Also recognised on input as
/// already-escaped tokens.
const TEXTBACKSLASH: &str = r"\textbackslash{}";
const TEXTASCIITILDE: &str = r"\textasciitilde{}";
const TEXTASCIICIRCUM: &str = r"\textasciicircum{}";

const ESCAPED_TOKENS: &[&str] = &[TEXTBACKSLASH, TEXTASCIITILDE, TEXTASCIICIRCUM];

/// Escapes `text` so it can be placed in body-text position without
/// altering the surrounding document structure.
///
/// - `& % $ # _ { }` gain a backslash prefix
/// - `\` becomes `\textbackslash{}`, `~` and `^` their `\textascii…{}` forms
/// - line breaks and other control characters become a single space
///
/// Text that is already escaped passes through unchanged: a backslash
/// before one of `& % $ # _ { }`, and the three `\text…{}` tokens above.
/// Escaping the output again therefore yields the same string.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            if let Some(token) = ESCAPED_TOKENS.iter().find(|t| rest.starts_with(**t)) {
                out.push_str(token);
                rest = &rest[token.len()..];
                continue;
            }
            if let Some(next) = rest[1..].chars().next().filter(|n| is_backslash_escaped(*n)) {
                out.push('\\');
                out.push(next);
                rest = &rest[1 + next.len_utf8()..];
                continue;
            }
        }

        match c {
            '\\' => out.push_str(TEXTBACKSLASH),
            '~' => out.push_str(TEXTASCIITILDE),
            '^' => out.push_str(TEXTASCIICIRCUM),
            c if is_backslash_escaped(c) => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}
