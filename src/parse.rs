//! Line scanner and serializer for the git-config text format.
//!
//! The parser never builds a syntax tree. It walks the text line by line,
//! keeping every raw line so the document can be reproduced exactly, and
//! classifies each one as a [`LogicalLine`]. Edits are expressed as a
//! [`LineEdit`] returned by a visitor for the entries it is shown; all other
//! lines pass through untouched. This is how `set` and `unset` change a single
//! line while leaving comments, blank lines and ordering alone.
//!
//! Supported syntax:
//!
//! ```text
//! # comment            ; also a comment
//! [section]
//!     key = value      # trailing comment
//!     bare             (boolean key, empty value)
//! [section "Sub Section"]
//!     key = "quoted # not a comment"
//! ```
//!
//! Parsing is lenient: malformed lines are skipped and logged at trace level.
//! With [`ParseOptions::strict`] they become errors instead.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::GitcfgError;
use crate::key::{compose_key, is_valid_name, split_key};

/// Knobs for how text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep backslash sequences in values as written instead of unescaping them.
    pub compat: bool,
    /// Report malformed lines as [`GitcfgError::InvalidLine`] instead of skipping them.
    pub strict: bool,
}

/// A key/value line with its resolved canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Canonical key (`section[.subsection].name`).
    pub key: String,
    /// The key token as written, used when re-serializing the line.
    pub raw_key: &'a str,
    /// Decoded value: comment removed, quotes stripped, escapes resolved.
    pub value: String,
    /// Trailing comment text without its delimiter.
    pub comment: Option<&'a str>,
    /// The whole raw line, without its line terminator.
    pub line: &'a str,
}

/// Classification of one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalLine<'a> {
    Blank,
    Comment,
    Section { section: String, subsection: String },
    Entry(Entry<'a>),
    Invalid(&'static str),
}

/// One raw line together with its classification.
#[derive(Debug, Clone)]
pub struct Scanned<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    pub kind: LogicalLine<'a>,
}

/// Iterator over the logical lines of a document.
pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    number: usize,
    section: String,
    subsection: String,
    options: ParseOptions,
}

/// Start scanning `text`.
pub fn scan(text: &str, options: ParseOptions) -> Scanner<'_> {
    Scanner {
        lines: text.lines(),
        number: 0,
        section: String::new(),
        subsection: String::new(),
        options,
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Scanned<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        self.number += 1;
        let kind = self.classify(text);
        if let LogicalLine::Invalid(reason) = &kind {
            tracing::trace!("line {}: {reason}: {text:?}", self.number);
        }
        Some(Scanned {
            number: self.number,
            text,
            kind,
        })
    }
}

impl<'a> Scanner<'a> {
    fn classify(&mut self, text: &'a str) -> LogicalLine<'a> {
        let line = text.trim();
        if line.is_empty() {
            return LogicalLine::Blank;
        }
        if line.starts_with('#') || line.starts_with(';') {
            return LogicalLine::Comment;
        }
        if line.starts_with('[') {
            return match parse_section_header(line) {
                Some((section, subsection)) => {
                    self.section.clone_from(&section);
                    self.subsection.clone_from(&subsection);
                    LogicalLine::Section {
                        section,
                        subsection,
                    }
                }
                None => LogicalLine::Invalid("empty or unterminated section header"),
            };
        }

        let (raw_key, raw_value) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            // Bare boolean: the key alone, possibly followed by a comment.
            None => match line.find(['#', ';']) {
                Some(idx) => (line[..idx].trim(), ""),
                None => (line, ""),
            },
        };

        if !is_valid_name(raw_key) {
            return LogicalLine::Invalid("invalid key name");
        }
        if self.section.is_empty() {
            return LogicalLine::Invalid("entry outside of a section");
        }

        let (content, comment) = split_value_comment(raw_value);
        let value = if self.options.compat {
            content.to_string()
        } else {
            unescape_value(content)
        };

        LogicalLine::Entry(Entry {
            key: compose_key(&self.section, &self.subsection, raw_key),
            raw_key,
            value,
            comment,
            line: text,
        })
    }
}

/// Parse a `[section]` or `[section "subsection"]` header.
///
/// The section is lowercased; the subsection keeps its case, loses its
/// surrounding quotes and has backslash escapes resolved. Returns `None` for
/// `[]` or a header without a closing bracket.
pub fn parse_section_header(line: &str) -> Option<(String, String)> {
    let inner = line.trim().strip_prefix('[')?;

    let mut in_quotes = false;
    let mut escaped = false;
    let mut end = None;
    for (i, c) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ']' if !in_quotes => {
                end = Some(i);
                break;
            }
            _ => {}
        }
    }

    let body = inner[..end?].trim();
    if body.is_empty() {
        return None;
    }

    match body.split_once(char::is_whitespace) {
        None => Some((body.to_lowercase(), String::new())),
        Some((section, rest)) => Some((section.to_lowercase(), unquote_subsection(rest.trim()))),
    }
}

fn unquote_subsection(raw: &str) -> String {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    let raw = raw.strip_suffix('"').unwrap_or(raw);

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split a raw value into its content and an optional trailing comment.
///
/// The first `#` or `;` outside double quotes starts the comment. The content
/// is trimmed and one pair of enclosing double quotes is removed. An escaped
/// quote (`\"`) does not open or close a quoted run, and an unterminated quote
/// swallows the rest of the line as content. Single quotes are ordinary
/// characters.
pub fn split_value_comment(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.trim();

    let mut in_quotes = false;
    let mut escaped = false;
    let mut cut = None;
    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' | ';' if !in_quotes => {
                cut = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (content, comment) = match cut {
        Some(i) => (raw[..i].trim(), Some(raw[i + 1..].trim())),
        None => (raw, None),
    };

    let content = if content.len() >= 2 && content.starts_with('"') && content.ends_with('"') {
        &content[1..content.len() - 1]
    } else {
        content
    };

    (content, comment)
}

/// Resolve `\\`, `\"`, `\n`, `\t` and `\b`. Any other sequence is kept as written.
pub fn unescape_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Encode a value so that scanning it again yields the same string.
///
/// Values with surrounding whitespace or comment characters are quoted.
/// Outside compat mode, backslashes, quotes and control characters are escaped.
pub fn encode_value(value: &str, compat: bool) -> Cow<'_, str> {
    let needs_quotes = value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(['#', ';']);

    let escaped: Cow<'_, str> = if compat || !value.contains(['\\', '"', '\n', '\t', '\u{8}']) {
        Cow::Borrowed(value)
    } else {
        let mut out = String::with_capacity(value.len() + 8);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\u{8}' => out.push_str("\\b"),
                c => out.push(c),
            }
        }
        Cow::Owned(out)
    };

    if needs_quotes {
        Cow::Owned(format!("\"{escaped}\""))
    } else {
        escaped
    }
}

/// Format a key/value line. An empty value is written as a bare key.
pub fn format_entry(key: &str, value: &str, compat: bool) -> String {
    if value.is_empty() {
        return format!("\t{key}");
    }
    format!("\t{key} = {}", encode_value(value, compat))
}

/// Format a section header, escaping the subsection as needed.
pub fn format_section(section: &str, subsection: &str) -> String {
    if subsection.is_empty() {
        return format!("[{section}]");
    }
    let escaped = subsection.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{section} \"{escaped}\"]")
}

/// What a visitor wants done with the line it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    Keep,
    Replace(String),
    Delete,
}

/// Output of [`rewrite`]: the new lines and how many entries the visitor saw.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub lines: Vec<String>,
    pub matched: usize,
    /// Whether the document ends with a newline.
    pub final_newline: bool,
}

impl Rewrite {
    /// Join the lines back into a document.
    pub fn into_text(self) -> String {
        join_lines(&self.lines, self.final_newline)
    }
}

/// True if text built from `text` should end with a newline: it already
/// does, or it is a new document.
pub fn wants_final_newline(text: &str) -> bool {
    text.is_empty() || text.ends_with('\n')
}

/// Join lines with `\n`. The last line is terminated only if `final_newline`.
pub fn join_lines<S: AsRef<str>>(lines: &[S], final_newline: bool) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    if final_newline && !lines.is_empty() {
        out.push('\n');
    }
    out
}

/// Walk `text` and let `visit` decide the fate of entry lines.
///
/// With `target = None` every entry is visited. With `target = Some(key)`
/// only entries whose canonical key equals `key` are visited. Every other
/// line is copied verbatim.
pub fn rewrite<F>(text: &str, target: Option<&str>, options: ParseOptions, mut visit: F) -> Rewrite
where
    F: FnMut(&Entry<'_>) -> LineEdit,
{
    let mut out = Rewrite {
        final_newline: wants_final_newline(text),
        ..Rewrite::default()
    };

    for scanned in scan(text, options) {
        let LogicalLine::Entry(entry) = &scanned.kind else {
            out.lines.push(scanned.text.to_string());
            continue;
        };
        if target.is_some_and(|t| t != entry.key) {
            out.lines.push(scanned.text.to_string());
            continue;
        }

        out.matched += 1;
        match visit(entry) {
            LineEdit::Keep => out.lines.push(scanned.text.to_string()),
            LineEdit::Replace(line) => {
                tracing::trace!("line {}: {:?} -> {line:?}", scanned.number, scanned.text);
                out.lines.push(line);
            }
            LineEdit::Delete => {
                tracing::trace!("line {}: deleted {:?}", scanned.number, scanned.text);
            }
        }
    }

    out
}

/// Index of canonical key to values, in order of appearance.
pub type Index = BTreeMap<String, Vec<String>>;

/// Derive the key/value index of `text`.
///
/// `origin` only labels strict-mode errors.
pub fn build_index(
    text: &str,
    options: ParseOptions,
    origin: Option<&Path>,
) -> Result<Index, GitcfgError> {
    let mut index = Index::new();
    for scanned in scan(text, options) {
        match scanned.kind {
            LogicalLine::Entry(entry) => index.entry(entry.key).or_default().push(entry.value),
            LogicalLine::Invalid(_) if options.strict => {
                return Err(GitcfgError::InvalidLine {
                    path: origin.map(Path::to_path_buf).unwrap_or_default(),
                    line: scanned.number,
                    content: scanned.text.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(index)
}

/// Insert a new `key = value` line for a canonical `key`.
///
/// The line goes after the last entry (or the header) of the last block whose
/// section and subsection match. Without such a block a new one is appended.
pub fn insert_entry(text: &str, key: &str, value: &str, options: ParseOptions) -> String {
    let parts = split_key(key);
    let mut lines: Vec<String> = Vec::new();
    let mut in_block = false;
    let mut insert_after = None;

    for scanned in scan(text, options) {
        match &scanned.kind {
            LogicalLine::Section {
                section,
                subsection,
            } => {
                in_block = section == parts.section && subsection == parts.subsection;
                if in_block {
                    insert_after = Some(lines.len());
                }
            }
            LogicalLine::Entry(_) if in_block => insert_after = Some(lines.len()),
            _ => {}
        }
        lines.push(scanned.text.to_string());
    }

    let entry = format_entry(parts.name, value, options.compat);
    match insert_after {
        Some(idx) => lines.insert(idx + 1, entry),
        None => {
            lines.push(format_section(parts.section, parts.subsection));
            lines.push(entry);
        }
    }

    join_lines(&lines, wants_final_newline(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LogicalLine<'_>> {
        scan(text, ParseOptions::default()).map(|s| s.kind).collect()
    }

    #[test]
    fn classify_lines() {
        let text = "# top\n\n[core]\n\teditor = vim ; note\n\tbare\n\t2bad = x\n";
        let kinds = kinds(text);
        assert_eq!(kinds[0], LogicalLine::Comment);
        assert_eq!(kinds[1], LogicalLine::Blank);
        assert_eq!(
            kinds[2],
            LogicalLine::Section {
                section: "core".into(),
                subsection: String::new()
            }
        );
        match &kinds[3] {
            LogicalLine::Entry(e) => {
                assert_eq!(e.key, "core.editor");
                assert_eq!(e.value, "vim");
                assert_eq!(e.comment, Some("note"));
            }
            other => panic!("Expected Entry, got {other:?}"),
        }
        match &kinds[4] {
            LogicalLine::Entry(e) => {
                assert_eq!(e.key, "core.bare");
                assert_eq!(e.value, "");
            }
            other => panic!("Expected Entry, got {other:?}"),
        }
        assert!(matches!(kinds[5], LogicalLine::Invalid(_)));
    }

    #[test]
    fn entry_keeps_original_key_case() {
        let kinds = kinds("[Core]\n\tAutoCRLF = true\n");
        match &kinds[1] {
            LogicalLine::Entry(e) => {
                assert_eq!(e.key, "core.autocrlf");
                assert_eq!(e.raw_key, "AutoCRLF");
            }
            other => panic!("Expected Entry, got {other:?}"),
        }
    }

    #[test]
    fn entry_before_any_section_is_invalid() {
        let kinds = kinds("orphan = 1\n[core]\n");
        assert!(matches!(kinds[0], LogicalLine::Invalid(_)));
    }

    #[test]
    fn parse_section_headers() {
        for (input, section, subsection) in [
            ("[aliases]", "aliases", ""),
            ("[Aliases]", "aliases", ""),
            (r#"[aliases "subsection"]"#, "aliases", "subsection"),
            (
                r#"[aliases "subsection with spaces"]"#,
                "aliases",
                "subsection with spaces",
            ),
            (
                r#"[aliases "subsection with spaces and \" \t \0 escapes"]"#,
                "aliases",
                r#"subsection with spaces and " t 0 escapes"#,
            ),
            (r#"[remote "with]bracket"]"#, "remote", "with]bracket"),
            ("[core] # trailing", "core", ""),
        ] {
            let (s, sub) = parse_section_header(input).unwrap();
            assert_eq!(s, section, "{input}");
            assert_eq!(sub, subsection, "{input}");
        }
    }

    #[test]
    fn empty_or_broken_headers_are_skipped() {
        assert_eq!(parse_section_header("[]"), None);
        assert_eq!(parse_section_header("[  ]"), None);
        assert_eq!(parse_section_header("[core"), None);
    }

    #[test]
    fn split_value_comment_cases() {
        for (input, content, comment) in [
            (r#""foo#bar#baz" # comment1"#, "foo#bar#baz", Some("comment1")),
            ("no quotes here # comment3", "no quotes here", Some("comment3")),
            (
                r#""nested 'quotes' # works" # comment4"#,
                "nested 'quotes' # works",
                Some("comment4"),
            ),
            ("no comment here", "no comment here", None),
            (
                r#"   "leading space content" ; comment6"#,
                "leading space content",
                Some("comment6"),
            ),
            (
                "trailing space content # comment7   ",
                "trailing space content",
                Some("comment7"),
            ),
            ("# comment line", "", Some("comment line")),
            (
                r#" "quotes spanning ; comment char" "#,
                "quotes spanning ; comment char",
                None,
            ),
            (
                r#" "hash # inside" # comment outside "#,
                "hash # inside",
                Some("comment outside"),
            ),
            (
                r##" string with #"# hash inside quotes"##,
                "string with",
                Some(r##""# hash inside quotes"##),
            ),
            ("'foo;bar' ; comment2", "'foo", Some("bar' ; comment2")),
            (r#""unterminated # still content"#, r#""unterminated # still content"#, None),
            (r#""""#, "", None),
            ("", "", None),
        ] {
            let (got_content, got_comment) = split_value_comment(input);
            assert_eq!(got_content, content, "{input}");
            assert_eq!(got_comment, comment, "{input}");
        }
    }

    #[test]
    fn escaped_quote_does_not_toggle() {
        let (content, comment) = split_value_comment(r#""say \"hi\" # there" # c"#);
        assert_eq!(content, r#"say \"hi\" # there"#);
        assert_eq!(comment, Some("c"));
    }

    #[test]
    fn unescape_known_sequences() {
        assert_eq!(unescape_value(r"a\\b"), r"a\b");
        assert_eq!(unescape_value(r#"a\"b"#), r#"a"b"#);
        assert_eq!(unescape_value(r"a\nb\tc\bd"), "a\nb\tc\u{8}d");
        assert_eq!(unescape_value(r"C:\path\x"), r"C:\path\x");
        assert_eq!(unescape_value(r"trailing\"), r"trailing\");
    }

    #[test]
    fn compat_mode_keeps_escapes() {
        let options = ParseOptions {
            compat: true,
            ..Default::default()
        };
        let index = build_index("[core]\n\tpath = a\\tb\n", options, None).unwrap();
        assert_eq!(index["core.path"], vec![r"a\tb".to_string()]);
    }

    #[test]
    fn encode_quotes_and_escapes() {
        assert_eq!(encode_value("plain", false), "plain");
        assert_eq!(encode_value("a # b", false), r#""a # b""#);
        assert_eq!(encode_value(" lead", false), r#"" lead""#);
        assert_eq!(encode_value(r#"say "hi""#, false), r#"say \"hi\""#);
        assert_eq!(encode_value("tab\there", false), r"tab\there");
        assert_eq!(encode_value(r"C:\dir", true), r"C:\dir");
    }

    #[test]
    fn encoded_values_scan_back_identically() {
        for value in ["a # b", " x ", r#"q"uote"#, "line\nbreak", r"back\slash", "semi;colon"] {
            let text = format!("[s]\n{}\n", format_entry("k", value, false));
            let index = build_index(&text, ParseOptions::default(), None).unwrap();
            assert_eq!(index["s.k"], vec![value.to_string()], "{value:?}");
        }
    }

    #[test]
    fn format_bare_key() {
        assert_eq!(format_entry("flag", "", false), "\tflag");
        assert_eq!(format_entry("name", "v", false), "\tname = v");
    }

    #[test]
    fn format_section_escapes_subsection() {
        assert_eq!(format_section("core", ""), "[core]");
        assert_eq!(format_section("remote", r#"a"b"#), r#"[remote "a\"b"]"#);
    }

    #[test]
    fn rewrite_full_extraction_mirrors_input() {
        let text = "# header\n[core]\n\tKey = Value ; c\n\n[x \"Y\"]\n\tz\n";
        let mut seen = Vec::new();
        let out = rewrite(text, None, ParseOptions::default(), |e| {
            seen.push(e.key.clone());
            LineEdit::Keep
        });
        assert_eq!(out.matched, 2);
        assert_eq!(seen, vec!["core.key", "x.Y.z"]);
        assert_eq!(out.into_text(), text);
    }

    #[test]
    fn rewrite_targets_exact_section_and_subsection() {
        let text = "[remote \"a\"]\n\turl = one\n[remote \"b\"]\n\turl = two\n";
        let out = rewrite(text, Some("remote.b.url"), ParseOptions::default(), |_| {
            LineEdit::Replace("\turl = three".into())
        });
        assert_eq!(out.matched, 1);
        assert_eq!(
            out.into_text(),
            "[remote \"a\"]\n\turl = one\n[remote \"b\"]\n\turl = three\n"
        );
    }

    #[test]
    fn visitor_sees_raw_line() {
        let text = "[core]\n   Editor =  vim   # mine\n";
        let mut lines = Vec::new();
        rewrite(text, Some("core.editor"), ParseOptions::default(), |e| {
            lines.push(e.line.to_string());
            LineEdit::Keep
        });
        assert_eq!(lines, ["   Editor =  vim   # mine"]);
    }

    #[test]
    fn final_newline_follows_input() {
        let keep = |text: &str| rewrite(text, None, ParseOptions::default(), |_| LineEdit::Keep).into_text();
        assert_eq!(keep("[core]\n\ta = 1"), "[core]\n\ta = 1");
        assert_eq!(keep("[core]\n\ta = 1\n"), "[core]\n\ta = 1\n");
        assert_eq!(keep(""), "");
        assert_eq!(join_lines(&["a", "b"], false), "a\nb");
        assert_eq!(join_lines(&["a", "b"], true), "a\nb\n");
    }

    #[test]
    fn rewrite_delete_removes_line() {
        let text = "[core]\n\ta = 1\n\tb = 2\n";
        let out = rewrite(text, Some("core.a"), ParseOptions::default(), |_| LineEdit::Delete);
        assert_eq!(out.into_text(), "[core]\n\tb = 2\n");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let text = "[core]\r\n\tkey = value\r\n";
        let index = build_index(text, ParseOptions::default(), None).unwrap();
        assert_eq!(index["core.key"], vec!["value".to_string()]);
        let out = rewrite(text, None, ParseOptions::default(), |_| LineEdit::Keep);
        assert_eq!(out.into_text(), "[core]\n\tkey = value\n");
    }

    #[test]
    fn strict_mode_reports_line_numbers() {
        let options = ParseOptions {
            strict: true,
            ..Default::default()
        };
        let err = build_index(
            "[core]\n\tok = 1\n\t_bad = 2\n",
            options,
            Some(Path::new("cfg")),
        )
        .unwrap_err();
        match err {
            GitcfgError::InvalidLine { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "\t_bad = 2");
            }
            other => panic!("Expected InvalidLine, got {other:?}"),
        }
    }

    #[test]
    fn lenient_mode_skips_bad_lines() {
        let index = build_index("[core]\n\t_bad = 2\n\tok = 1\n", ParseOptions::default(), None)
            .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["core.ok"], vec!["1".to_string()]);
    }

    #[test]
    fn insert_into_last_matching_block() {
        let text = "[core]\n\ta = 1\n[user]\n\tname = x\n[core]\n\tb = 2\n\n# tail\n";
        let out = insert_entry(text, "core.c", "3", ParseOptions::default());
        assert_eq!(
            out,
            "[core]\n\ta = 1\n[user]\n\tname = x\n[core]\n\tb = 2\n\tc = 3\n\n# tail\n"
        );
    }

    #[test]
    fn insert_appends_new_section() {
        let out = insert_entry("[core]\n\ta = 1\n", "remote.Origin.url", "x", ParseOptions::default());
        assert_eq!(out, "[core]\n\ta = 1\n[remote \"Origin\"]\n\turl = x\n");
    }

    #[test]
    fn insert_into_empty_document() {
        let out = insert_entry("", "foo.bar", "baz", ParseOptions::default());
        assert_eq!(out, "[foo]\n\tbar = baz\n");
    }
}
