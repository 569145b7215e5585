const MAX_FILE_STEM_CHARS: usize = 64;

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => value[..byte_idx].to_owned(),
        None => value.to_owned(),
    }
}

/// Collapse a value to one line: control characters and whitespace runs become
/// a single space, the ends are trimmed and the result is capped at `max_chars`.
pub fn sanitize_single_line(raw: &str, max_chars: usize) -> String {
    let collapsed = raw
        .split(|ch: char| ch.is_whitespace() || ch.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&collapsed, max_chars).trim_end().to_owned()
}

/// Clean multi-line text such as reflections and descriptions.
///
/// Line endings become `\n`, tabs become spaces, other control characters are
/// dropped, trailing spaces on each line are removed and runs of blank lines
/// shrink to a single blank line.
pub fn sanitize_multiline(raw: &str, max_chars: usize) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0;
    for line in normalized.split('\n') {
        let cleaned: String = line
            .chars()
            .filter_map(|ch| match ch {
                '\t' => Some(' '),
                ch if ch.is_control() => None,
                ch => Some(ch),
            })
            .collect();
        let cleaned = cleaned.trim_end().to_owned();

        if cleaned.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push(String::new());
        } else {
            blank_run = 0;
            lines.push(cleaned);
        }
    }

    let joined = lines.join("\n");
    let trimmed = joined.trim_matches(|ch: char| ch == '\n' || ch == ' ');
    truncate_chars(trimmed, max_chars).trim_end().to_owned()
}

/// Remove HTML/XML tags. A `<` that does not open a tag is kept as text.
pub fn strip_html_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let opens_tag = candidate[1..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '/' || ch == '!');

        match candidate.find('>') {
            Some(end) if opens_tag => rest = &candidate[end + 1..],
            _ => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escape `\`, `%` and `_` so user input matches literally inside `LIKE`/`ILIKE`.
pub fn escape_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Produce a storage-safe object name from an uploaded file name.
///
/// Directory components are discarded, characters outside `[A-Za-z0-9._-]`
/// become `-`, the extension is lowercased and the stem is capped.
pub fn sanitize_storage_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let stem = slug(stem);
    let stem = truncate_chars(&stem, MAX_FILE_STEM_CHARS);
    let stem = stem.trim_matches('-');
    let stem = if stem.is_empty() { "file" } else { stem };

    match extension.map(|ext| slug(&ext.to_ascii_lowercase())) {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem.to_owned(),
    }
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '_' {
            ch
        } else {
            '-'
        };
        if mapped == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(mapped);
    }
    out.trim_end_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::{
        escape_like_pattern, sanitize_multiline, sanitize_single_line,
        sanitize_storage_file_name, strip_html_tags, truncate_chars,
    };

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(
            sanitize_single_line("  Swim\twith \n\n sharks\u{0007} ", 100),
            "Swim with sharks"
        );
        assert_eq!(sanitize_single_line("abc def", 4), "abc");
        let once = sanitize_single_line(" a \t b ", 50);
        assert_eq!(sanitize_single_line(&once, 50), once);
    }

    #[test]
    fn multiline_keeps_single_blank_lines() {
        let raw = "First day.\r\n\r\n\r\n\r\nSecond\tday.   \n\u{0000}Third";
        assert_eq!(
            sanitize_multiline(raw, 1_000),
            "First day.\n\nSecond day.\nThird"
        );
        let once = sanitize_multiline(raw, 1_000);
        assert_eq!(sanitize_multiline(&once, 1_000), once);
        assert_eq!(sanitize_multiline("\n\n  \n", 10), "");
    }

    #[test]
    fn strips_tags_but_keeps_comparisons() {
        assert_eq!(
            strip_html_tags("<p>Hike <b>Kilimanjaro</b></p><script>x</script>"),
            "Hike Kilimanjarox"
        );
        assert_eq!(strip_html_tags("3 < 5 and 7 > 2"), "3 < 5 and 7 > 2");
        assert_eq!(strip_html_tags("unclosed <b"), "unclosed <b");
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like_pattern("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like_pattern("paris"), "paris");
    }

    #[test]
    fn storage_file_names() {
        assert_eq!(
            sanitize_storage_file_name("../../etc/My Summit Photo!.JPG"),
            "My-Summit-Photo.jpg"
        );
        assert_eq!(sanitize_storage_file_name("C:\\pics\\beach.png"), "beach.png");
        assert_eq!(sanitize_storage_file_name("???.webp"), "file.webp");
        assert_eq!(sanitize_storage_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_storage_file_name(""), "file");
        let once = sanitize_storage_file_name("weird name (1).jpeg");
        assert_eq!(once, "weird-name-1.jpeg");
        assert_eq!(sanitize_storage_file_name(&once), once);
    }
}
