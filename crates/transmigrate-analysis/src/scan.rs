//! Small lexical helpers shared by the mapper and the body scanners.

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `s` on commas that are not nested inside `<>`, `()`, `[]` or `{}`.
/// Empty pieces are dropped and every piece is trimmed.
pub fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();
    let mut prev = '\0';
    for c in s.chars() {
        // `->` is member access, not a closing angle bracket.
        if c == '>' && prev == '-' {
            current.push(c);
            prev = c;
            continue;
        }
        prev = c;
        match c {
            '<' | '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                let piece = current.trim();
                if !piece.is_empty() {
                    parts.push(piece.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
    parts
}

/// Given `text` and the byte offset of an opening delimiter, return the
/// contents up to the matching closing delimiter and the offset just past it.
/// Returns `None` when the delimiters are unbalanced.
pub fn balanced_group(text: &str, open_at: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_at)?;
    let close = match open {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        b'<' => b'>',
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_at) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some((&text[open_at + 1..i], i + 1));
            }
        }
    }
    None
}

/// Index of the first `<` and the last `>` when they enclose a non-empty
/// range.
pub fn template_bounds(s: &str) -> Option<(usize, usize)> {
    let start = s.find('<')?;
    let end = s.rfind('>')?;
    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(
            split_top_level("string, vector<pair<int,int>>"),
            vec!["string", "vector<pair<int,int>>"]
        );
        assert_eq!(
            split_top_level("worker, std::ref(data), {1, 2}"),
            vec!["worker", "std::ref(data)", "{1, 2}"]
        );
        assert_eq!(
            split_top_level("run, this->queue, 3"),
            vec!["run", "this->queue", "3"]
        );
        assert!(split_top_level("  ").is_empty());
    }

    #[test]
    fn test_balanced_group() {
        let text = "t(run, f(a, b)) rest";
        let (inner, end) = balanced_group(text, 1).unwrap();
        assert_eq!(inner, "run, f(a, b)");
        assert_eq!(&text[end..], " rest");
        assert!(balanced_group("t(open", 1).is_none());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  unsigned \t long\n"), "unsigned long");
    }
}
