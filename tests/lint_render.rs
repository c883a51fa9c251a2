//! Lint: every `[X]` key hint drawn by a `render.rs` must be tappable.
//!
//! Hints go through `push_clickable()` or the `push_hint()` helper that wraps
//! it. A plain `cl.push(Line::from(" [B] Fruit Snack"))` shows the hint but
//! leaves nothing to tap on a phone.
//!
//! The scan follows each `.push(` call to its closing parenthesis, so a call
//! split over several lines is checked as a whole, and only string literals
//! are inspected (`chunks[0]` is not a hint).

use std::fs;
use std::path::Path;

/// `[I]`, `[1]`, `[-]` and friends: one key between brackets.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || b"-=!~|".contains(&w[1]))
    })
}

/// String literal contents of the call starting at the beginning of `text`,
/// up to its matching close paren.
fn call_literals(text: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let mut depth = 0i32;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            '"' => {
                let mut lit = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => lit.push(c),
                    }
                }
                literals.push(lit);
            }
            _ => {}
        }
    }
    literals
}

/// Non-clickable `.push(` calls whose literals carry a key hint, as
/// `(line_number, first_line_of_call)`.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        let start = offset;
        offset += line.len() + 1;

        if line.trim_start().starts_with("//") {
            continue;
        }
        let Some(at) = line.find(".push(") else {
            continue;
        };
        let call = &source[start + at + ".push".len()..];
        if call_literals(call).iter().any(|l| contains_bracket_key(l)) {
            violations.push((index + 1, line.trim().to_string()));
        }
    }

    violations
}

fn visit_render_files(dir: &Path, violations: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            visit_render_files(&path, violations);
        } else if path.file_name().is_some_and(|n| n == "render.rs") {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            for (line_num, line) in find_bracket_key_in_push(&source) {
                violations.push(format!("  {}:{}: {}", path.display(), line_num, line));
            }
        }
    }
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let mut violations = Vec::new();
    visit_render_files(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut violations);

    assert!(
        violations.is_empty(),
        "key hints pushed as plain lines; use push_clickable() or push_hint():\n{}",
        violations.join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [B] Fruit Snack  [A] Dispenser"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn detects_hint_in_multiline_push() {
        let source = r#"
    cl.push(Line::from(Span::styled(
        " [S] Slide to study",
        Style::default(),
    )));
"#;
        let violations = find_bracket_key_in_push(source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].0, 2);
    }

    #[test]
    fn allows_push_clickable_and_push_hint() {
        let clickable = r#"cl.push_clickable(Line::from(" [C] Write a paper"), WRITE_PAPER);"#;
        let hint = r#"push_hint(&mut cl, 'G', "[G] Graduate".to_string(), GRADUATE, true);"#;
        assert!(find_bracket_key_in_push(clickable).is_empty());
        assert!(find_bracket_key_in_push(hint).is_empty());
    }

    #[test]
    fn ignores_indexing_and_comments() {
        let source = r#"
    lines.push(Line::from(format!(" {} ", chunks[0])));
    // cl.push(Line::from(" [T] Auto snacks"));
"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn stops_at_the_closing_paren() {
        let source = r#"
    cl.push(Line::from("Papers"));
    push_hint(&mut cl, 'B', "[B] Fruit Snack".to_string(), ACTIVATE_BOOST, true);
"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[I]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[Tab]"));
        assert!(!contains_bracket_key("[{}]"));
        assert!(!contains_bracket_key("ab"));
    }
}
