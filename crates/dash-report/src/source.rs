//! Source excerpts echoed above each recorded step.

/// Strip a definition's first and last line and dedent the body.
///
/// The common indentation is the minimum leading whitespace over non-blank
/// lines; blank lines are kept as empty lines. Input with fewer than three
/// lines has no body and yields an empty excerpt.
pub fn clean_source(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.len() < 3 {
        return String::new();
    }
    let body = &lines[1..lines.len() - 1];
    let indent = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);
    body.iter()
        .map(|line| match line.char_indices().nth(indent) {
            Some((at, _)) if !line.trim().is_empty() => &line[at..],
            _ => "",
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of leading whitespace characters.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
