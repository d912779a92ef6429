use super::Separator;

const SPACED: &[char] = &['+', '-', '(', ')'];
const TIMES: &[char] = &['*', 'x'];

/// Splits off everything after the first `#` as the title.
pub(crate) fn split_title(s: &str) -> (&str, Option<&str>) {
    match s.split_once('#') {
        Some((body, title)) => {
            let title = title.trim();
            (body, (!title.is_empty()).then_some(title))
        }
        None => (s, None),
    }
}

/// Spaces out operators and splits on whitespace. Words starting with the escape,
/// such as a leading `/roll`, are dropped; a lone escape is kept.
pub(crate) fn tokenize(body: &str, escape: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(body.len() * 2);
    for c in body.chars() {
        if SPACED.contains(&c) {
            spaced.extend([' ', c, ' ']);
        } else if TIMES.contains(&c) {
            spaced.push_str(" * ");
        } else {
            spaced.push(c);
        }
    }

    spaced
        .split_whitespace()
        .filter(|p| escape.is_empty() || !p.starts_with(escape) || *p == escape)
        .map(str::to_string)
        .collect()
}

/// Splits a list of rolls on whichever of `;` and `,` comes first. Blank entries are
/// dropped. Returns `None` when there is nothing to split.
pub(crate) fn split_multi(s: &str) -> Option<(Separator, Vec<String>)> {
    let c = s.chars().find(|c| matches!(c, ';' | ','))?;
    let separator = if c == ';' {
        Separator::Semicolon
    } else {
        Separator::Comma
    };
    let fragments = s
        .split(c)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    Some((separator, fragments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title() {
        assert_eq!(split_title("1d20 + 5 # hit"), ("1d20 + 5 ", Some("hit")));
        assert_eq!(split_title("1d20 #a #b"), ("1d20 ", Some("a #b")));
        assert_eq!(split_title("1d20 #  "), ("1d20 ", None));
        assert_eq!(split_title("1d20"), ("1d20", None));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("1d20+5", "/"), ["1d20", "+", "5"]);
        assert_eq!(tokenize("(1d6-1)x2", "/"), ["(", "1d6", "-", "1", ")", "*", "2"]);
        assert_eq!(tokenize("  2d6   *3 ", "/"), ["2d6", "*", "3"]);
        assert_eq!(tokenize("/roll 1d20 + 2", "/"), ["1d20", "+", "2"]);
        assert_eq!(tokenize("!r d20", "!"), ["d20"]);
        assert_eq!(tokenize("4 / 2", "/"), ["4", "/", "2"]);
        assert_eq!(tokenize("/r d20", ""), ["/r", "d20"]);
    }

    #[test]
    fn test_split_multi() {
        assert_eq!(split_multi("1d20"), None);
        assert_eq!(
            split_multi("1d6;1d8, 2"),
            Some((Separator::Semicolon, vec!["1d6".to_string(), "1d8, 2".to_string()]))
        );
        assert_eq!(
            split_multi("a, b; c"),
            Some((Separator::Comma, vec!["a".to_string(), "b; c".to_string()]))
        );
        assert_eq!(
            split_multi("1d20;"),
            Some((Separator::Semicolon, vec!["1d20".to_string()]))
        );
    }
}
