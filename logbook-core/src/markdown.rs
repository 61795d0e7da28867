//! Line-level markdown helpers shared by the log parser and the renderer.
//!
//! This is not a CommonMark implementation. It classifies lines the way the
//! journal's hand-written logs use them: ATX headings, list items, fenced code,
//! paragraphs, plus a few inline cleanups (links, emphasis, checkboxes).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ResourceLink;

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(!?)\[([^\]]*)\]\((?:<([^>]*)>|((?:[^()\s]|\([^()\s]*\))+))(?:\s+"[^"]*")?\)"#)
        .expect("valid link regex")
});
static AUTOLINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<((?:https?|ftp)://[^>\s]+)>").expect("valid autolink regex"));
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[ xX]\]\s*").expect("valid checkbox regex"));
static UNDERSCORE_EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\w])_{1,2}([^_]+?)_{1,2}([^\w]|$)").expect("valid emphasis regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: u8, text: &'a str },
    ListItem { depth: usize, text: &'a str },
    Text(&'a str),
    /// Fence delimiters and everything between them.
    Code,
    Blank,
}

/// Classify every line of `document`, resolving fenced code blocks.
pub fn classify_lines(document: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut fence: Option<&str> = None;

    for raw in document.lines() {
        let trimmed = raw.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push(Line::Code);
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            out.push(Line::Code);
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            out.push(Line::Code);
            continue;
        }
        out.push(classify(raw));
    }
    out
}

/// Classify a single line outside any code fence.
pub fn classify(raw: &str) -> Line<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_thematic_break(trimmed) {
        return Line::Blank;
    }
    if let Some(heading) = heading(raw) {
        return heading;
    }
    if let Some(item) = list_item(raw) {
        return item;
    }
    let text = trimmed.trim_start_matches('>').trim();
    if text.is_empty() {
        Line::Blank
    } else {
        Line::Text(text)
    }
}

fn heading(raw: &str) -> Option<Line<'_>> {
    let indent = raw.len() - raw.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &raw[indent..];
    let level = rest.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
        return None;
    }
    let text = after.trim().trim_end_matches('#').trim_end();
    Some(Line::Heading {
        level: level as u8,
        text,
    })
}

fn list_item(raw: &str) -> Option<Line<'_>> {
    let body = raw.trim_start();
    let indent: usize = raw[..raw.len() - body.len()]
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();

    let rest = if let Some(rest) = body
        .strip_prefix("- ")
        .or_else(|| body.strip_prefix("* "))
        .or_else(|| body.strip_prefix("+ "))
    {
        rest
    } else {
        let digits = body.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let after = &body[digits..];
        after
            .strip_prefix(". ")
            .or_else(|| after.strip_prefix(") "))?
    };

    Some(Line::ListItem {
        depth: indent / 2,
        text: rest.trim(),
    })
}

fn is_thematic_break(trimmed: &str) -> bool {
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|m| compact.chars().all(|c| c == *m))
}

/// Inline markdown reduced to plain text: links become their labels, images,
/// emphasis, code spans and task checkboxes disappear, whitespace collapses.
pub fn plain_text(text: &str) -> String {
    let text = CHECKBOX_RE.replace(text.trim(), "");
    let text = LINK_RE.replace_all(&text, |caps: &regex::Captures| {
        if &caps[1] == "!" {
            String::new()
        } else {
            caps[2].to_string()
        }
    });
    let text = AUTOLINK_RE.replace_all(&text, "$1");

    // Odd segments are code spans and keep their underscores and stars.
    let mut out = String::with_capacity(text.len());
    for (i, segment) in text.split('`').enumerate() {
        if i % 2 == 1 {
            out.push_str(segment);
        } else {
            out.push_str(&strip_emphasis(segment));
        }
    }
    WHITESPACE_RE.replace_all(out.trim(), " ").into_owned()
}

fn strip_emphasis(text: &str) -> String {
    let text = text.replace("**", "").replace('*', "").replace("~~", "");
    UNDERSCORE_EMPHASIS_RE
        .replace_all(&text, "$1$2$3")
        .into_owned()
}

/// Every inline link (images excluded) and autolink in `text`, in order.
pub fn links(text: &str) -> Vec<ResourceLink> {
    let mut found: Vec<(usize, ResourceLink)> = Vec::new();

    for caps in LINK_RE.captures_iter(text) {
        if &caps[1] == "!" {
            continue;
        }
        let Some(href) = caps.get(3).or_else(|| caps.get(4)) else {
            continue;
        };
        let href = href.as_str().trim();
        if href.is_empty() {
            continue;
        }
        let label = plain_text(&caps[2]);
        let label = if label.is_empty() { href.to_string() } else { label };
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        found.push((start, ResourceLink::new(label, href)));
    }

    for caps in AUTOLINK_RE.captures_iter(text) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        found.push((start, ResourceLink::new(&caps[1], &caps[1])));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, link)| link).collect()
}

/// Trim separators, whitespace and decorative symbols (emoji, bullets, dashes)
/// from both ends of a title-like string.
pub fn trim_decoration(text: &str) -> String {
    const KEEP_LEADING: &[char] = &['(', '[', '"', '\'', '#', '$', '@'];
    const KEEP_TRAILING: &[char] = &[')', ']', '"', '\'', '?', '!', '+', '#', '%'];

    let text = text.trim_start_matches(|c: char| !c.is_alphanumeric() && !KEEP_LEADING.contains(&c));
    let text = text.trim_end_matches(|c: char| !c.is_alphanumeric() && !KEEP_TRAILING.contains(&c));
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Escape a value for a single markdown table cell.
pub fn table_cell(text: &str) -> String {
    let flat = WHITESPACE_RE.replace_all(text.trim(), " ");
    flat.replace('|', "\\|")
}

/// Percent-encode each segment of a `/`-separated relative path for use as a link.
pub fn link_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_headings() {
        assert_eq!(
            classify("# Day 2 – Control Flow 🎯"),
            Line::Heading {
                level: 1,
                text: "Day 2 – Control Flow 🎯"
            }
        );
        assert_eq!(
            classify("### Topics ###"),
            Line::Heading {
                level: 3,
                text: "Topics"
            }
        );
        assert_eq!(classify("#hashtag"), Line::Text("#hashtag"));
    }

    #[test]
    fn test_classify_list_items_and_depth() {
        assert_eq!(
            classify("- for loops"),
            Line::ListItem {
                depth: 0,
                text: "for loops"
            }
        );
        assert_eq!(
            classify("    * nested"),
            Line::ListItem {
                depth: 2,
                text: "nested"
            }
        );
        assert_eq!(
            classify("2. second"),
            Line::ListItem {
                depth: 0,
                text: "second"
            }
        );
        assert_eq!(classify("**Focus:** OOP"), Line::Text("**Focus:** OOP"));
        assert_eq!(classify("---"), Line::Blank);
    }

    #[test]
    fn test_fenced_code_is_opaque() {
        let doc = "# Day 1\n```python\n# not a heading\n```\n- item";
        let lines = classify_lines(doc);
        assert_eq!(lines[1], Line::Code);
        assert_eq!(lines[2], Line::Code);
        assert_eq!(lines[3], Line::Code);
        assert_eq!(
            lines[4],
            Line::ListItem {
                depth: 0,
                text: "item"
            }
        );
    }

    #[test]
    fn test_plain_text_strips_inline_markup() {
        assert_eq!(
            plain_text("[x] **Loops** with `range()` and [docs](https://x.dev)"),
            "Loops with range() and docs"
        );
        assert_eq!(plain_text("__bold__ and _em_"), "bold and em");
        assert_eq!(plain_text("day-01_python_basics.py"), "day-01_python_basics.py");
        assert_eq!(plain_text("`__init__` and **self**"), "__init__ and self");
        assert_eq!(plain_text("![diagram](img.png) Sets"), "Sets");
    }

    #[test]
    fn test_links_extracts_in_order() {
        let found = links(
            "See [Lists](Day%2004/day-04_lists.py), ![img](a.png) and <https://docs.python.org>",
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].label, "Lists");
        assert_eq!(found[0].target, "Day 04/day-04_lists.py");
        assert_eq!(found[1].href, "https://docs.python.org");
    }

    #[test]
    fn test_links_angle_bracket_href() {
        let found = links("[Tuples](<Day 05/day-05_tuples.py>)");
        assert_eq!(found[0].href, "Day 05/day-05_tuples.py");
    }

    #[test]
    fn test_links_href_with_balanced_parens() {
        let text = "[Foo](https://en.wikipedia.org/wiki/Foo_(bar)) page";
        let found = links(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].href, "https://en.wikipedia.org/wiki/Foo_(bar)");
        assert_eq!(plain_text(text), "Foo page");
    }

    #[test]
    fn test_trim_decoration() {
        assert_eq!(trim_decoration("– Control Flow 🎯"), "Control Flow");
        assert_eq!(trim_decoration("✅ C++ basics!"), "C++ basics!");
        assert_eq!(trim_decoration(" : Exceptions (part 1) "), "Exceptions (part 1)");
        assert_eq!(trim_decoration("🚀"), "");
    }

    #[test]
    fn test_table_cell_and_link_path() {
        assert_eq!(table_cell("a | b\nc"), "a \\| b c");
        assert_eq!(link_path("Week 01/README.md"), "Week%2001/README.md");
    }
}
