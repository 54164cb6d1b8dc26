//! HTML structure invariants for whole documents.
//!
//! Validates the printed document without a browser:
//! - Doctype and page scaffolding present
//! - Every container tag closed at its own indentation
//! - Void elements never closed
//! - Raw table and code lines spliced verbatim

use dash_markup::{Attributes, DataTable, HtmlDocument, SvgArtifact};
use regex::Regex;
use serde_json::json;

const VOID_TAGS: &[&str] = &["hr", "img", "meta"];

fn sample_document() -> HtmlDocument {
    let mut doc = HtmlDocument::new("Quarterly <summary>");
    doc.title("Quarterly summary");
    doc.add_style(".c4 { width: 40%; }");

    let row = doc.new_row();
    {
        let mut section = doc.section(row);
        section.title("Numbers");
        section.text("first line\nsecond & last");
        section.hr();
        section.code("fn main() {\n    println!(\"hi\");\n}");
    }

    let (left, right) = doc.split(4).unwrap();
    doc.section(left).text("left column");
    doc.section(right)
        .figure(&SvgArtifact::new("<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"))
        .unwrap();

    let table = DataTable::new(["k", "v"]).with_row(vec![json!("a"), json!(1)]);
    doc.table(&table);
    doc.new_label("hr", Attributes::new().klass("end"));
    doc
}

/// Walk rendered lines with a tag stack, returning an error on mismatch.
fn check_balanced(lines: &[String]) -> Result<(), String> {
    let tag_re = Regex::new(r"^(\s*)<(/?)([a-z][a-z0-9]*)[^>]*>$").unwrap();
    let mut stack: Vec<(String, usize)> = Vec::new();
    for line in lines {
        let Some(caps) = tag_re.captures(line) else {
            continue;
        };
        let indent = caps[1].len();
        let closing = &caps[2] == "/";
        let tag = caps[3].to_string();
        if closing {
            let (open, open_indent) = stack
                .pop()
                .ok_or_else(|| format!("unexpected close {tag}"))?;
            if open != tag || open_indent != indent {
                return Err(format!("close {tag}@{indent} does not match {open}@{open_indent}"));
            }
        } else if !VOID_TAGS.contains(&tag.as_str()) {
            stack.push((tag, indent));
        }
    }
    if stack.is_empty() {
        Ok(())
    } else {
        Err(format!("unclosed tags: {stack:?}"))
    }
}

mod structure {
    use super::*;

    #[test]
    fn test_doctype_and_root() {
        let html = sample_document().to_html();
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_tags_balanced() {
        let lines = sample_document().render(0);
        check_balanced(&lines).unwrap();
    }

    #[test]
    fn test_void_elements_never_closed() {
        let html = sample_document().to_html();
        for tag in VOID_TAGS {
            assert!(!html.contains(&format!("</{tag}>")), "{tag} must not be closed");
        }
    }

    #[test]
    fn test_indentation_is_even() {
        for line in sample_document().render(0) {
            let indent = line.len() - line.trim_start_matches(' ').len();
            assert_eq!(indent % 2, 0, "odd indentation in {line:?}");
        }
    }

    #[test]
    fn test_render_idempotent() {
        let doc = sample_document();
        assert_eq!(doc.render(0), doc.render(0));
        assert_eq!(doc.to_html(), doc.to_html());
    }
}

mod content {
    use super::*;

    #[test]
    fn test_title_escaped_in_head() {
        let html = sample_document().to_html();
        assert!(html.contains("Quarterly &lt;summary&gt;"));
        assert!(!html.contains("<summary>"));
    }

    #[test]
    fn test_section_heading_levels() {
        let html = sample_document().to_html();
        let h1 = Regex::new(r"(?m)^\s*<h1>$").unwrap();
        let h2 = Regex::new(r"(?m)^\s*<h2>$").unwrap();
        assert_eq!(h1.find_iter(&html).count(), 1);
        assert_eq!(h2.find_iter(&html).count(), 1);
    }

    #[test]
    fn test_text_paragraph_escaped() {
        let html = sample_document().to_html();
        assert!(html.contains("first line<br>second &amp; last"));
    }

    #[test]
    fn test_code_lines_verbatim() {
        let html = sample_document().to_html();
        assert!(html.contains(r#"<code class="rust">"#));
        assert!(html.contains(r#"    println!("hi");"#));
    }

    #[test]
    fn test_split_columns() {
        let html = sample_document().to_html();
        assert!(html.contains(r#"<div class="row">"#));
        assert!(html.contains(r#"<div class="c4">"#));
        assert!(html.contains(r#"<div class="c6">"#));
    }

    #[test]
    fn test_table_lines_spliced() {
        let html = sample_document().to_html();
        assert!(html.contains(r#"<table class="dataframe">"#));
        assert!(html.contains("<tr><td>a</td><td>1</td></tr>"));
    }

    #[test]
    fn test_figure_inline() {
        let html = sample_document().to_html();
        let img = Regex::new(r#"<img src="data:image/svg\+xml;base64,[A-Za-z0-9+/=]+">"#).unwrap();
        assert!(img.is_match(&html));
    }

    #[test]
    fn test_label_class_alias() {
        let html = sample_document().to_html();
        assert!(html.contains(r#"<hr class="end">"#));
        assert!(!html.contains("klass"));
    }
}
