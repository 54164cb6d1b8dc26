//! Property-based tests for tree rendering.
//!
//! Uses proptest to check rendering rules across many random trees and inputs.

use dash_markup::{Attributes, Canvas, Element, MarkupTree, CLASS_ALIAS};
use proptest::prelude::*;

fn plain_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}".prop_filter("reserved", |k| !k.contains("class") && !k.contains("klass"))
}

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{0,12}"
}

/// Random text and element children for a container.
#[derive(Debug, Clone)]
enum Shape {
    Text(String),
    Container(String, Vec<String>),
    Leaf(String),
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        "[a-z ]{0,16}".prop_map(Shape::Text),
        ("[a-z]{1,6}", prop::collection::vec("[a-z]{0,8}", 0..4))
            .prop_map(|(tag, texts)| Shape::Container(tag, texts)),
        "[a-z]{1,6}".prop_map(Shape::Leaf),
    ]
}

fn build(shapes: &[Shape]) -> (MarkupTree, dash_markup::NodeId) {
    let mut tree = MarkupTree::new();
    let root = tree.create_root(Element::container("div"));
    for shape in shapes {
        match shape {
            Shape::Text(text) => tree.push_text(root, text.clone()),
            Shape::Container(tag, texts) => {
                let mut element = Element::container(tag.clone());
                for text in texts {
                    element = element.text(text.clone());
                }
                tree.new_node(root, element);
            }
            Shape::Leaf(tag) => {
                tree.new_node(root, Element::leaf(tag.clone()));
            }
        }
    }
    (tree, root)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The class alias is substituted exactly once and other keys are kept verbatim.
    #[test]
    fn class_alias_substituted_once(
        before in prop::collection::vec((plain_key(), value()), 0..4),
        after in prop::collection::vec((plain_key(), value()), 0..4),
        class_value in value(),
    ) {
        let mut attrs = Attributes::new();
        let mut expected = String::new();
        for (k, v) in &before {
            attrs.push(k.clone(), v.clone());
            expected.push_str(&format!(" {k}=\"{v}\""));
        }
        attrs.push(CLASS_ALIAS, class_value.clone());
        expected.push_str(&format!(" class=\"{class_value}\""));
        for (k, v) in &after {
            attrs.push(k.clone(), v.clone());
            expected.push_str(&format!(" {k}=\"{v}\""));
        }

        let rendered = attrs.render();
        prop_assert_eq!(&rendered, &expected);
        prop_assert_eq!(rendered.matches(" class=\"").count(), 1);
    }

    /// Rendering a container twice yields identical lines.
    #[test]
    fn container_render_idempotent(shapes in prop::collection::vec(shape(), 0..12), indent in 0usize..5) {
        let (tree, root) = build(&shapes);
        let first = tree.render(root, indent);
        let second = tree.render(root, indent);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.first().unwrap().trim_start(), "<div>");
        prop_assert_eq!(first.last().unwrap().trim_start(), "</div>");
    }

    /// A leaf renders as one line without a closing tag, whatever it holds.
    #[test]
    fn leaf_renders_single_line(
        tag in "[a-z]{1,6}",
        texts in prop::collection::vec("[a-z]{0,8}", 0..5),
        indent in 0usize..5,
    ) {
        let mut tree = MarkupTree::new();
        let root = tree.create_root(Element::container("div"));
        let leaf = tree.new_node(root, Element::leaf(tag.clone()));
        for text in texts {
            tree.push_text(leaf, text);
        }
        tree.new_node(leaf, Element::container("span"));

        let lines = tree.render(leaf, indent);
        prop_assert_eq!(lines.len(), 1);
        prop_assert!(!lines[0].contains("</"));
        prop_assert_eq!(lines[0].trim_start(), format!("<{tag}>"));
    }

    /// Paragraph text never carries a literal line feed or unescaped markup.
    #[test]
    fn text_paragraph_single_line(msg in "[a-z<>&\"' \n]{0,40}") {
        let mut tree = MarkupTree::new();
        let root = tree.create_root_section("div", 1, Attributes::new());
        let p = Canvas::new(&mut tree, root).text(&msg);
        let lines = tree.render(p, 0);
        prop_assert_eq!(lines.len(), 3);
        prop_assert!(!lines[1].contains('\n'));
        let body = lines[1].trim_start().replace("<br>", "");
        prop_assert!(!body.contains('<'));
        prop_assert!(!body.contains('>'));
        prop_assert_eq!(lines[1].matches("<br>").count(), msg.matches('\n').count());
    }

    /// Split accepts widths up to ten and names columns by their share.
    #[test]
    fn split_width_classes(width in 0u32..=10) {
        let mut tree = MarkupTree::new();
        let root = tree.create_root_section("div", 1, Attributes::new());
        let (left, right) = Canvas::new(&mut tree, root).split(width).unwrap();
        let left_class = format!("c{width}");
        let right_class = format!("c{}", 10 - width);
        prop_assert_eq!(tree.attributes(left.node()).get(CLASS_ALIAS), Some(left_class.as_str()));
        prop_assert_eq!(tree.attributes(right.node()).get(CLASS_ALIAS), Some(right_class.as_str()));
    }

    /// Split rejects widths above ten.
    #[test]
    fn split_rejects_wide(width in 11u32..1000) {
        let mut tree = MarkupTree::new();
        let root = tree.create_root_section("div", 1, Attributes::new());
        prop_assert!(Canvas::new(&mut tree, root).split(width).is_err());
    }
}
