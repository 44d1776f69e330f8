//! Property tests: serializing without indentation and parsing the result
//! back yields the same tree.

use proptest::prelude::*;
use xp_xml::{Attributes, CData, Indent, Node, Tree};

fn attributes() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map("[a-z]{1,4}", "[ -~]{0,8}", 0..4)
        .prop_map(|map| map.into_iter().collect())
}

fn leaf() -> impl Strategy<Value = Node> {
    ("[a-z][a-z0-9]{0,5}", attributes(), "[ -~]{0,12}").prop_map(|(name, attributes, text)| {
        let mut node = Node::with_content(name, text).unwrap();
        node.set_attributes(attributes);
        node
    })
}

/// Trees up to three levels deep. Parsed elements with children only keep
/// the text after their last child, so inner nodes carry empty text.
fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        (
            "[a-z][a-z0-9]{0,5}",
            attributes(),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(name, attributes, children)| {
                let mut node = Node::with_content(name, "").unwrap();
                node.set_attributes(attributes);
                node.set_children(children);
                node
            })
    })
}

proptest! {
    #[test]
    fn test_unindented_round_trip(node in tree()) {
        let source = node.get_source(Indent::None);
        let parsed = Tree::from_string(&source).unwrap();
        prop_assert_eq!(parsed.root(), &node);
    }

    #[test]
    fn test_escaped_text_parses_back(text in "[ -~]{0,40}") {
        let node = Node::with_content("t", text.as_str()).unwrap();
        let parsed = Tree::from_string(&node.get_source(Indent::Default)).unwrap();
        prop_assert_eq!(parsed.root().content().as_str(), Some(text.trim_matches(' ')));
    }

    #[test]
    fn test_cdata_parses_back(text in "[ -;=-~]{0,40}") {
        let node = Node::with_content("t", CData::new(text.as_str())).unwrap();
        let source = node.get_source(Indent::None);
        prop_assert_eq!(
            source.matches("<![CDATA[").count(),
            1 + text.matches("]]>").count()
        );
        let parsed = Tree::from_string(&source).unwrap();
        prop_assert_eq!(parsed.root().content().as_str(), Some(text.as_str()));
    }
}
