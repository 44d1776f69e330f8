//! Document-level tests: fixture files are parsed and re-serialized, and
//! the result compared with the expected output stored next to them.
//!
//! Each directory under `tests/fixtures/` holds an `input.xml` and an
//! `expected.xml` in `Indent::Default` layout.

use std::fs;
use std::path::{Path, PathBuf};

use xp_xml::{
    CData, Error, FileInputSource, Indent, Node, PCData, StreamInputSource, Tree, TreeInputSource,
    XmlParser,
};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Lists fixture directories that contain both input and expected files.
fn discover_fixtures() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.join("input.xml").exists() && p.join("expected.xml").exists())
                .collect()
        })
        .unwrap_or_default();
    dirs.sort();
    dirs
}

#[test]
fn test_fixtures() {
    let fixtures = discover_fixtures();
    assert!(!fixtures.is_empty(), "No fixtures found");

    for dir in fixtures {
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        let tree = Tree::from_file(dir.join("input.xml"))
            .unwrap_or_else(|e| panic!("{}: parse failed: {}", name, e));
        let expected = fs::read_to_string(dir.join("expected.xml")).unwrap();
        assert_eq!(tree.get_source(Indent::Default), expected, "{}", name);
    }
}

#[test]
fn test_fixture_output_is_stable() {
    for dir in discover_fixtures() {
        let expected = fs::read_to_string(dir.join("expected.xml")).unwrap();
        let reparsed = Tree::from_string(&expected).unwrap();
        assert_eq!(reparsed.get_source(Indent::Default), expected, "{}", dir.display());
    }
}

#[test]
fn test_file_input_source() {
    let path = fixtures_dir().join("catalog").join("input.xml");
    let tree = Tree::from_source(FileInputSource::new(&path)).unwrap();
    assert_eq!(tree.root().name(), "catalog");
    let product = tree.root().child("product").unwrap();
    assert_eq!(product.attribute("currency"), Some("EUR"));
    assert_eq!(
        product.child("name").unwrap().content().as_str(),
        Some("Widget & Co")
    );
}

fn rss() -> Tree {
    let mut tree = Tree::with_root_name("rss");
    tree.root_mut().set_attribute("version", "2.0");
    let channel = tree.add_child(Node::new("channel"));
    channel.add_child(Node::with_content("title", "XP Framework").unwrap());
    channel.add_child(
        Node::new("link")
            .with_attribute("href", "http://xp-framework.net/")
            .with_attribute("rel", "alternate")
            .with_attribute("type", "text/html"),
    );
    channel.add_child(Node::with_content("description", CData::new("<p>Release ]]> notes</p>")).unwrap());
    channel.add_child(Node::with_content("summary", PCData::new("A <b>bold</b> move")).unwrap());
    channel.add_child(Node::with_content("items", 12.0).unwrap());
    tree
}

#[test]
fn test_constructed_document_default() {
    assert_eq!(
        rss().get_source(Indent::Default),
        concat!(
            "<rss version=\"2.0\">\n",
            "  <channel>  \n",
            "    <title>XP Framework</title>\n",
            "    <link\n",
            "     href=\"http://xp-framework.net/\"\n",
            "     rel=\"alternate\"\n",
            "     type=\"text/html\"\n",
            "    />\n",
            "    <description><![CDATA[<p>Release ]]]]><![CDATA[> notes</p>]]></description>\n",
            "    <summary>A <b>bold</b> move</summary>\n",
            "    <items>12</items>\n",
            "  </channel>\n",
            "</rss>\n",
        )
    );
}

#[test]
fn test_constructed_document_wrapped() {
    assert_eq!(
        rss().get_source(Indent::Wrapped),
        concat!(
            "<rss version=\"2.0\">\n",
            "  <channel>\n",
            "    <title>\n",
            "      XP Framework\n",
            "    </title>\n",
            "    <link\n",
            "     href=\"http://xp-framework.net/\"\n",
            "     rel=\"alternate\"\n",
            "     type=\"text/html\"\n",
            "    />\n",
            "    <description>\n",
            "      <![CDATA[<p>Release ]]]]><![CDATA[> notes</p>]]>\n",
            "    </description>\n",
            "    <summary>\n",
            "      A <b>bold</b> move\n",
            "    </summary>\n",
            "    <items>\n",
            "      12\n",
            "    </items>  \n",
            "  </channel>\n",
            "</rss>\n",
        )
    );
}

#[test]
fn test_constructed_document_none() {
    assert_eq!(
        rss().get_source(Indent::None),
        concat!(
            "<rss version=\"2.0\"><channel><title>XP Framework</title>",
            "<link href=\"http://xp-framework.net/\" rel=\"alternate\" type=\"text/html\"></link>",
            "<description><![CDATA[<p>Release ]]]]><![CDATA[> notes</p>]]></description>",
            "<summary>A <b>bold</b> move</summary>",
            "<items>12</items></channel></rss>",
        )
    );
}

#[test]
fn test_cdata_survives_reparse() {
    let tree = Tree::from_source(TreeInputSource::new(&rss())).unwrap();
    let channel = tree.root().child("channel").unwrap();
    assert_eq!(
        channel.child("description").unwrap().content().as_str(),
        Some("<p>Release ]]> notes</p>")
    );
    assert_eq!(channel.child("summary").unwrap().content().as_str(), Some(" move"));
    assert_eq!(channel.child("summary").unwrap().num_children(), 1);
}

#[test]
fn test_declaration_and_encoding() {
    let tree = Tree::with_root(Node::with_content("name", "Ärger").unwrap()).with_encoding("ISO-8859-1");
    let mut out = Vec::new();
    tree.write_to(&mut out, Indent::Default, true).unwrap();
    assert_eq!(
        out,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<name>\xc4rger</name>\n"
    );

    let reparsed = Tree::from_source(StreamInputSource::new(&out[..])).unwrap();
    assert_eq!(reparsed.root().content().as_str(), Some("Ärger"));
}

#[test]
fn test_parse_errors_are_format_errors() {
    let cases = [
        ("", 3),
        ("<a>", 3),
        ("<a/><b/>", 9),
        ("<a></b>", 7),
        ("<a x=\"1\" x=\"2\"/>", 8),
        ("<a>&undefined;</a>", 11),
    ];
    for (xml, code) in cases {
        match Tree::from_string(xml) {
            Err(Error::Format(e)) => assert_eq!(e.code(), code, "{:?}: {}", xml, e),
            other => panic!("{:?}: expected format error, got {:?}", xml, other.map(|t| t.to_string())),
        }
    }
}

#[test]
fn test_parser_reuse_across_documents() {
    let parser = XmlParser::new();
    let mut tree = Tree::new();
    for i in 0..3 {
        parser
            .parse_str(&mut tree, &format!("<run id=\"{}\"><step/></run>", i), None)
            .unwrap();
        assert_eq!(tree.root().attribute("id"), Some(i.to_string().as_str()));
        assert_eq!(tree.root().num_children(), 1);
    }
}
