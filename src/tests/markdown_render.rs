use super::{render_plain, Renderer, Style};

fn line_text(line: &[super::Segment]) -> String {
    line.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_plain_text_is_one_leaf() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("just words");
    let root = doc.node(doc.root()).unwrap();
    assert_eq!(root.style, Some(Style::Paragraph));
    assert_eq!(root.children.len(), 1);
    assert_eq!(doc.text_content(doc.root()), "just words");
}

#[test]
fn test_emphasis_drops_delimiters() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("a *b* c");
    assert_eq!(doc.text_content(doc.root()), "a b c");
    let root = doc.node(doc.root()).unwrap();
    assert_eq!(root.children.len(), 3);
    let emphasis = doc.node(root.children[1]).unwrap();
    assert_eq!(emphasis.style, Some(Style::Emphasis));
    assert_eq!(emphasis.source.unwrap().to_string(), "1:3-1:6");
    let tail = doc.node(root.children[2]).unwrap();
    assert_eq!(tail.previous, Some(root.children[1]));
    assert_eq!(tail.parent, Some(doc.root()));
}

#[test]
fn test_code_span() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("run `cargo` now");
    assert_eq!(doc.text_content(doc.root()), "run cargo now");
    let lines = doc.lines();
    let code = lines[0].iter().find(|s| s.text == "cargo").unwrap();
    assert_eq!(code.styles, vec![Style::Paragraph, Style::Code]);
}

#[test]
fn test_link_hides_destination() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("see [docs](https://example.com) here");
    let text = doc.text_content(doc.root());
    assert!(text.contains("docs"));
    assert!(!text.contains("example.com"));
    let lines = doc.lines();
    assert!(lines[0]
        .iter()
        .any(|s| s.text.contains("docs") && s.styles.contains(&Style::Link)));
}

#[test]
fn test_lines_split_on_newlines() {
    let doc = render_plain("one\ntwo\n");
    let lines = doc.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(line_text(&lines[0]), "one");
    assert_eq!(line_text(&lines[1]), "two");
    assert!(lines[2].is_empty());
    assert_eq!(lines[1][0].offset, 4);
}

#[test]
fn test_hit_resolves_leaf_and_offset() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("a *b* c");
    let root = doc.node(doc.root()).unwrap();
    let children = root.children.clone();
    let emphasis = doc.node(children[1]).unwrap();
    assert_eq!(doc.hit(0, 0), Some((children[0], 0)));
    assert_eq!(doc.hit(0, 2), Some((emphasis.children[0], 0)));
    assert_eq!(doc.hit(0, 4), Some((children[2], 1)));
    assert_eq!(doc.hit(0, 99), Some((children[2], 2)));
    assert_eq!(doc.hit(1, 0), None);
}

#[test]
fn test_empty_source() {
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render("");
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.lines(), vec![Vec::new()]);
    assert_eq!(doc.hit(0, 0), None);
}

#[test]
fn test_nested_spans_keep_inner_text() {
    let mut renderer = Renderer::new().unwrap();
    assert_eq!(
        line_text(&renderer.render("**a *b* c**").lines()[0]),
        "a b c"
    );
    assert_eq!(line_text(&renderer.render("***a***").lines()[0]), "a");
    assert_eq!(line_text(&renderer.render("é*ü*ß").lines()[0]), "éüß");

    let doc = renderer.render("[*x*](y) `z`");
    let lines = doc.lines();
    assert_eq!(line_text(&lines[0]), "x z");
    let x = lines[0].iter().find(|s| s.text == "x").unwrap();
    assert!(x.styles.contains(&Style::Link));
    assert!(x.styles.contains(&Style::Emphasis));
}
