use super::{line_start, source_offset, source_position, SourceRange};
use crate::markdown::render::{render_plain, Renderer};
use crate::selection::Position;

#[test]
fn test_parse_and_display_range() {
    let range: SourceRange = "1:3-2:6".parse().unwrap();
    assert_eq!(
        range,
        SourceRange {
            start_row: 1,
            start_column: 3,
            end_row: 2,
            end_column: 6,
        }
    );
    assert_eq!(range.to_string(), "1:3-2:6");
    assert!("1:3".parse::<SourceRange>().is_err());
    assert!("a:b-c:d".parse::<SourceRange>().is_err());
}

#[test]
fn test_line_start() {
    let source = "ab\ncd\n\nef";
    assert_eq!(line_start(source, 0), 0);
    assert_eq!(line_start(source, 1), 3);
    assert_eq!(line_start(source, 2), 6);
    assert_eq!(line_start(source, 3), 7);
    assert_eq!(line_start(source, 9), 7);
}

#[test]
fn test_range_offsets() {
    let source = "ab\ncd";
    let range: SourceRange = "1:2-2:3".parse().unwrap();
    assert_eq!(range.offsets(source), (1, 5));
    assert_eq!(SourceRange::whole(source).offsets(source), (0, 5));
}

#[test]
fn test_offset_after_previous_sibling() {
    let source = "a *b* c";
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render(source);
    let (node, offset) = doc.hit(0, 4).unwrap();
    assert_eq!(source_offset(source, &doc, node, offset), 6);
    assert_eq!(source_position(source, &doc, node, offset), Position::new(0, 6));
}

#[test]
fn test_offset_inside_element() {
    let source = "a *b* c";
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render(source);
    let (node, offset) = doc.hit(0, 2).unwrap();
    assert_eq!(source_offset(source, &doc, node, offset), 3);
}

#[test]
fn test_offset_on_later_line() {
    let source = "first\nsecond";
    let doc = render_plain(source);
    let (node, offset) = doc.hit(1, 3).unwrap();
    assert_eq!(source_position(source, &doc, node, offset), Position::new(1, 3));
}

#[test]
fn test_repeated_text_matches_first_occurrence() {
    let source = "x *y* y";
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render(source);
    let (node, offset) = doc.hit(0, 2).unwrap();
    assert_eq!(source_offset(source, &doc, node, offset), 3);
}

#[test]
fn test_multibyte_text() {
    let source = "é *ü* z";
    let mut renderer = Renderer::new().unwrap();
    let doc = renderer.render(source);
    let (node, offset) = doc.hit(0, 4).unwrap();
    let byte = source_offset(source, &doc, node, offset);
    assert_eq!(&source[byte..], "z");
    assert_eq!(source_position(source, &doc, node, offset), Position::new(0, 6));
}
