use super::{apply_selection, rows, CaretMemory, Position, Resolved, Selection};
use crate::item::ItemId;

#[test]
fn test_rows_always_has_one() {
    assert_eq!(rows(""), vec![""]);
    assert_eq!(rows("a\nbc\n"), vec!["a", "bc", ""]);
}

#[test]
fn test_clamp_row_and_column() {
    let text = "hello\nwo";
    assert_eq!(Position::new(0, 3).clamp(text), Position::new(0, 3));
    assert_eq!(Position::new(0, 99).clamp(text), Position::new(0, 5));
    assert_eq!(Position::new(7, 1).clamp(text), Position::new(1, 1));
    assert_eq!(Position::END.clamp(text), Position::new(1, 2));
    assert_eq!(Position::END.clamp(""), Position::START);
}

#[test]
fn test_columns_count_characters() {
    let text = "héllo";
    assert_eq!(Position::END.clamp(text), Position::new(0, 5));
    assert_eq!(Position::new(0, 2).to_offset(text), 3);
    assert_eq!(Position::from_offset(text, 3), Position::new(0, 2));
}

#[test]
fn test_offset_conversions() {
    let text = "ab\ncde\nf";
    assert_eq!(Position::from_offset(text, 0), Position::new(0, 0));
    assert_eq!(Position::from_offset(text, 2), Position::new(0, 2));
    assert_eq!(Position::from_offset(text, 3), Position::new(1, 0));
    assert_eq!(Position::from_offset(text, 5), Position::new(1, 2));
    assert_eq!(Position::from_offset(text, 100), Position::new(2, 1));
    for offset in 0..=text.len() {
        let position = Position::from_offset(text, offset);
        assert_eq!(position.to_offset(text), offset);
    }
}

#[test]
fn test_apply_selection_without_anchor_collapses() {
    let resolved = apply_selection("abc", Some(&Selection::caret(Position::new(0, 2))), None);
    assert_eq!(resolved.anchor, Position::new(0, 2));
    assert_eq!(resolved.focus, Position::new(0, 2));
    assert!(resolved.has_focus);
    assert!(resolved.is_collapsed());
}

#[test]
fn test_apply_selection_clamps_both_ends() {
    let selection = Selection {
        anchor: Some(Position::new(5, 0)),
        focus: Position::new(0, 50),
    };
    let resolved = apply_selection("ab\ncd", Some(&selection), None);
    assert_eq!(resolved.anchor, Position::new(1, 0));
    assert_eq!(resolved.focus, Position::new(0, 2));
}

#[test]
fn test_apply_selection_is_idempotent() {
    let text = "one\ntwo";
    let first = apply_selection(text, Some(&Selection::end()), None);
    let again = apply_selection(text, None, Some(&first));
    assert_eq!(first, again);
    let requested = Selection {
        anchor: Some(first.anchor),
        focus: first.focus,
    };
    assert_eq!(apply_selection(text, Some(&requested), None), first);
}

#[test]
fn test_apply_selection_defaults_to_start() {
    let resolved = apply_selection("text", None, None);
    assert_eq!(resolved.focus, Position::START);
    assert!(resolved.has_focus);
}

#[test]
fn test_resume_reclamps_to_shorter_text() {
    let previous = Resolved {
        anchor: Position::new(0, 10),
        focus: Position::new(0, 10),
        has_focus: false,
    };
    let resolved = apply_selection("abc", None, Some(&previous));
    assert_eq!(resolved.focus, Position::new(0, 3));
    assert!(resolved.has_focus);
}

#[test]
fn test_caret_memory() {
    let id = ItemId::from("a");
    let mut memory = CaretMemory::default();
    assert!(memory.recall(&id).is_none());
    memory.remember(&id, apply_selection("abc", Some(&Selection::end()), None));
    let recalled = memory.recall(&id).unwrap();
    assert_eq!(recalled.focus, Position::new(0, 3));
    assert!(!recalled.has_focus);
    memory.forget(&id);
    assert!(memory.recall(&id).is_none());
}
