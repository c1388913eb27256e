use super::{Item, ItemId};
use crate::error::TreeError;
use crate::path::Path;

fn leaf(id: &str) -> Item {
    Item {
        id: ItemId::from(id),
        text: id.to_string(),
        children: vec![],
        expand: true,
    }
}

fn node(id: &str, children: Vec<Item>) -> Item {
    leaf(id).with_children(children)
}

/// root[A[A1, A2[A21]], B, C[C1]]
fn sample() -> Item {
    node(
        "root",
        vec![
            node("A", vec![leaf("A1"), node("A2", vec![leaf("A21")])]),
            leaf("B"),
            node("C", vec![leaf("C1")]),
        ],
    )
}

fn ids(item: &Item) -> Vec<String> {
    item.preorder()
        .into_iter()
        .map(|(_, n)| n.id.to_string())
        .collect()
}

#[test]
fn test_create_is_expanded_leaf_with_fresh_id() {
    let a = Item::create("hello");
    let b = Item::create("hello");
    assert_eq!(a.text, "hello");
    assert!(a.is_leaf());
    assert!(a.expand);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_add_child_clamps_position() {
    let parent = node("p", vec![leaf("x"), leaf("y")]);
    let appended = parent.add_child(leaf("z"), None);
    assert_eq!(appended.children[2].id, ItemId::from("z"));
    let front = parent.add_child(leaf("z"), Some(0));
    assert_eq!(front.children[0].id, ItemId::from("z"));
    let clamped = parent.add_child(leaf("z"), Some(99));
    assert_eq!(clamped.children[2].id, ItemId::from("z"));
    assert_eq!(parent.children.len(), 2, "input must not change");
}

#[test]
fn test_find_by_id_returns_path() {
    let tree = sample();
    let (found, path) = tree.find_by_id(&ItemId::from("A21")).unwrap();
    assert_eq!(found.text, "A21");
    assert_eq!(path, Path::from([0, 1, 0]));
    assert_eq!(tree.find_by_id(&ItemId::from("root")).unwrap().1, Path::root());
    assert!(tree.find_by_id(&ItemId::from("missing")).is_none());
}

#[test]
fn test_find_by_path() {
    let tree = sample();
    assert_eq!(tree.find_by_path(&Path::from([2, 0])).unwrap().text, "C1");
    assert_eq!(tree.find_by_path(&Path::root()).unwrap().text, "root");
    assert!(tree.find_by_path(&Path::from([1, 0])).is_none());
    assert!(tree.find_by_path(&Path::from([5])).is_none());
}

#[test]
fn test_tail_follows_last_children() {
    let tree = sample();
    let a = tree.find_by_path(&Path::from([0])).unwrap();
    assert_eq!(a.tail(&Path::from([0])), Path::from([0, 1, 0]));
    let b = tree.find_by_path(&Path::from([1])).unwrap();
    assert_eq!(b.tail(&Path::from([1])), Path::from([1]));
    assert_eq!(tree.tail(&Path::root()), Path::from([2, 0]));
}

#[test]
fn test_update_with_same_node_round_trips() {
    let tree = sample();
    for (path, _) in tree.preorder() {
        let same = tree.find_by_path(&path).unwrap().clone();
        assert_eq!(tree.update(same, &path).unwrap(), tree, "at {path}");
    }
}

#[test]
fn test_insert_then_remove_is_identity() {
    let tree = sample();
    let paths = [
        Path::from([0]),
        Path::from([3]),
        Path::from([0, 1]),
        Path::from([0, 2]),
        Path::from([0, 1, 1]),
        Path::from([1, 0]),
    ];
    for path in paths {
        let inserted = tree.insert(vec![Item::create("x")], &path, 0).unwrap();
        assert_eq!(inserted.count(), tree.count() + 1);
        assert_eq!(inserted.remove(&path, 1).unwrap(), tree, "at {path}");
    }
}

#[test]
fn test_insert_replaces_when_remove_count_given() {
    let tree = sample();
    let replaced = tree.insert(vec![leaf("X")], &Path::from([1]), 1).unwrap();
    assert_eq!(ids(&replaced), vec!["root", "A", "A1", "A2", "A21", "X", "C", "C1"]);
}

#[test]
fn test_remove_amount() {
    let tree = sample();
    let removed = tree.remove(&Path::from([0]), 2).unwrap();
    assert_eq!(ids(&removed), vec!["root", "C", "C1"]);
    let clipped = tree.remove(&Path::from([1]), 10).unwrap();
    assert_eq!(ids(&clipped), vec!["root", "A", "A1", "A2", "A21"]);
}

#[test]
fn test_huge_counts_clip_to_the_end() {
    let tree = sample();
    let removed = tree.remove(&Path::from([1]), usize::MAX).unwrap();
    assert_eq!(ids(&removed), vec!["root", "A", "A1", "A2", "A21"]);
    let replaced = tree
        .insert(vec![leaf("x")], &Path::from([1]), usize::MAX)
        .unwrap();
    assert_eq!(ids(&replaced), vec!["root", "A", "A1", "A2", "A21", "x"]);
}

#[test]
fn test_invalid_paths_are_errors_not_panics() {
    let tree = sample();
    assert_eq!(tree.remove(&Path::root(), 1), Err(TreeError::Root));
    assert!(matches!(
        tree.remove(&Path::from([3]), 1),
        Err(TreeError::IndexOutOfRange { index: 3, len: 3, .. })
    ));
    assert!(matches!(
        tree.insert(vec![leaf("x")], &Path::from([9, 0]), 0),
        Err(TreeError::InvalidPath(_))
    ));
    assert!(matches!(
        tree.insert(vec![leaf("x")], &Path::from([5]), 0),
        Err(TreeError::IndexOutOfRange { .. })
    ));
    assert!(tree.map_location(&Path::from([1, 1]), Clone::clone).is_err());
}

#[test]
fn test_map_location_rebuilds_only_the_route() {
    let tree = sample();
    let mapped = tree
        .map_location(&Path::from([0, 1]), |n| Item {
            text: "changed".to_string(),
            ..n.clone()
        })
        .unwrap();
    assert_eq!(mapped.find_by_path(&Path::from([0, 1])).unwrap().text, "changed");
    assert_eq!(mapped.children[1], tree.children[1]);
    assert_eq!(mapped.children[2], tree.children[2]);
    assert_eq!(tree.find_by_path(&Path::from([0, 1])).unwrap().text, "A2");
}

#[test]
fn test_indent_into_previous_sibling() {
    let tree = node("root", vec![leaf("A"), leaf("B")]);
    let moved = tree.indent(&Path::from([1])).unwrap().unwrap();
    assert_eq!(moved.path, Path::from([0, 0]));
    assert_eq!(moved.root, node("root", vec![node("A", vec![leaf("B")])]));
}

#[test]
fn test_indent_first_child_is_noop() {
    let tree = node("root", vec![leaf("A")]);
    assert_eq!(tree.indent(&Path::from([0])).unwrap(), None);
    assert_eq!(tree.indent(&Path::root()).unwrap(), None);
}

#[test]
fn test_indent_appends_after_existing_children_and_expands() {
    let mut a = node("A", vec![leaf("A1")]);
    a.expand = false;
    let tree = node("root", vec![a, leaf("B")]);
    let moved = tree.indent(&Path::from([1])).unwrap().unwrap();
    assert_eq!(moved.path, Path::from([0, 1]));
    let new_parent = moved.root.find_by_path(&Path::from([0])).unwrap();
    assert!(new_parent.expand);
    assert_eq!(new_parent.children[1].id, ItemId::from("B"));
}

#[test]
fn test_unindent_places_after_parent() {
    let tree = sample();
    let moved = tree.unindent(&Path::from([0, 0])).unwrap().unwrap();
    assert_eq!(moved.path, Path::from([1]));
    assert_eq!(
        ids(&moved.root),
        vec!["root", "A", "A2", "A21", "A1", "B", "C", "C1"]
    );
    assert_eq!(tree.unindent(&Path::from([1])).unwrap(), None);
}

/// Holds whenever the new parent was already expanded; indenting into a
/// collapsed sibling unfolds it and un-indenting leaves it unfolded.
#[test]
fn test_indent_then_unindent_restores_tree() {
    let tree = sample();
    for path in [Path::from([1]), Path::from([2]), Path::from([0, 1])] {
        let indented = tree.indent(&path).unwrap().unwrap();
        let back = indented.root.unindent(&indented.path).unwrap().unwrap();
        assert_eq!(back.path, path);
        assert_eq!(back.root, tree, "round trip at {path}");
    }
}

#[test]
fn test_move_node() {
    let tree = sample();
    let moved = tree.move_node(&Path::from([1]), &Path::from([2])).unwrap();
    assert_eq!(ids(&moved), vec!["root", "A", "A1", "A2", "A21", "C", "C1", "B"]);
}

#[test]
fn test_path_items_for_breadcrumb() {
    let tree = sample();
    let chain: Vec<&str> = tree
        .path_items(&Path::from([0, 1, 0]))
        .unwrap()
        .iter()
        .map(|n| n.text.as_str())
        .collect();
    assert_eq!(chain, vec!["root", "A", "A2", "A21"]);
    assert!(tree.path_items(&Path::from([1, 1])).is_err());
}

#[test]
fn test_preorder_and_count() {
    let tree = sample();
    assert_eq!(tree.count(), 8);
    let order = tree.preorder();
    assert_eq!(order[0].0, Path::root());
    assert_eq!(order[4].0, Path::from([0, 1, 0]));
    assert_eq!(ids(&tree), vec!["root", "A", "A1", "A2", "A21", "B", "C", "C1"]);
}

#[test]
fn test_indent_into_collapsed_sibling_round_trip_unfolds_it() {
    let mut a = node("A", vec![leaf("A1")]);
    a.expand = false;
    let tree = node("root", vec![a, leaf("B")]);
    let indented = tree.indent(&Path::from([1])).unwrap().unwrap();
    let back = indented.root.unindent(&indented.path).unwrap().unwrap();
    assert_eq!(back.path, Path::from([1]));
    assert_eq!(ids(&back.root), ids(&tree));
    assert!(back.root.children[0].expand);
}
