use super::{context_at, context_in, navigate_next, navigate_prev, visible_nodes, visible_tail};
use crate::item::{Item, ItemId};
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

fn collapse(tree: &Item, path: &Path) -> Item {
    tree.map_location(path, |n| Item {
        expand: false,
        ..n.clone()
    })
    .unwrap()
}

#[test]
fn test_first_child_prev_is_parent() {
    let tree = sample();
    let ctx = context_at(&tree, &Path::from([0, 0])).unwrap();
    assert_eq!(ctx.prev, Path::from([0]));
    assert_eq!(ctx.next, Path::from([0, 1]));
    assert_eq!(ctx.parent_id, Some(ItemId::from("A")));
    assert_eq!(ctx.previous_id, None);
}

#[test]
fn test_prev_goes_to_tail_of_expanded_sibling() {
    let tree = sample();
    let ctx = context_at(&tree, &Path::from([1])).unwrap();
    assert_eq!(ctx.prev, Path::from([0, 1, 0]));
    assert_eq!(ctx.previous_id, Some(ItemId::from("A")));
}

#[test]
fn test_prev_stops_at_collapsed_sibling() {
    let tree = collapse(&sample(), &Path::from([0]));
    let ctx = context_at(&tree, &Path::from([1])).unwrap();
    assert_eq!(ctx.prev, Path::from([0]));

    let tree = collapse(&sample(), &Path::from([0, 1]));
    let ctx = context_at(&tree, &Path::from([1])).unwrap();
    assert_eq!(ctx.prev, Path::from([0, 1]), "hidden A21 must be skipped");
}

#[test]
fn test_last_child_inherits_next() {
    let tree = sample();
    let ctx = context_at(&tree, &Path::from([0, 1, 0])).unwrap();
    assert_eq!(ctx.next, Path::from([1]));
    assert!(ctx.is_last_sibling());
    let last = context_at(&tree, &Path::from([2, 0])).unwrap();
    assert_eq!(last.next, Path::root());
}

#[test]
fn test_navigate_down_visits_every_node_in_preorder() {
    let tree = sample();
    let expected: Vec<Path> = tree.preorder().into_iter().map(|(p, _)| p).collect();
    let mut visited = vec![Path::root()];
    let mut current = Path::root();
    while let Some(next) = navigate_next(&tree, &context_at(&tree, &current).unwrap()) {
        visited.push(next.clone());
        current = next;
    }
    assert_eq!(visited, expected);
    assert_eq!(visited.len(), tree.count());
}

#[test]
fn test_navigate_up_returns_to_root() {
    let tree = sample();
    let mut current = Path::from([2, 0]);
    let mut steps = 0;
    while !current.is_root() {
        current = navigate_prev(&context_at(&tree, &current).unwrap());
        steps += 1;
    }
    assert_eq!(steps, tree.count() - 1);
}

#[test]
fn test_navigate_down_skips_collapsed_children() {
    let tree = collapse(&sample(), &Path::from([0]));
    let ctx = context_at(&tree, &Path::from([0])).unwrap();
    assert_eq!(navigate_next(&tree, &ctx), Some(Path::from([1])));
}

#[test]
fn test_navigate_down_from_last_node_is_noop() {
    let tree = sample();
    let ctx = context_at(&tree, &Path::from([2, 0])).unwrap();
    assert_eq!(navigate_next(&tree, &ctx), None);
}

#[test]
fn test_visible_nodes_respects_collapse() {
    let tree = collapse(&sample(), &Path::from([0, 1]));
    let paths: Vec<Path> = visible_nodes(&tree, &Path::root())
        .into_iter()
        .map(|c| c.path)
        .collect();
    assert_eq!(
        paths,
        vec![
            Path::root(),
            Path::from([0]),
            Path::from([0, 0]),
            Path::from([0, 1]),
            Path::from([1]),
            Path::from([2]),
            Path::from([2, 0]),
        ]
    );
}

#[test]
fn test_zoomed_context_treats_start_as_root() {
    let tree = sample();
    let start = Path::from([0]);
    let nodes = visible_nodes(&tree, &start);
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0].depth, 0);
    assert_eq!(nodes[0].prev, start);

    let first = context_in(&tree, &start, &Path::from([0, 0])).unwrap();
    assert_eq!(first.prev, start);
    let last = context_in(&tree, &start, &Path::from([0, 1, 0])).unwrap();
    assert_eq!(last.next, Path::root());
    assert_eq!(navigate_next(&tree, &last), None);
    assert!(context_in(&tree, &start, &Path::from([1])).is_none());
}

#[test]
fn test_visible_tail() {
    let tree = sample();
    assert_eq!(visible_tail(&tree, &Path::root()), Path::from([2, 0]));
    let collapsed = collapse(&tree, &Path::from([2]));
    assert_eq!(visible_tail(&collapsed, &Path::root()), Path::from([2]));
}
