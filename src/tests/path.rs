use super::Path;

#[test]
fn test_sub_path_is_reflexive() {
    for path in [Path::root(), Path::from([0]), Path::from([2, 0, 5])] {
        assert!(path.is_sub_path_of(&path), "{path} should be a sub path of itself");
    }
}

#[test]
fn test_longer_path_is_never_sub_path() {
    let short = Path::from([1]);
    let long = Path::from([1, 0]);
    assert!(short.is_sub_path_of(&long));
    assert!(!long.is_sub_path_of(&short));
    assert!(!Path::from([0]).is_sub_path_of(&Path::root()));
}

#[test]
fn test_sub_path_requires_matching_prefix() {
    assert!(Path::root().is_sub_path_of(&Path::from([3, 1])));
    assert!(!Path::from([2]).is_sub_path_of(&Path::from([3, 1])));
    assert!(!Path::from([3, 0]).is_sub_path_of(&Path::from([3, 1])));
}

#[test]
fn test_sibling_arithmetic() {
    let path = Path::from([4, 2]);
    assert_eq!(path.next_sibling(), Some(Path::from([4, 3])));
    assert_eq!(path.prev_sibling(), Some(Path::from([4, 1])));
    assert_eq!(Path::from([4, 0]).prev_sibling(), None);
    assert_eq!(Path::root().next_sibling(), None);
    assert_eq!(path.parent(), Some(Path::from([4])));
    assert_eq!(Path::root().parent(), None);
    assert_eq!(path.child(7), Path::from([4, 2, 7]));
}

#[test]
fn test_display_and_parse() {
    let path = Path::from([0, 12, 3]);
    assert_eq!(path.to_string(), "0.12.3");
    assert_eq!("0.12.3".parse::<Path>().unwrap(), path);
    assert_eq!("".parse::<Path>().unwrap(), Path::root());
    assert!("0.x".parse::<Path>().is_err());
}
