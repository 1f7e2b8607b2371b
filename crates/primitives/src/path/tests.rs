use super::*;

#[test]
fn parent_and_child() {
	let path = Path::from([1, 2]);
	assert_eq!(path.parent(), Some(Path::from([1])));
	assert_eq!(path.child(3), Path::from([1, 2, 3]));
	assert_eq!(Path::root().parent(), None);
}

#[test]
fn siblings() {
	let path = Path::from([0, 2]);
	assert_eq!(path.next(), Path::from([0, 3]));
	assert_eq!(path.previous(), Some(Path::from([0, 1])));
	assert_eq!(Path::from([0, 0]).previous(), None);
	assert!(path.is_sibling_of(&Path::from([0, 5])));
	assert!(!path.is_sibling_of(&Path::from([1, 2])));
}

#[test]
fn ancestry() {
	let block = Path::from([1]);
	let leaf = Path::from([1, 0]);
	assert!(block.is_ancestor_of(&leaf));
	assert!(!leaf.is_ancestor_of(&block));
	assert!(!block.is_ancestor_of(&block));
	assert!(block.contains(&block));
	assert_eq!(Path::from([1, 2, 0]).common(&Path::from([1, 3])), Path::from([1]));
	let ancestors: Vec<_> = Path::from([3, 1, 4]).ancestors().collect();
	assert_eq!(ancestors, vec![Path::from([3]), Path::from([3, 1])]);
}

#[test]
fn document_order() {
	assert!(Path::from([0, 5]) < Path::from([1]));
	assert!(Path::from([1]) < Path::from([1, 0]));
	assert!(Path::from([0, 1]).is_before(&Path::from([1, 0])));
	assert!(!Path::from([1]).is_before(&Path::from([1, 0])));
	assert!(Path::from([2]).is_after(&Path::from([1, 9])));
	assert!(!Path::from([1, 0]).is_after(&Path::from([1])));
}

#[test]
fn ends_before() {
	assert!(Path::from([1]).ends_before(&Path::from([2, 0])));
	assert!(Path::from([1, 0]).ends_before(&Path::from([1, 1])));
	assert!(!Path::from([1, 0]).ends_before(&Path::from([2, 1])));
	assert!(!Path::from([1, 1]).ends_before(&Path::from([1])));
}

#[test]
fn display() {
	assert_eq!(Path::from([0, 12, 3]).to_string(), "[0, 12, 3]");
	assert_eq!(Path::root().to_string(), "[]");
}
