use pretty_assertions::assert_eq;
use quire_document::Point;

use super::*;

const TASKS: [&str; 5] = [
	"Buy milk",
	"Go to the gym",
	"Learn a new language",
	"Learn a new framework",
	"Never gonna give you up",
];

fn opened(search: &str) -> TriggerTransition {
	TriggerTransition::Opened(TriggerMatch {
		trigger: "mention".into(),
		range: Range::collapsed(Point::new([0, 0], 0)),
		search: search.into(),
	})
}

#[test]
fn test_filter_is_case_insensitive_substring() {
	assert_eq!(filter_candidates(&TASKS, "LEARN"), ["Learn a new language", "Learn a new framework"]);
	assert_eq!(filter_candidates(&TASKS, "gonna"), ["Never gonna give you up"]);
	assert_eq!(filter_candidates(&TASKS, "").len(), TASKS.len());
	assert!(filter_candidates(&TASKS, "xyz").is_empty());
}

#[test]
fn test_candidate_list_follows_transitions() {
	let mut list = CandidateList::new(TASKS);
	assert!(!list.is_open());
	assert!(list.visible().is_empty());

	list.on_transition(&opened("new"));
	assert!(list.is_open());
	assert_eq!(list.selected(), Some("Learn a new language"));

	list.on_transition(&TriggerTransition::Closed);
	assert!(!list.is_open());
	assert_eq!(list.selected(), None);
}

#[test]
fn test_candidate_list_navigation_wraps() {
	let mut list = CandidateList::new(TASKS);
	list.on_transition(&opened("learn"));

	assert!(list.on_key(&Key::plain(KeyCode::Down)));
	assert_eq!(list.selected(), Some("Learn a new framework"));
	assert!(list.on_key(&Key::plain(KeyCode::Down)));
	assert_eq!(list.selected(), Some("Learn a new language"));
	assert!(list.on_key(&Key::plain(KeyCode::Up)));
	assert_eq!(list.selected(), Some("Learn a new framework"));
	assert!(!list.on_key(&Key::plain(KeyCode::Left)));
}

#[test]
fn test_candidate_list_chosen_value() {
	let mut list = CandidateList::new(TASKS);
	list.on_transition(&opened("milk"));
	let data = OverlayData {
		trigger: "mention".into(),
		range: Range::collapsed(Point::new([0, 0], 0)),
		search: "milk".into(),
		filter: "milk".into(),
	};
	assert_eq!(list.chosen(&data), Some(json!({ "title": "Buy milk" })));

	list.on_transition(&opened("nothing"));
	assert_eq!(list.chosen(&data), None);
	assert!(!list.on_key(&Key::plain(KeyCode::Down)));
}
