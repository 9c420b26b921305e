use super::*;
use proptest::prelude::*;

fn loaded(names: &[&str]) -> CollectionState {
    let mut state = CollectionState::new();
    state.load_all(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Book::new(BookId(i as i64 + 1), *name))
            .collect(),
    );
    state
}

fn names(state: &CollectionState) -> Vec<&str> {
    state.books().iter().map(|b| b.name.as_str()).collect()
}

#[test]
fn load_all_keeps_arrival_order_without_sort() {
    let state = loaded(&["Eve", "Ann", "Carl"]);
    assert!(state.is_loaded());
    assert_eq!(names(&state), ["Eve", "Ann", "Carl"]);
}

#[test]
fn load_all_sorts_when_mode_active() {
    let mut state = loaded(&["x"]);
    state.set_sort_mode(Some(SortMode::Descending));

    let changes = state.load_all(vec![
        Book::new(BookId(1), "Ann"),
        Book::new(BookId(2), "Eve"),
        Book::new(BookId(3), "Carl"),
    ]);

    assert!(changes.contains(Change::Books));
    assert_eq!(names(&state), ["Eve", "Carl", "Ann"]);
}

#[test]
fn load_all_keeps_first_of_repeated_ids() {
    let mut state = CollectionState::new();

    state.load_all(vec![
        Book::new(BookId(4), "Eve"),
        Book::new(BookId(7), "Ann"),
        Book::new(BookId(4), "Zed"),
    ]);

    assert_eq!(state.len(), 2);
    assert_eq!(names(&state), ["Eve", "Ann"]);
    assert_eq!(state.find(BookId(4)).map(|b| b.name.as_str()), Some("Eve"));
}

#[test]
fn set_sort_mode_is_ignored_before_first_load() {
    let mut state = CollectionState::new();
    let changes = state.set_sort_mode(Some(SortMode::Ascending));
    assert!(changes.is_empty());
    assert_eq!(state.sort_mode(), None);
}

#[test]
fn set_sort_mode_resorts_and_records() {
    let mut state = loaded(&["Eve", "Ann", "Carl"]);

    let changes = state.set_sort_mode(Some(SortMode::Ascending));
    assert!(changes.contains(Change::Books));
    assert!(changes.contains(Change::SortMode));
    assert_eq!(names(&state), ["Ann", "Carl", "Eve"]);

    state.set_sort_mode(Some(SortMode::Descending));
    assert_eq!(names(&state), ["Eve", "Carl", "Ann"]);

    let changes = state.set_sort_mode(None);
    assert_eq!(changes, Changes::of(Change::SortMode));
    assert_eq!(names(&state), ["Eve", "Carl", "Ann"]);
}

#[test]
fn reset_sort_keeps_order() {
    let mut state = loaded(&["b", "a"]);
    state.set_sort_mode(Some(SortMode::Ascending));
    assert!(state.reset_sort().contains(Change::SortMode));
    assert!(state.reset_sort().is_empty());
    assert_eq!(names(&state), ["a", "b"]);
}

#[test]
fn toggle_selection_ignores_unknown_ids() {
    let mut state = loaded(&["Ann", "Eve"]);
    assert!(state.toggle_selection(BookId(42), true).is_empty());
    assert_eq!(state.selected_count(), 0);

    assert!(state.toggle_selection(BookId(2), true).contains(Change::Selection));
    assert!(state.toggle_selection(BookId(2), true).is_empty());
    assert_eq!(state.selected_ids(), vec![BookId(2)]);
}

#[test]
fn select_and_unselect_all() {
    let mut state = loaded(&["Ann", "Eve", "Zed"]);
    state.select_all();
    assert_eq!(state.selected_count(), 3);
    state.unselect_all();
    assert_eq!(state.selected_count(), 0);
    assert!(state.unselect_all().is_empty());
}

#[test]
fn set_connected_reports_only_transitions() {
    let mut state = CollectionState::new();
    assert!(!state.is_connected());
    assert_eq!(state.set_connected(true), Changes::of(Change::Connected));
    assert!(state.set_connected(true).is_empty());
}

#[test]
fn remove_ids_drops_exactly_the_given_ids() {
    let mut state = loaded(&["Ann", "Eve", "Zed"]);
    let ids = HashSet::from([BookId(1), BookId(3), BookId(99)]);
    let (removed, changes) = state.remove_ids(&ids);
    assert_eq!(removed, 2);
    assert!(changes.contains(Change::Books));
    assert_eq!(names(&state), ["Eve"]);
}

proptest! {
    #[test]
    fn remove_where_selected_removes_exactly_selection(
        selection in prop::collection::vec(any::<bool>(), 0..40)
    ) {
        let mut state = CollectionState::new();
        state.load_all(
            (0..selection.len())
                .map(|i| Book::new(BookId(i as i64 + 1), format!("book-{i}")))
                .collect(),
        );
        for (i, selected) in selection.iter().enumerate() {
            state.toggle_selection(BookId(i as i64 + 1), *selected);
        }

        let expected: Vec<BookId> = selection
            .iter()
            .enumerate()
            .filter(|(_, selected)| !**selected)
            .map(|(i, _)| BookId(i as i64 + 1))
            .collect();
        let selected_total = selection.iter().filter(|s| **s).count();

        let (removed, changes) = state.remove_where_selected();

        prop_assert_eq!(removed, selected_total);
        prop_assert_eq!(changes.is_empty(), selected_total == 0);
        let remaining: Vec<BookId> = state.books().iter().map(|b| b.id).collect();
        prop_assert_eq!(remaining, expected);
    }
}
