use super::*;
use proptest::prelude::*;

fn state_with(names: &[&str], mode: Option<SortMode>) -> CollectionState {
    let mut state = CollectionState::new();
    state.load_all(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Book::new(BookId(i as i64 + 1), *name))
            .collect(),
    );
    state.set_sort_mode(mode);
    state
}

fn names(state: &CollectionState) -> Vec<&str> {
    state.books().iter().map(|b| b.name.as_str()).collect()
}

fn renamed(state: &CollectionState, from: &str, to: &str) -> Book {
    let original = state
        .books()
        .iter()
        .find(|b| b.name == from)
        .expect("book present");
    Book::new(original.id, to)
}

#[test]
fn rename_under_ascending_sort_moves_book() {
    let mut state = state_with(&["Ann", "Carl", "Eve"], Some(SortMode::Ascending));
    let updated = renamed(&state, "Carl", "Zed");

    let (plan, changes) = apply_update(&mut state, updated.id, updated).expect("apply");

    assert_eq!(plan, UpdatePlan::Reposition(SortMode::Ascending));
    assert!(changes.contains(Change::Books));
    assert_eq!(names(&state), ["Ann", "Eve", "Zed"]);
}

#[test]
fn rename_under_descending_sort_keeps_slot_when_order_holds() {
    let mut state = state_with(&["Ann", "Eve", "Zed"], Some(SortMode::Descending));
    assert_eq!(names(&state), ["Zed", "Eve", "Ann"]);
    let updated = renamed(&state, "Eve", "Ben");

    apply_update(&mut state, updated.id, updated).expect("apply");

    assert_eq!(names(&state), ["Zed", "Ben", "Ann"]);
}

#[test]
fn rename_without_sort_keeps_arrival_position() {
    let mut state = state_with(&["Eve", "Ann", "Carl"], None);
    let updated = renamed(&state, "Eve", "Aaron").with_image("bmV3");

    let (plan, _) = apply_update(&mut state, updated.id, updated).expect("apply");

    assert_eq!(plan, UpdatePlan::InPlaceUnsorted);
    assert_eq!(names(&state), ["Aaron", "Ann", "Carl"]);
    assert_eq!(state.books()[0].image_blob.as_deref(), Some("bmV3"));
}

#[test]
fn same_name_update_refreshes_image_in_place_and_keeps_selection() {
    let mut state = state_with(&["Ann", "Carl", "Eve"], Some(SortMode::Ascending));
    state.toggle_selection(BookId(2), true);
    let mut updated = Book::new(BookId(2), "Carl").with_image("aW1n");
    updated.image_name = Some("carl.png".into());

    let (plan, _) = apply_update(&mut state, updated.id, updated).expect("apply");

    assert_eq!(plan, UpdatePlan::InPlaceSameName);
    let book = state.find(BookId(2)).expect("book");
    assert_eq!(book.image_blob.as_deref(), Some("aW1n"));
    assert_eq!(book.image_name.as_deref(), Some("carl.png"));
    assert!(book.is_selected);
    assert_eq!(state.position(BookId(2)), Some(1));
}

#[test]
fn update_of_unknown_book_is_rejected_without_mutation() {
    let mut state = state_with(&["Ann"], Some(SortMode::Ascending));
    let before = state.clone();

    let err = apply_update(&mut state, BookId(77), Book::new(BookId(77), "Zed"))
        .expect_err("must fail");

    assert!(matches!(err, CatalogError::BookNotLoaded(BookId(77))));
    assert_eq!(state, before);
}

#[test]
fn noop_edit_detection() {
    let original = Book::new(BookId(1), "Ann");
    let mut draft = original.edit_copy();
    assert!(is_noop_edit(&original, &draft));

    draft.image_path = Some("cover.png".into());
    assert!(!is_noop_edit(&original, &draft));

    let renamed = Book::new(BookId(1), "Anne");
    assert!(!is_noop_edit(&original, &renamed));
}

#[test]
fn delete_removes_only_targeted_ids() {
    let mut state = state_with(&["Ann", "Carl", "Eve"], None);
    let (removed, _) = apply_delete(&mut state, &[BookId(1), BookId(3)]);
    assert_eq!(removed, 2);
    assert_eq!(names(&state), ["Carl"]);

    let (removed, changes) = apply_delete(&mut state, &[]);
    assert_eq!(removed, 0);
    assert!(changes.is_empty());
}

fn arb_sort_mode() -> impl Strategy<Value = SortMode> {
    prop_oneof![Just(SortMode::Ascending), Just(SortMode::Descending)]
}

proptest! {
    #[test]
    fn renames_preserve_sort_order(
        mode in arb_sort_mode(),
        initial in prop::collection::vec("[A-Za-z]{1,6}", 1..25),
        renames in prop::collection::vec((any::<prop::sample::Index>(), "[A-Za-z]{1,6}"), 1..30),
    ) {
        let mut state = CollectionState::new();
        state.load_all(
            initial
                .iter()
                .enumerate()
                .map(|(i, name)| Book::new(BookId(i as i64 + 1), name.clone()))
                .collect(),
        );
        state.set_sort_mode(Some(mode));
        let order = BookOrder::new(mode);
        prop_assert!(order.is_sorted(state.books()));

        for (pick, name) in renames {
            let id = state.books()[pick.index(state.len())].id;
            apply_update(&mut state, id, Book::new(id, name.clone())).expect("book is loaded");

            prop_assert!(order.is_sorted(state.books()));
            prop_assert_eq!(state.len(), initial.len());
            prop_assert_eq!(state.find(id).map(|b| b.name.clone()), Some(name));
        }
    }
}
