//! Store and engine properties exercised through the public API.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use choicekit::choices::action::{self, NewChoice, NewItem, SearchMatch};
use choicekit::choices::policy::can_add_item;
use choicekit::choices::{
    ChoiceId, Choices, Config, DropdownView, GroupId, ItemId, Mode, OptgroupSpec, OptionSpec,
    SourceElement, Store,
};

fn new_choice(id: u32, value: &str, group: Option<u64>, disabled: bool) -> NewChoice {
    NewChoice {
        id: ChoiceId(id),
        value: value.to_owned(),
        label: value.to_owned(),
        group_id: group.map(GroupId),
        disabled,
        placeholder: false,
        custom_properties: Value::Null,
        key_code: None,
    }
}

fn new_item(id: u32, choice: u32) -> NewItem {
    NewItem {
        id: ItemId(id),
        choice_id: Some(ChoiceId(choice)),
        value: format!("c{choice}"),
        label: format!("c{choice}"),
        group_id: None,
        placeholder: false,
        custom_properties: Value::Null,
        key_code: None,
    }
}

fn colours(kind: &str) -> Choices {
    let element = SourceElement::new(kind).with_options(vec![
        OptionSpec::new("red", "Red"),
        OptionSpec::new("green", "Green"),
        OptionSpec::new("blue", "Blue"),
    ]);
    Choices::new(
        element,
        Config {
            should_sort: false,
            ..Config::default()
        },
    )
    .unwrap()
}

fn choice_id(choices: &Choices, value: &str) -> ChoiceId {
    choices
        .store()
        .choices()
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.id)
        .unwrap()
}

#[test]
fn test_choice_ids_unique_and_increasing() {
    let mut choices = colours("select-multiple");
    choices.set_choices(
        &[
            json!({"value": "cyan"}),
            json!({"label": "Warm", "choices": [{"value": "orange"}, {"value": "pink"}]}),
        ],
        "value",
        "label",
        false,
    );
    let ids: Vec<u32> = choices.store().choices().iter().map(|c| c.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_selection_consistency() {
    let mut store = Store::new();
    store.dispatch(&action::add_choice(new_choice(1, "a", None, false)));
    store.dispatch(&action::add_item(new_item(1, 1)));
    store.dispatch(&action::add_item(new_item(2, 1)));

    for item in store.items() {
        let choice = item.choice_id.and_then(|id| store.choice_by_id(id)).unwrap();
        assert!(choice.selected);
    }

    store.dispatch(&action::remove_item(ItemId(1), Some(ChoiceId(1))));
    assert!(store.choice_by_id(ChoiceId(1)).unwrap().selected);
    store.dispatch(&action::remove_item(ItemId(2), Some(ChoiceId(1))));
    assert!(!store.choice_by_id(ChoiceId(1)).unwrap().selected);
}

#[test]
fn test_activate_choices_is_idempotent() {
    let mut store = Store::new();
    store.dispatch(&action::add_choice(new_choice(1, "a", None, false)));
    store.dispatch(&action::add_choice(new_choice(2, "b", None, false)));
    store.dispatch(&action::filter_choices(vec![SearchMatch {
        id: ChoiceId(1),
        score: 0.1,
    }]));

    assert!(store.dispatch(&action::activate_choices(true)));
    let once = store.snapshot();
    assert!(!store.dispatch(&action::activate_choices(true)));
    assert_eq!(store.snapshot(), once);
}

#[test]
fn test_search_results_come_from_searchable_choices() {
    let mut choices = colours("select-multiple");
    let searchable: Vec<ChoiceId> = choices
        .store()
        .searchable_choices()
        .iter()
        .map(|c| c.id)
        .collect();

    choices.on_search_input("blu");
    let state = choices.store();
    let active: Vec<ChoiceId> = state.active_choices().iter().map(|c| c.id).collect();
    assert!(!active.is_empty());
    assert!(active.iter().all(|id| searchable.contains(id)));
    assert!(
        state
            .choices()
            .iter()
            .filter(|c| !active.contains(&c.id))
            .all(|c| !c.active)
    );
}

#[test]
fn test_max_item_gate_ignores_other_settings() {
    let mut choices = colours("select-multiple");
    for value in ["red", "green"] {
        let id = choice_id(&choices, value);
        choices.on_choice_click(id);
    }
    let config = Config {
        max_item_count: 2,
        duplicate_items_allowed: true,
        ..Config::default()
    };
    let items = choices.store().active_items();
    let res = can_add_item(Mode::SelectMultiple, &config, None, &items, "blue");
    assert!(!res.response);
    assert!(!res.notice.is_empty());
}

#[test]
fn test_form_reset_round_trip() {
    let element = SourceElement::new("select-multiple").with_options(vec![
        OptionSpec::new("a", "A").selected(),
        OptionSpec::new("b", "B"),
        OptionSpec::new("c", "C"),
    ]);
    let mut choices = Choices::new(element, Config::default()).unwrap();
    let initial: Vec<(ItemId, String)> = choices
        .store()
        .items()
        .iter()
        .map(|i| (i.id, i.value.clone()))
        .collect();

    choices.set_choice_by_value(&["b", "c"]);
    choices.remove_active_items_by_value("a");
    choices.on_select_all();
    choices.remove_highlighted_items(true);
    choices.form_reset();

    let restored: Vec<(ItemId, String)> = choices
        .store()
        .items()
        .iter()
        .map(|i| (i.id, i.value.clone()))
        .collect();
    assert_eq!(restored, initial);
}

#[test]
fn test_duplicate_disallowed_scenario() {
    let element = SourceElement::new("select-multiple");
    let mut choices = Choices::new(
        element,
        Config {
            duplicate_items_allowed: false,
            ..Config::default()
        },
    )
    .unwrap();
    choices.set_choices(&[json!({"value": "red"})], "value", "label", false);
    assert_eq!(choices.store().choices()[0].id, ChoiceId(1));

    choices.set_value(&[choicekit::choices::ItemSpec::Value("red".to_owned())]);
    let again = can_add_item(
        Mode::SelectMultiple,
        choices.config(),
        None,
        &choices.store().active_items(),
        "red",
    );
    assert!(!again.response);
    assert!(!again.notice.is_empty());
    assert_eq!(choices.values(), vec!["red"]);
    for item in choices.store().items() {
        let choice = item.choice_id.and_then(|id| choices.store().choice_by_id(id)).unwrap();
        assert!(choice.selected);
    }
}

#[test]
fn test_store_ignores_item_for_missing_choice() {
    let mut store = Store::new();
    store.dispatch(&action::add_choice(new_choice(1, "a", None, false)));
    assert!(!store.dispatch(&action::add_item(new_item(1, 99))));
    assert!(store.items().is_empty());
}

#[test]
fn test_single_select_exclusivity_scenario() {
    let mut choices = colours("select-one");
    assert_eq!(choices.values(), vec!["red"]);

    let green = choice_id(&choices, "green");
    choices.on_choice_click(green);

    assert_eq!(choices.store().active_items().len(), 1);
    assert_eq!(choices.values(), vec!["green"]);
    let selected: Vec<&str> = choices
        .store()
        .choices()
        .iter()
        .filter(|c| c.selected)
        .map(|c| c.value.as_str())
        .collect();
    assert_eq!(selected, vec!["green"]);
}

#[test]
fn test_group_expansion_scenario() {
    let element = SourceElement {
        optgroups: vec![OptgroupSpec {
            label: "Shapes".to_owned(),
            id: Some(9),
            disabled: false,
            options: vec![
                OptionSpec::new("circle", "Circle"),
                OptionSpec::new("square", "Square").disabled(),
                OptionSpec::new("star", "Star"),
            ],
        }],
        ..SourceElement::new("select-multiple")
    };
    let mut choices = Choices::new(element, Config::default()).unwrap();
    let grouped: Vec<(&str, bool)> = choices
        .store()
        .choices()
        .iter()
        .filter(|c| c.group_id == Some(GroupId(9)))
        .map(|c| (c.value.as_str(), c.disabled))
        .collect();
    assert_eq!(
        grouped,
        vec![("circle", false), ("square", true), ("star", false)]
    );

    choices.set_choice_by_value(&["square"]);
    let square = choice_id(&choices, "square");
    choices.on_choice_click(square);
    assert!(!choices.store().choice_by_id(square).unwrap().selected);
}

#[test]
fn test_dropdown_hides_selected_and_tracks_cursor() {
    let mut choices = colours("select-multiple");
    let red = choice_id(&choices, "red");
    choices.on_choice_click(red);

    let view = choices.dropdown_view();
    let DropdownView::Rows { .. } = &view else {
        panic!("expected rows, got {view:?}");
    };
    assert!(!view.selectable().contains(&red));
    assert_eq!(choices.highlighted_choice(), view.selectable().first().copied());
}
