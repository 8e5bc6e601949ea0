/// Pure reducers for the three state slices plus the coordinator that runs
/// them for a single action.
///
/// Each reducer returns the input `Arc` untouched when the action does not
/// concern its slice, so the store can detect change with `Arc::ptr_eq`.
/// When a slice does change, a fresh `Vec` is built; inputs are never mutated.
use std::sync::Arc;

use super::action::Action;
use super::model::{Choice, ChoiceId, Group, Item};
use super::store::State;

/// Apply `action` to `state`, running items first and then choices and groups.
///
/// Item add/remove also touches `Choice::selected`. That cross-slice effect is
/// computed here from the post-action items slice, so the choices reducer
/// itself never reads items.
#[must_use]
pub fn reduce(state: &State, action: &Action) -> State {
    match action {
        Action::ClearAll => return State::default(),
        Action::ResetTo(snapshot) => return (**snapshot).clone(),
        _ => {}
    }

    if let Action::AddItem(new) = action
        && let Some(choice_id) = new.choice_id
        && !state.choices.iter().any(|c| c.id == choice_id)
    {
        return state.clone();
    }

    let items = items(&state.items, action);
    let choices = match action {
        Action::RemoveItem { id, .. } => {
            let removed = state
                .items
                .iter()
                .find(|i| i.id == *id)
                .and_then(|i| i.choice_id);
            match removed {
                Some(choice_id) if !items.iter().any(|i| i.choice_id == Some(choice_id)) => {
                    set_selected(&state.choices, choice_id, false)
                }
                _ => Arc::clone(&state.choices),
            }
        }
        Action::AddItem(_) if Arc::ptr_eq(&items, &state.items) => Arc::clone(&state.choices),
        _ => choices(&state.choices, action),
    };
    let groups = groups(&state.groups, action);

    State {
        choices,
        groups,
        items,
    }
}

/// Choices slice reducer.
#[must_use]
pub fn choices(slice: &Arc<Vec<Choice>>, action: &Action) -> Arc<Vec<Choice>> {
    match action {
        Action::AddChoice(new) => {
            if slice.iter().any(|c| c.id == new.id) {
                return Arc::clone(slice);
            }
            let mut next = Vec::clone(slice);
            next.push(Choice {
                id: new.id,
                value: new.value.clone(),
                label: new.label.clone(),
                group_id: new.group_id,
                selected: false,
                disabled: new.disabled,
                active: true,
                placeholder: new.placeholder,
                score: None,
                custom_properties: new.custom_properties.clone(),
                key_code: new.key_code,
            });
            Arc::new(next)
        }
        Action::AddItem(item) => match item.choice_id {
            Some(choice_id) => set_selected(slice, choice_id, true),
            None => Arc::clone(slice),
        },
        Action::FilterChoices(results) => Arc::new(
            slice
                .iter()
                .map(|choice| {
                    let mut choice = choice.clone();
                    if let Some(hit) = results.iter().find(|r| r.id == choice.id) {
                        choice.active = true;
                        choice.score = Some(hit.score);
                    } else if !choice.placeholder {
                        // Placeholders keep their prior visibility.
                        choice.active = false;
                        choice.score = None;
                    }
                    choice
                })
                .collect(),
        ),
        Action::ActivateChoices(active) => {
            if slice
                .iter()
                .all(|c| c.active == *active && c.score.is_none())
            {
                return Arc::clone(slice);
            }
            Arc::new(
                slice
                    .iter()
                    .map(|c| Choice {
                        active: *active,
                        score: None,
                        ..c.clone()
                    })
                    .collect(),
            )
        }
        Action::ClearChoices => {
            if slice.is_empty() {
                Arc::clone(slice)
            } else {
                Arc::new(Vec::new())
            }
        }
        _ => Arc::clone(slice),
    }
}

/// Items slice reducer.
#[must_use]
pub fn items(slice: &Arc<Vec<Item>>, action: &Action) -> Arc<Vec<Item>> {
    match action {
        Action::AddItem(new) => {
            if slice.iter().any(|i| i.id == new.id) {
                return Arc::clone(slice);
            }
            let mut next = Vec::clone(slice);
            next.push(Item {
                id: new.id,
                choice_id: new.choice_id,
                value: new.value.clone(),
                label: new.label.clone(),
                group_id: new.group_id,
                highlighted: false,
                placeholder: new.placeholder,
                custom_properties: new.custom_properties.clone(),
                key_code: new.key_code,
            });
            Arc::new(next)
        }
        Action::RemoveItem { id, .. } => {
            if !slice.iter().any(|i| i.id == *id) {
                return Arc::clone(slice);
            }
            Arc::new(slice.iter().filter(|i| i.id != *id).cloned().collect())
        }
        Action::HighlightItem { id, highlighted } => {
            match slice.iter().position(|i| i.id == *id) {
                Some(pos) if slice[pos].highlighted != *highlighted => {
                    let mut next = Vec::clone(slice);
                    next[pos].highlighted = *highlighted;
                    Arc::new(next)
                }
                _ => Arc::clone(slice),
            }
        }
        _ => Arc::clone(slice),
    }
}

/// Groups slice reducer.
#[must_use]
pub fn groups(slice: &Arc<Vec<Group>>, action: &Action) -> Arc<Vec<Group>> {
    match action {
        Action::AddGroup {
            id,
            value,
            active,
            disabled,
        } => {
            let mut next = Vec::clone(slice);
            next.push(Group {
                id: *id,
                value: value.clone(),
                active: *active,
                disabled: *disabled,
            });
            Arc::new(next)
        }
        _ => Arc::clone(slice),
    }
}

fn set_selected(slice: &Arc<Vec<Choice>>, id: ChoiceId, selected: bool) -> Arc<Vec<Choice>> {
    match slice.iter().position(|c| c.id == id) {
        Some(pos) if slice[pos].selected != selected => {
            let mut next = Vec::clone(slice);
            next[pos].selected = selected;
            Arc::new(next)
        }
        _ => Arc::clone(slice),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::choices::action::{self, NewChoice, NewItem, SearchMatch};
    use crate::choices::model::{GroupId, ItemId};

    fn new_choice(id: u32, value: &str) -> NewChoice {
        NewChoice {
            id: ChoiceId(id),
            value: value.to_owned(),
            label: value.to_owned(),
            group_id: None,
            disabled: false,
            placeholder: false,
            custom_properties: Value::Null,
            key_code: None,
        }
    }

    fn new_item(id: u32, choice: Option<u32>, value: &str) -> NewItem {
        NewItem {
            id: ItemId(id),
            choice_id: choice.map(ChoiceId),
            value: value.to_owned(),
            label: value.to_owned(),
            group_id: None,
            placeholder: false,
            custom_properties: Value::Null,
            key_code: None,
        }
    }

    fn seeded() -> State {
        let mut state = State::default();
        for (id, value) in [(1, "red"), (2, "green"), (3, "blue")] {
            state = reduce(&state, &action::add_choice(new_choice(id, value)));
        }
        state
    }

    #[test]
    fn test_add_choice_defaults() {
        let state = seeded();
        assert_eq!(state.choices.len(), 3);
        assert!(state.choices.iter().all(|c| c.active && !c.selected));
    }

    #[test]
    fn test_add_choice_duplicate_id_is_noop() {
        let state = seeded();
        let next = reduce(&state, &action::add_choice(new_choice(2, "other")));
        assert!(Arc::ptr_eq(&state.choices, &next.choices));
    }

    #[test]
    fn test_add_item_selects_choice() {
        let state = reduce(&seeded(), &action::add_item(new_item(1, Some(2), "green")));
        assert_eq!(state.items.len(), 1);
        assert!(state.choices[1].selected);
        assert!(!state.choices[0].selected);
    }

    #[test]
    fn test_remove_item_reference_counts() {
        let mut state = seeded();
        state = reduce(&state, &action::add_item(new_item(1, Some(1), "red")));
        state = reduce(&state, &action::add_item(new_item(2, Some(1), "red")));

        state = reduce(&state, &action::remove_item(ItemId(1), Some(ChoiceId(1))));
        assert!(state.choices[0].selected, "one item still references the choice");

        state = reduce(&state, &action::remove_item(ItemId(2), Some(ChoiceId(1))));
        assert!(!state.choices[0].selected);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let state = reduce(&seeded(), &action::add_item(new_item(1, Some(1), "red")));
        let next = reduce(&state, &action::remove_item(ItemId(9), None));
        assert!(Arc::ptr_eq(&state.items, &next.items));
        assert!(Arc::ptr_eq(&state.choices, &next.choices));
    }

    #[test]
    fn test_add_item_for_unknown_choice_is_noop() {
        let state = seeded();
        let next = reduce(&state, &action::add_item(new_item(1, Some(99), "ghost")));
        assert!(!next.differs_from(&state));
        assert!(next.items.is_empty());
    }

    #[test]
    fn test_remove_item_releases_its_own_choice() {
        let state = reduce(&seeded(), &action::add_item(new_item(1, Some(1), "red")));
        let next = reduce(&state, &action::remove_item(ItemId(1), Some(ChoiceId(2))));
        assert!(next.items.is_empty());
        assert!(!next.choices[0].selected);
        assert!(!next.choices[1].selected);
    }

    #[test]
    fn test_highlight_item_only_touches_target() {
        let mut state = seeded();
        state = reduce(&state, &action::add_item(new_item(1, Some(1), "red")));
        state = reduce(&state, &action::add_item(new_item(2, Some(2), "green")));
        state = reduce(&state, &action::highlight_item(ItemId(2), true));
        assert!(!state.items[0].highlighted);
        assert!(state.items[1].highlighted);
    }

    #[test]
    fn test_filter_marks_non_matches_inactive() {
        let state = reduce(
            &seeded(),
            &action::filter_choices(vec![SearchMatch {
                id: ChoiceId(3),
                score: 0.1,
            }]),
        );
        let active: Vec<u32> = state
            .choices
            .iter()
            .filter(|c| c.active)
            .map(|c| c.id.0)
            .collect();
        assert_eq!(active, vec![3]);
        assert_eq!(state.choices[2].score, Some(0.1));
    }

    #[test]
    fn test_filter_keeps_placeholder_visibility() {
        let mut placeholder = new_choice(4, "");
        placeholder.placeholder = true;
        let state = reduce(&seeded(), &action::add_choice(placeholder));
        let state = reduce(&state, &action::filter_choices(Vec::new()));
        assert!(state.choices[3].active);
        assert!(!state.choices[0].active);
    }

    #[test]
    fn test_activate_twice_is_idempotent() {
        let filtered = reduce(&seeded(), &action::filter_choices(Vec::new()));
        let once = reduce(&filtered, &action::activate_choices(true));
        let twice = reduce(&once, &action::activate_choices(true));
        assert!(Arc::ptr_eq(&once.choices, &twice.choices));
        assert!(once.choices.iter().all(|c| c.active && c.score.is_none()));
    }

    #[test]
    fn test_clear_choices_leaves_groups() {
        let state = reduce(&seeded(), &action::add_group("Colours", GroupId(7), true, false));
        let state = reduce(&state, &action::clear_choices());
        assert!(state.choices.is_empty());
        assert_eq!(state.groups.len(), 1);
    }

    #[test]
    fn test_clear_all_and_reset() {
        let initial = reduce(&seeded(), &action::add_item(new_item(1, Some(1), "red")));
        let snapshot = initial.clone();
        let cleared = reduce(&initial, &action::clear_all());
        assert!(cleared.choices.is_empty() && cleared.items.is_empty());

        let restored = reduce(&cleared, &action::reset_to(&snapshot));
        assert_eq!(restored, snapshot);
    }
}
