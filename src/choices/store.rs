/// Observable store holding the choices, groups and items slices.
use std::sync::Arc;

use tracing::debug;

use super::action::Action;
use super::model::{Choice, ChoiceId, Group, GroupId, Item};
use super::reducers;

/// One immutable snapshot of the whole store.
///
/// Slices live behind `Arc` and are replaced, never edited, so cloning a
/// `State` yields a stable snapshot that later dispatches cannot alter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub choices: Arc<Vec<Choice>>,
    pub groups: Arc<Vec<Group>>,
    pub items: Arc<Vec<Item>>,
}

impl State {
    /// Whether any slice differs from `other` by reference.
    #[must_use]
    pub fn differs_from(&self, other: &State) -> bool {
        !Arc::ptr_eq(&self.choices, &other.choices)
            || !Arc::ptr_eq(&self.groups, &other.groups)
            || !Arc::ptr_eq(&self.items, &other.items)
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&State)>;

/// Centralised state container.
///
/// Listeners receive a shared reference to the new state and have no access
/// to the store, so a notification can never dispatch re-entrantly.
#[derive(Default)]
pub struct Store {
    state: State,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action` and notify listeners if any slice changed.
    ///
    /// Returns whether the state was replaced.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        let next = reducers::reduce(&self.state, action);
        if !next.differs_from(&self.state) {
            debug!(action = action.kind(), "dispatch: no change");
            return false;
        }
        debug!(action = action.kind(), "dispatch");
        self.state = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
        true
    }

    /// Register a listener called after every state change, in registration order.
    ///
    /// The current state is not delivered on subscription.
    pub fn subscribe(&mut self, listener: impl FnMut(&State) + 'static) -> Subscription {
        let handle = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Remove a listener. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, handle: Subscription) {
        self.listeners.retain(|(h, _)| *h != handle);
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> State {
        self.state.clone()
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.state.choices
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.state.groups
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    // --- Derived views ---

    /// Items currently present. Removed items leave the slice, so this is every item.
    #[must_use]
    pub fn active_items(&self) -> Vec<&Item> {
        self.state.items.iter().collect()
    }

    #[must_use]
    pub fn highlighted_active_items(&self) -> Vec<&Item> {
        self.state.items.iter().filter(|i| i.highlighted).collect()
    }

    /// Active choices not yet selected.
    #[must_use]
    pub fn active_choices(&self) -> Vec<&Choice> {
        self.state
            .choices
            .iter()
            .filter(|c| c.active && !c.selected)
            .collect()
    }

    /// Active choices including selected ones.
    #[must_use]
    pub fn active_choices_with_selected(&self) -> Vec<&Choice> {
        self.state.choices.iter().filter(|c| c.active).collect()
    }

    /// Enabled, active groups that still have an enabled active member.
    #[must_use]
    pub fn active_groups(&self) -> Vec<&Group> {
        self.state
            .groups
            .iter()
            .filter(|g| {
                g.active
                    && !g.disabled
                    && self
                        .state
                        .choices
                        .iter()
                        .any(|c| c.group_id == Some(g.id) && c.active && !c.disabled)
            })
            .collect()
    }

    /// Choices eligible for fuzzy matching: neither disabled nor placeholders.
    ///
    /// The search filter flag is ignored here, otherwise a narrowed query
    /// could never widen again.
    #[must_use]
    pub fn searchable_choices(&self) -> Vec<&Choice> {
        self.state
            .choices
            .iter()
            .filter(|c| !c.disabled && !c.placeholder)
            .collect()
    }

    /// First active placeholder choice.
    #[must_use]
    pub fn placeholder_choice(&self) -> Option<&Choice> {
        self.state
            .choices
            .iter()
            .find(|c| c.placeholder && c.active)
    }

    #[must_use]
    pub fn choice_by_id(&self, id: ChoiceId) -> Option<&Choice> {
        self.state.choices.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn group_by_id(&self, id: GroupId) -> Option<&Group> {
        self.state.groups.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn has_inactive_choices(&self) -> bool {
        self.state.choices.iter().any(|c| !c.active)
    }
}
