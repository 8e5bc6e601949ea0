/// The `Choices` controller: one engine for every mode.
///
/// UI layers call the intent handlers (`on_*`) and public operations, then
/// re-read the derived views and drain the emitted events. All work happens
/// synchronously on the caller's thread.
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::action::{self, NewChoice, NewItem};
use super::config::{ChoiceSpec, Config, GroupSpec, ItemSpec, PresetEntry};
use super::element::{OptionSpec, SourceElement};
use super::errors::ChoicesError;
use super::event::Event;
use super::highlight::{Direction, HighlightCursor};
use super::mode::Mode;
use super::model::{key, Choice, ChoiceId, GroupId, Item, ItemId};
use super::policy::{self, AddItemResponse};
use super::search::{fetch_path, SearchIndex};
use super::store::{State, Store, Subscription};
use super::view::{self, DropdownView};

/// Identifies one asynchronous load. Only the newest token is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

/// A candidate choice before it reaches the store.
struct ChoiceDraft {
    value: String,
    label: String,
    selected: bool,
    disabled: bool,
    placeholder: bool,
    group_id: Option<GroupId>,
    custom_properties: Value,
}

/// A candidate item before it reaches the store.
struct ItemDraft {
    value: String,
    label: Option<String>,
    choice_id: Option<ChoiceId>,
    group_id: Option<GroupId>,
    placeholder: bool,
    custom_properties: Value,
    key_code: Option<u32>,
}

impl ItemDraft {
    fn raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            choice_id: None,
            group_id: None,
            placeholder: false,
            custom_properties: Value::Null,
            key_code: None,
        }
    }

    fn from_choice(choice: &Choice, key_code: Option<u32>) -> Self {
        Self {
            value: choice.value.clone(),
            label: Some(choice.label.clone()),
            choice_id: Some(choice.id),
            group_id: choice.group_id,
            placeholder: choice.placeholder,
            custom_properties: choice.custom_properties.clone(),
            key_code,
        }
    }
}

/// An enhanced select or text input.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct Choices {
    mode: Mode,
    config: Config,
    element: SourceElement,
    filter: Option<Regex>,
    store: Store,
    initial: State,
    cursor: HighlightCursor,
    events: Vec<Event>,
    /// Text currently in the search/text input.
    input: String,
    /// Last accepted search query.
    current_value: String,
    is_searching: bool,
    can_search: bool,
    is_open: bool,
    enabled: bool,
    initialised: bool,
    loading: bool,
    next_choice_id: u32,
    next_item_id: u32,
    latest_load: u64,
}

impl Choices {
    /// Build and initialise a control for `element`.
    ///
    /// # Errors
    ///
    /// Returns `ChoicesError::UnrecognisedElement` when the element type is not
    /// `text`, `select-one` or `select-multiple`, and
    /// `ChoicesError::InvalidRegex` when `regex_filter` does not compile.
    pub fn new(element: SourceElement, config: Config) -> Result<Self, ChoicesError> {
        let mode = Mode::from_element_type(&element.kind)?;
        let filter = config
            .regex_filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ChoicesError::InvalidRegex {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .transpose()?;

        if !config.silent {
            if element.already_active {
                warn!("Trying to initialise Choices on element already initialised");
            }
            if config.should_sort_items && mode == Mode::SelectOne {
                warn!("shouldSortItems has no effect on select-one elements");
            }
        }

        let mut choices = Self {
            mode,
            can_search: mode.is_select() && config.search_enabled,
            enabled: config.add_items,
            cursor: HighlightCursor::new(config.highlight_boundary),
            config,
            element,
            filter,
            store: Store::new(),
            initial: State::default(),
            events: Vec::new(),
            input: String::new(),
            current_value: String::new(),
            is_searching: false,
            is_open: false,
            initialised: false,
            loading: false,
            next_choice_id: 1,
            next_item_id: 1,
            latest_load: 0,
        };
        choices.init();
        Ok(choices)
    }

    /// Ingest presets and capture the form-reset snapshot. No-op when already initialised.
    pub fn init(&mut self) {
        if self.initialised {
            return;
        }
        self.ingest_presets();
        self.initial = self.store.snapshot();
        self.initialised = true;
        // Presets do not count as user activity.
        self.events.clear();
    }

    /// Drop all state and mark the control uninitialised.
    pub fn destroy(&mut self) {
        if !self.initialised {
            return;
        }
        self.store.dispatch(&action::clear_all());
        self.initial = State::default();
        self.cursor.reset();
        self.input.clear();
        self.current_value.clear();
        self.is_searching = false;
        self.is_open = false;
        self.initialised = false;
    }

    // --- Accessors ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// Text currently in the input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The choice under the highlight cursor.
    #[must_use]
    pub fn highlighted_choice(&self) -> Option<ChoiceId> {
        self.cursor.highlighted()
    }

    /// Events emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&State) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: Subscription) {
        self.store.unsubscribe(handle);
    }

    // --- Values ---

    /// Active items in display order.
    #[must_use]
    pub fn get_value(&self) -> Vec<&Item> {
        view::item_list(&self.store, &self.config, self.mode)
    }

    /// Values of the active items in display order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.get_value().into_iter().map(|i| i.value.clone()).collect()
    }

    /// Add items directly. On select elements each value also creates a
    /// selected choice.
    pub fn set_value(&mut self, values: &[ItemSpec]) {
        if !self.initialised {
            return;
        }
        for spec in values {
            match spec {
                ItemSpec::Value(value) if self.mode.is_select() => {
                    self.add_choice(ChoiceDraft {
                        value: value.clone(),
                        label: value.clone(),
                        selected: true,
                        disabled: false,
                        placeholder: false,
                        group_id: None,
                        custom_properties: Value::Null,
                    });
                }
                ItemSpec::Value(value) => self.add_item(ItemDraft::raw(value.clone())),
                ItemSpec::Full {
                    value,
                    label,
                    custom_properties,
                    placeholder,
                    ..
                } if self.mode.is_select() => {
                    self.add_choice(ChoiceDraft {
                        value: value.clone(),
                        label: label.clone().unwrap_or_else(|| value.clone()),
                        selected: true,
                        disabled: false,
                        placeholder: *placeholder,
                        group_id: None,
                        custom_properties: custom_properties.clone(),
                    });
                }
                full @ ItemSpec::Full { .. } => self.add_preset_item(full),
            }
        }
    }

    /// Select the first choice matching each value. Disabled and already
    /// selected choices are skipped.
    pub fn set_choice_by_value(&mut self, values: &[&str]) {
        if !self.initialised || !self.mode.is_select() {
            return;
        }
        for value in values {
            let found = self
                .store
                .choices()
                .iter()
                .find(|c| self.config.item_comparer.matches(&c.value, value))
                .filter(|c| !c.selected && !c.disabled)
                .map(|c| ItemDraft::from_choice(c, None));
            if let Some(draft) = found {
                self.add_item(draft);
            }
        }
    }

    /// Add choices (and groups with a nested `choices` array) from JSON.
    ///
    /// `value_key` and `label_key` may be dotted paths. With `replace` the
    /// existing choices are cleared first.
    pub fn set_choices(&mut self, entries: &[Value], value_key: &str, label_key: &str, replace: bool) {
        if !self.initialised || !self.mode.is_select() {
            return;
        }
        if replace {
            self.store.dispatch(&action::clear_choices());
        }
        self.ingest_json(entries, value_key, label_key);
    }

    /// Remove every item, choice and group.
    pub fn clear_store(&mut self) {
        self.store.dispatch(&action::clear_all());
    }

    /// Empty the input and end any search.
    pub fn clear_input(&mut self) {
        self.input.clear();
        if self.can_search {
            self.is_searching = false;
            self.store.dispatch(&action::activate_choices(true));
        }
    }

    // --- Item highlighting and removal ---

    pub fn highlight_item(&mut self, id: ItemId) {
        self.set_item_highlight(id, true, true);
    }

    pub fn unhighlight_item(&mut self, id: ItemId) {
        self.set_item_highlight(id, false, true);
    }

    pub fn highlight_all(&mut self) {
        for id in self.item_ids(|_| true) {
            self.highlight_item(id);
        }
    }

    pub fn unhighlight_all(&mut self) {
        for id in self.item_ids(|_| true) {
            self.unhighlight_item(id);
        }
    }

    /// Remove every item except `except`.
    pub fn remove_active_items(&mut self, except: Option<ItemId>) {
        for id in self.item_ids(|i| Some(i.id) != except) {
            self.remove_item(id);
        }
    }

    pub fn remove_active_items_by_value(&mut self, value: &str) {
        for id in self.item_ids(|i| i.value == value) {
            self.remove_item(id);
        }
    }

    /// Remove highlighted items, optionally emitting a change event for each.
    pub fn remove_highlighted_items(&mut self, emit_change: bool) {
        for id in self.item_ids(|i| i.highlighted) {
            if let Some(value) = self.remove_item(id)
                && emit_change
            {
                self.events.push(Event::Change { value });
            }
        }
    }

    // --- Intent handlers ---

    /// Handle typing in the search input. Returns the number of matches.
    pub fn on_search_input(&mut self, text: &str) -> usize {
        self.input = text.to_owned();
        if !self.enabled || !self.can_search {
            return 0;
        }

        let query = text.trim();
        if query.is_empty() || query.chars().count() < self.config.search_floor {
            self.restore_choices();
            return 0;
        }
        if text == format!("{} ", self.current_value) {
            return 0;
        }

        let result_count = if self.config.search_choices {
            self.search_choices(query)
        } else {
            0
        };
        self.events.push(Event::Search {
            value: query.to_owned(),
            result_count,
        });
        result_count
    }

    /// Move the highlight cursor, opening the dropdown first if needed.
    pub fn on_directional_intent(&mut self, direction: Direction, skip: bool) -> Option<ChoiceId> {
        if !self.enabled || (self.mode.accepts_free_text() && !self.is_open) {
            return None;
        }
        self.show_dropdown();
        let selectable = self.dropdown_view().selectable();
        self.cursor.step(&selectable, direction, skip)
    }

    /// Highlight the choice under the pointer.
    pub fn on_choice_hover(&mut self, id: ChoiceId) -> Option<ChoiceId> {
        let selectable = self.dropdown_view().selectable();
        self.cursor.hover(&selectable, id)
    }

    /// Select the highlighted choice (Enter with the dropdown open).
    pub fn on_select_intent(&mut self) -> Option<AddItemResponse> {
        if !self.is_open {
            return None;
        }
        let id = self.cursor.highlighted()?;
        self.select_choice(id, Some(key::ENTER))
    }

    /// Select a choice by pointer.
    pub fn on_choice_click(&mut self, id: ChoiceId) -> Option<AddItemResponse> {
        self.select_choice(id, None)
    }

    /// Add the typed value as an item (Enter in a text input).
    pub fn on_enter_text(&mut self) -> Option<AddItemResponse> {
        if !self.enabled
            || !self.config.add_items
            || !self.mode.accepts_free_text()
            || self.input.is_empty()
        {
            return None;
        }
        let value = self.input.trim().to_owned();
        let gate = self.can_add(&value);
        if gate.response {
            self.hide_dropdown();
            let mut draft = ItemDraft::raw(value.clone());
            draft.key_code = Some(key::ENTER);
            self.add_item(draft);
            self.events.push(Event::Change { value });
            self.clear_input();
        }
        Some(gate)
    }

    /// The notice to show while typing in a text input.
    #[must_use]
    pub fn text_notice(&self) -> Option<AddItemResponse> {
        if !self.mode.accepts_free_text() || self.input.is_empty() {
            return None;
        }
        Some(self.can_add(self.input.trim()))
    }

    /// Backspace/Delete with an empty input.
    pub fn on_backspace(&mut self) {
        if !self.enabled
            || !self.config.remove_items
            || !self.input.is_empty()
            || self.mode.is_exclusive()
        {
            return;
        }
        let Some(last) = self.store.items().last().cloned() else {
            return;
        };
        let has_highlighted = self.store.items().iter().any(|i| i.highlighted);

        if self.config.edit_items && !has_highlighted {
            self.input.clone_from(&last.value);
            if let Some(value) = self.remove_item(last.id) {
                self.events.push(Event::Change { value });
            }
            return;
        }
        if !has_highlighted {
            self.set_item_highlight(last.id, true, false);
        }
        self.remove_highlighted_items(true);
    }

    /// Ctrl/Cmd+A with an empty input.
    pub fn on_select_all(&mut self) {
        if self.enabled && self.config.remove_items && self.input.is_empty() {
            self.highlight_all();
        }
    }

    /// Click on an item. Without `shift` every other item is unhighlighted.
    pub fn on_item_click(&mut self, id: ItemId, shift: bool) {
        if !self.enabled || !self.config.remove_items || self.mode.is_exclusive() {
            return;
        }
        let updates: Vec<(ItemId, bool)> = self
            .store
            .items()
            .iter()
            .filter_map(|item| {
                if item.id == id && !item.highlighted {
                    Some((item.id, true))
                } else if !shift && item.id != id && item.highlighted {
                    Some((item.id, false))
                } else {
                    None
                }
            })
            .collect();
        for (item, highlighted) in updates {
            self.set_item_highlight(item, highlighted, true);
        }
    }

    /// Click on an item's remove button.
    pub fn on_remove_button(&mut self, id: ItemId) {
        if !self.enabled || !self.config.remove_item_button {
            return;
        }
        if let Some(value) = self.remove_item(id) {
            self.events.push(Event::Change { value });
            if self.mode.reselects_placeholder() {
                self.select_placeholder_choice();
            }
        }
    }

    pub fn on_escape(&mut self) {
        self.hide_dropdown();
    }

    /// Restore the state captured at initialisation.
    pub fn form_reset(&mut self) {
        let snapshot = self.initial.clone();
        self.store.dispatch(&action::reset_to(&snapshot));
    }

    // --- Dropdown ---

    /// Open the dropdown. Returns whether it was closed.
    pub fn show_dropdown(&mut self) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        self.events.push(Event::ShowDropdown);
        true
    }

    /// Close the dropdown. Returns whether it was open.
    pub fn hide_dropdown(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.is_open = false;
        self.events.push(Event::HideDropdown);
        true
    }

    pub fn toggle_dropdown(&mut self) {
        if !self.hide_dropdown() {
            self.show_dropdown();
        }
    }

    /// Render the dropdown and re-resolve the highlight cursor against it.
    pub fn dropdown_view(&mut self) -> DropdownView {
        let gate = self.can_add(&self.input);
        let view = view::dropdown(&self.store, &self.config, self.is_searching, &gate);
        self.cursor.resolve(&view.selectable());
        view
    }

    // --- Enable / disable ---

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.hide_dropdown();
    }

    // --- Async ingestion ---

    /// Start a load. Any earlier unfinished load becomes stale.
    pub fn begin_load(&mut self) -> LoadToken {
        self.latest_load += 1;
        self.loading = true;
        LoadToken(self.latest_load)
    }

    /// Ingest the results of the load identified by `token`.
    ///
    /// Returns `false` and ignores `results` when a newer load was started.
    pub fn complete_load(
        &mut self,
        token: LoadToken,
        results: &[Value],
        value_key: &str,
        label_key: &str,
    ) -> bool {
        if token.0 != self.latest_load {
            debug!(token = token.0, latest = self.latest_load, "discarding stale load");
            return false;
        }
        self.loading = false;
        self.ingest_json(results, value_key, label_key);
        if self.mode.reselects_placeholder() {
            self.select_placeholder_choice();
        }
        true
    }

    // --- Internals ---

    fn can_add(&self, value: &str) -> AddItemResponse {
        policy::can_add_item(
            self.mode,
            &self.config,
            self.filter.as_ref(),
            &self.store.active_items(),
            value,
        )
    }

    fn search_choices(&mut self, query: &str) -> usize {
        let index = SearchIndex::new(
            self.store.searchable_choices(),
            &self.config.search_fields,
            &self.config.fuzzy,
        );
        let results = index.search(query);
        let count = results.len();
        debug!(query, candidates = index.len(), matches = count, "search");

        query.clone_into(&mut self.current_value);
        self.cursor.reset();
        self.is_searching = true;
        self.store.dispatch(&action::filter_choices(results));
        count
    }

    fn restore_choices(&mut self) {
        if self.store.has_inactive_choices() {
            self.is_searching = false;
            self.store.dispatch(&action::activate_choices(true));
        }
    }

    fn select_choice(&mut self, id: ChoiceId, key_code: Option<u32>) -> Option<AddItemResponse> {
        if !self.enabled {
            return None;
        }
        let choice = self.store.choice_by_id(id).filter(|c| !c.disabled)?.clone();
        self.events.push(Event::Choice {
            id: choice.id,
            value: choice.value.clone(),
            label: choice.label.clone(),
            key_code,
        });

        let gate = self.can_add(&choice.value);
        if gate.response && !choice.selected {
            self.add_item(ItemDraft::from_choice(&choice, key_code));
            self.events.push(Event::Change {
                value: choice.value.clone(),
            });
        }

        self.clear_input();
        if self.mode.closes_on_select() {
            self.hide_dropdown();
        }
        Some(gate)
    }

    fn select_placeholder_choice(&mut self) {
        let Some(placeholder) = self.store.placeholder_choice().cloned() else {
            return;
        };
        self.add_item(ItemDraft::from_choice(&placeholder, None));
        self.events.push(Event::Change {
            value: placeholder.value,
        });
    }

    fn item_ids(&self, keep: impl Fn(&Item) -> bool) -> Vec<ItemId> {
        self.store
            .items()
            .iter()
            .filter(|i| keep(i))
            .map(|i| i.id)
            .collect()
    }

    fn group_value(&self, id: Option<GroupId>) -> Option<String> {
        id.and_then(|id| self.store.group_by_id(id))
            .map(|g| g.value.clone())
    }

    fn set_item_highlight(&mut self, id: ItemId, highlighted: bool, emit: bool) {
        let Some(item) = self.store.items().iter().find(|i| i.id == id).cloned() else {
            return;
        };
        if !self.store.dispatch(&action::highlight_item(id, highlighted)) || !emit {
            return;
        }
        self.events.push(Event::HighlightItem {
            id,
            value: item.value,
            label: item.label,
            highlighted,
            group_value: self.group_value(item.group_id),
        });
    }

    fn add_choice(&mut self, draft: ChoiceDraft) -> ChoiceId {
        let id = ChoiceId(self.next_choice_id);
        self.next_choice_id += 1;
        self.store.dispatch(&action::add_choice(NewChoice {
            id,
            value: draft.value.clone(),
            label: draft.label.clone(),
            group_id: draft.group_id,
            disabled: draft.disabled,
            placeholder: draft.placeholder,
            custom_properties: draft.custom_properties.clone(),
            key_code: None,
        }));
        if draft.selected {
            self.add_item(ItemDraft {
                value: draft.value,
                label: Some(draft.label),
                choice_id: Some(id),
                group_id: draft.group_id,
                placeholder: draft.placeholder,
                custom_properties: draft.custom_properties,
                key_code: None,
            });
        }
        id
    }

    fn add_group(&mut self, spec: &GroupSpec) {
        let id = GroupId(spec.id.unwrap_or_else(|| u64::from(rand::random::<u32>())));
        self.store
            .dispatch(&action::add_group(spec.label.clone(), id, true, spec.disabled));
        for choice in &spec.choices {
            self.add_choice(ChoiceDraft {
                value: choice.value.clone(),
                label: choice.label.clone().unwrap_or_else(|| choice.value.clone()),
                selected: choice.selected,
                disabled: choice.disabled || spec.disabled,
                placeholder: choice.placeholder,
                group_id: Some(id),
                custom_properties: choice.custom_properties.clone(),
            });
        }
    }

    fn add_item(&mut self, draft: ItemDraft) {
        let prefix = self.config.prepend_value.as_deref().unwrap_or_default();
        let suffix = self.config.append_value.as_deref().unwrap_or_default();
        let value = format!("{prefix}{}{suffix}", draft.value.trim());
        let label = draft.label.unwrap_or_else(|| value.clone());

        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        self.store.dispatch(&action::add_item(NewItem {
            id,
            choice_id: draft.choice_id,
            value: value.clone(),
            label: label.clone(),
            group_id: draft.group_id,
            placeholder: draft.placeholder,
            custom_properties: draft.custom_properties.clone(),
            key_code: draft.key_code,
        }));

        if self.mode.is_exclusive() {
            self.remove_active_items(Some(id));
        }

        self.events.push(Event::AddItem {
            id,
            value,
            label,
            custom_properties: draft.custom_properties,
            group_value: self.group_value(draft.group_id),
            key_code: draft.key_code,
        });
    }

    /// Remove one item, emitting `removeItem`. Returns the removed value.
    fn remove_item(&mut self, id: ItemId) -> Option<String> {
        let item = self.store.items().iter().find(|i| i.id == id).cloned()?;
        self.store
            .dispatch(&action::remove_item(item.id, item.choice_id));
        self.events.push(Event::RemoveItem {
            id: item.id,
            value: item.value.clone(),
            label: item.label,
            group_value: self.group_value(item.group_id),
        });
        Some(item.value)
    }

    fn add_preset_item(&mut self, spec: &ItemSpec) {
        let draft = match spec {
            ItemSpec::Value(value) => ItemDraft::raw(value.clone()),
            ItemSpec::Full {
                value,
                label,
                id,
                custom_properties,
                placeholder,
            } => {
                let choice = id
                    .map(ChoiceId)
                    .and_then(|id| self.store.choice_by_id(id));
                ItemDraft {
                    value: value.clone(),
                    label: label.clone(),
                    choice_id: choice.map(|c| c.id),
                    group_id: choice.and_then(|c| c.group_id),
                    placeholder: *placeholder,
                    custom_properties: custom_properties.clone(),
                    key_code: None,
                }
            }
        };
        self.add_item(draft);
    }

    fn ingest_presets(&mut self) {
        if self.mode.is_select() {
            let mut lead = Vec::new();
            let mut presets = self.config.choices.clone();
            if self.element.optgroups.is_empty() {
                presets.extend(self.element.options.iter().map(option_entry));
            } else {
                if let Some(placeholder) = &self.element.placeholder_option {
                    let mut entry = option_spec(placeholder);
                    entry.placeholder = true;
                    lead.push(PresetEntry::Choice(entry));
                }
                lead.extend(self.element.optgroups.iter().map(|group| {
                    PresetEntry::Group(GroupSpec {
                        label: group.label.clone(),
                        id: group.id,
                        disabled: group.disabled,
                        choices: group.options.iter().map(option_spec).collect(),
                    })
                }));
            }
            if self.config.should_sort {
                let sort_fn = self.config.sort_fn.clone();
                presets.sort_by(|a, b| {
                    let key = |e: &PresetEntry| match e {
                        PresetEntry::Choice(c) => (!c.placeholder, display_label(c)),
                        PresetEntry::Group(g) => (true, g.label.clone()),
                    };
                    let (a, b) = (key(a), key(b));
                    a.0.cmp(&b.0).then_with(|| sort_fn.compare(&a.1, &b.1))
                });
            }

            let entries: Vec<PresetEntry> = lead.into_iter().chain(presets).collect();
            let has_selected = entries.iter().any(|e| match e {
                PresetEntry::Choice(c) => c.selected,
                PresetEntry::Group(g) => g.choices.iter().any(|c| c.selected),
            });
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    PresetEntry::Group(group) => self.add_group(group),
                    PresetEntry::Choice(choice) => {
                        let preselect =
                            self.mode.preselects_first() && !has_selected && index == 0;
                        self.add_choice(ChoiceDraft {
                            value: choice.value.clone(),
                            label: display_label(choice),
                            selected: preselect || choice.selected,
                            disabled: !preselect && choice.disabled,
                            placeholder: choice.placeholder,
                            group_id: None,
                            custom_properties: choice.custom_properties.clone(),
                        });
                    }
                }
            }
        }

        let mut items = self.config.items.clone();
        if self.mode.accepts_free_text()
            && let Some(raw) = self.element.value.as_deref().filter(|v| !v.is_empty())
        {
            items.extend(
                raw.split(self.config.delimiter.as_str())
                    .map(|v| ItemSpec::Value(v.to_owned())),
            );
        }
        for spec in &items {
            self.add_preset_item(spec);
        }
    }

    fn ingest_json(&mut self, entries: &[Value], value_key: &str, label_key: &str) {
        for entry in entries {
            if let Some(children) = entry.get("choices").and_then(Value::as_array) {
                let group = GroupSpec {
                    label: entry
                        .get("label")
                        .and_then(json_text)
                        .unwrap_or_default(),
                    id: entry.get("id").and_then(Value::as_u64),
                    disabled: json_flag(entry, "disabled"),
                    choices: children
                        .iter()
                        .filter_map(|c| json_choice(c, value_key, label_key))
                        .collect(),
                };
                self.add_group(&group);
            } else if let Some(choice) = json_choice(entry, value_key, label_key) {
                self.add_choice(ChoiceDraft {
                    label: display_label(&choice),
                    value: choice.value,
                    selected: choice.selected,
                    disabled: choice.disabled,
                    placeholder: choice.placeholder,
                    group_id: None,
                    custom_properties: choice.custom_properties,
                });
            }
        }
    }
}

fn option_spec(option: &OptionSpec) -> ChoiceSpec {
    ChoiceSpec {
        value: option.value.clone(),
        label: Some(option.label.clone()).filter(|l| !l.is_empty()),
        selected: option.selected,
        disabled: option.disabled,
        placeholder: option.placeholder,
        custom_properties: Value::Null,
    }
}

fn option_entry(option: &OptionSpec) -> PresetEntry {
    PresetEntry::Choice(option_spec(option))
}

fn display_label(choice: &ChoiceSpec) -> String {
    choice.label.clone().unwrap_or_else(|| choice.value.clone())
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_flag(entry: &Value, key: &str) -> bool {
    entry.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn json_choice(entry: &Value, value_key: &str, label_key: &str) -> Option<ChoiceSpec> {
    let value = fetch_path(entry, value_key).and_then(json_text)?;
    Some(ChoiceSpec {
        label: fetch_path(entry, label_key).and_then(json_text),
        value,
        selected: json_flag(entry, "selected"),
        disabled: json_flag(entry, "disabled"),
        placeholder: json_flag(entry, "placeholder"),
        custom_properties: entry.get("customProperties").cloned().unwrap_or_default(),
    })
}
