/// Choices domain layer: store, reducers, search, highlight and policy.
pub mod action;
pub mod config;
pub mod element;
pub mod engine;
pub mod errors;
pub mod event;
pub mod highlight;
pub mod mode;
pub mod model;
pub mod policy;
pub mod reducers;
pub mod search;
pub mod store;
pub mod view;

pub use config::{Config, ItemSpec, PresetEntry};
pub use element::{OptgroupSpec, OptionSpec, SourceElement};
pub use engine::{Choices, LoadToken};
pub use errors::ChoicesError;
pub use event::Event;
pub use highlight::{Boundary, Direction};
pub use mode::Mode;
pub use model::{Choice, ChoiceId, Group, GroupId, Item, ItemId};
pub use policy::AddItemResponse;
pub use search::{SearchIndex, SearchField};
pub use store::{State, Store};
pub use view::{DropdownView, Row};
