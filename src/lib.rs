#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! choicekit: state, search and highlight engine for choices-style select and tag inputs.

pub mod choices;
