/// Keyboard/pointer highlight cursor over the selectable choices of the dropdown.
///
/// The cursor only knows the ordered ids it is handed; the caller recomputes
/// that list from the dropdown view after every render.
use serde::{Deserialize, Serialize};

use super::model::ChoiceId;

/// A directional intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
}

impl Direction {
    fn is_forward(self) -> bool {
        matches!(self, Self::Down | Self::PageDown)
    }

    fn is_page(self) -> bool {
        matches!(self, Self::PageUp | Self::PageDown)
    }
}

/// What happens when stepping past either end of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    /// Leave the highlight where it is.
    #[default]
    Stop,
    /// Continue from the opposite end.
    Wrap,
}

/// Highlight position among selectable choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightCursor {
    position: usize,
    highlighted: Option<ChoiceId>,
    boundary: Boundary,
}

impl HighlightCursor {
    #[must_use]
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            ..Self::default()
        }
    }

    /// Currently highlighted choice.
    #[must_use]
    pub fn highlighted(&self) -> Option<ChoiceId> {
        self.highlighted
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Return to the top of the list (after a new search).
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Re-resolve after the list was regenerated.
    ///
    /// Keeps the remembered position if it still exists, otherwise falls back
    /// to the last choice. An empty list clears the highlight.
    pub fn resolve(&mut self, selectable: &[ChoiceId]) -> Option<ChoiceId> {
        self.highlighted = selectable
            .get(self.position)
            .or_else(|| selectable.last())
            .copied();
        self.highlighted
    }

    /// Highlight `id` directly (pointer hover). Ids not in the list are ignored.
    pub fn hover(&mut self, selectable: &[ChoiceId], id: ChoiceId) -> Option<ChoiceId> {
        if let Some(pos) = selectable.iter().position(|c| *c == id) {
            self.set(pos, id);
            return Some(id);
        }
        None
    }

    /// Move in `direction`. `skip` jumps straight to the end (modifier key).
    ///
    /// Returns the newly highlighted choice, or `None` when nothing moved.
    pub fn step(
        &mut self,
        selectable: &[ChoiceId],
        direction: Direction,
        skip: bool,
    ) -> Option<ChoiceId> {
        let last = selectable.len().checked_sub(1)?;
        let forward = direction.is_forward();

        let target = if skip || direction.is_page() {
            if forward { last } else { 0 }
        } else {
            let current = self
                .highlighted
                .and_then(|h| selectable.iter().position(|c| *c == h));
            match current {
                None => 0,
                Some(i) if forward && i < last => i + 1,
                Some(i) if !forward && i > 0 => i - 1,
                Some(_) => match self.boundary {
                    Boundary::Stop => return None,
                    Boundary::Wrap if forward => 0,
                    Boundary::Wrap => last,
                },
            }
        };

        let id = selectable[target];
        self.set(target, id);
        Some(id)
    }

    fn set(&mut self, position: usize, id: ChoiceId) {
        self.position = position;
        self.highlighted = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<ChoiceId> {
        raw.iter().copied().map(ChoiceId).collect()
    }

    #[test]
    fn test_first_step_highlights_first() {
        let list = ids(&[4, 5, 6]);
        let mut cursor = HighlightCursor::default();
        assert_eq!(cursor.step(&list, Direction::Down, false), Some(ChoiceId(4)));
    }

    #[test]
    fn test_step_down_and_up() {
        let list = ids(&[1, 2, 3]);
        let mut cursor = HighlightCursor::default();
        cursor.resolve(&list);
        assert_eq!(cursor.step(&list, Direction::Down, false), Some(ChoiceId(2)));
        assert_eq!(cursor.step(&list, Direction::Down, false), Some(ChoiceId(3)));
        assert_eq!(cursor.step(&list, Direction::Up, false), Some(ChoiceId(2)));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_stop_at_boundary_keeps_highlight() {
        let list = ids(&[1, 2]);
        let mut cursor = HighlightCursor::default();
        cursor.resolve(&list);
        assert_eq!(cursor.step(&list, Direction::Up, false), None);
        assert_eq!(cursor.highlighted(), Some(ChoiceId(1)));
    }

    #[test]
    fn test_wrap_at_boundary() {
        let list = ids(&[1, 2, 3]);
        let mut cursor = HighlightCursor::new(Boundary::Wrap);
        cursor.resolve(&list);
        assert_eq!(cursor.step(&list, Direction::Up, false), Some(ChoiceId(3)));
        assert_eq!(cursor.step(&list, Direction::Down, false), Some(ChoiceId(1)));
    }

    #[test]
    fn test_page_and_skip_jump_to_ends() {
        let list = ids(&[1, 2, 3, 4]);
        let mut cursor = HighlightCursor::default();
        assert_eq!(cursor.step(&list, Direction::PageDown, false), Some(ChoiceId(4)));
        assert_eq!(cursor.step(&list, Direction::Up, true), Some(ChoiceId(1)));
    }

    #[test]
    fn test_resolve_falls_back_to_last() {
        let mut cursor = HighlightCursor::default();
        let long = ids(&[1, 2, 3, 4]);
        cursor.hover(&long, ChoiceId(4));
        assert_eq!(cursor.resolve(&ids(&[7, 8])), Some(ChoiceId(8)));
        assert_eq!(cursor.resolve(&[]), None);
    }

    #[test]
    fn test_empty_list_never_moves() {
        let mut cursor = HighlightCursor::default();
        assert_eq!(cursor.step(&[], Direction::Down, false), None);
        assert_eq!(cursor.hover(&[], ChoiceId(1)), None);
    }
}
