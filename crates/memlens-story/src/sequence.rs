use crate::{Panel, StoryError};
use std::sync::Arc;

/// Ordered panels plus the index of the one on screen.
///
/// Once built from a non-empty list, `current_index` always points at a
/// valid panel. The empty sequence exists only as the pre-load state.
#[derive(Debug, Clone, Default)]
pub struct PanelSequence {
    panels: Vec<Arc<Panel>>,
    current: usize,
}

impl PanelSequence {
    pub fn new(panels: Vec<Panel>) -> Result<Self, StoryError> {
        if panels.is_empty() {
            return Err(StoryError::Empty);
        }
        Ok(Self {
            panels: panels.into_iter().map(Arc::new).collect(),
            current: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Arc<Panel>> {
        self.panels.get(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Panel>> {
        self.panels.get(index)
    }

    /// Map any integer onto `[0, len)`, wrapping negatives from the end.
    pub fn normalize(&self, index: i64) -> Option<usize> {
        if self.panels.is_empty() {
            return None;
        }
        Some(index.rem_euclid(self.panels.len() as i64) as usize)
    }

    /// Make `index` (after wrapping) the current panel.
    pub fn select(&mut self, index: i64) -> Option<(usize, Arc<Panel>)> {
        let index = self.normalize(index)?;
        self.current = index;
        Some((index, Arc::clone(&self.panels[index])))
    }

    /// Index `next_panel` would move to, or `None` at the end without looping.
    pub fn next_index(&self, looping: bool) -> Option<usize> {
        if self.panels.is_empty() {
            return None;
        }
        let next = self.current + 1;
        if next < self.panels.len() {
            Some(next)
        } else if looping {
            Some(0)
        } else {
            None
        }
    }

    /// Index `prev_panel` would move to, or `None` at the start without looping.
    pub fn prev_index(&self, looping: bool) -> Option<usize> {
        if self.panels.is_empty() {
            return None;
        }
        if self.current > 0 {
            Some(self.current - 1)
        } else if looping {
            Some(self.panels.len() - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> PanelSequence {
        PanelSequence::new(vec![
            Panel::image("a", "a.jpg"),
            Panel::image("b", "b.jpg"),
            Panel::image("c", "c.jpg"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(PanelSequence::new(Vec::new()), Err(StoryError::Empty)));
    }

    #[test]
    fn normalize_wraps_in_both_directions() {
        for n in 1..=7usize {
            let seq = PanelSequence::new(
                (0..n).map(|i| Panel::image(format!("{i}"), "x.jpg")).collect(),
            )
            .unwrap();
            for k in -50i64..50 {
                let n = n as i64;
                let expected = (((k % n) + n) % n) as usize;
                assert_eq!(seq.normalize(k), Some(expected), "n={n} k={k}");
            }
        }
        assert_eq!(three().normalize(-1), Some(2));
    }

    #[test]
    fn empty_sequence_has_no_indices() {
        let seq = PanelSequence::default();
        assert_eq!(seq.normalize(3), None);
        assert_eq!(seq.next_index(true), None);
        assert_eq!(seq.prev_index(true), None);
        assert!(seq.current().is_none());
    }

    #[test]
    fn next_and_prev_respect_looping() {
        let mut seq = three();
        seq.select(2);
        assert_eq!(seq.next_index(false), None);
        assert_eq!(seq.next_index(true), Some(0));

        seq.select(0);
        assert_eq!(seq.prev_index(false), None);
        assert_eq!(seq.prev_index(true), Some(2));
    }

    #[test]
    fn select_returns_the_selected_panel() {
        let mut seq = three();
        let (index, panel) = seq.select(4).unwrap();
        assert_eq!(index, 1);
        assert_eq!(panel.title, "b");
        assert_eq!(seq.current_index(), 1);
    }
}
