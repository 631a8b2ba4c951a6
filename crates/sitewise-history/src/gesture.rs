#![forbid(unsafe_code)]

//! Scoped batches for pointer gestures.
//!
//! A drag starts on pointer-down and ends on pointer-up, with any number of
//! move events in between. [`Gesture`] ties the batch to a value so the end
//! cannot be forgotten:
//!
//! ```rust,ignore
//! let mut drag = history.gesture();
//! drag.update("shape-1", |a| moved(a, dx, dy))?;
//! drag.update("shape-1", |a| moved(a, dx2, dy2))?;
//! drop(drag); // one undo step
//! ```

use std::ops::{Deref, DerefMut};

use crate::history::HistoryManager;
use crate::item::HistoryItem;

/// RAII guard over one batch. Derefs to the manager.
///
/// Dropping the guard ends the batch. [`cancel`](Gesture::cancel) restores
/// the pre-gesture document instead. A guard created while another batch
/// is already open joins that batch and leaves ending it to its owner.
pub struct Gesture<'a, T: HistoryItem> {
    history: &'a mut HistoryManager<T>,
    owns_batch: bool,
}

impl<'a, T: HistoryItem> Gesture<'a, T> {
    pub(crate) fn begin(history: &'a mut HistoryManager<T>) -> Self {
        let owns_batch = !history.is_batch_active();
        history.start_batch();
        Self {
            history,
            owns_batch,
        }
    }

    /// End the gesture, recording it as one undo step.
    pub fn commit(self) {}

    /// Abandon the gesture and restore the document.
    ///
    /// Returns whether anything was rolled back; a guard that joined an
    /// outer batch rolls back nothing and leaves the outer batch open.
    pub fn cancel(self) -> bool {
        self.owns_batch && self.history.cancel_batch()
    }
}

impl<T: HistoryItem> Deref for Gesture<'_, T> {
    type Target = HistoryManager<T>;

    fn deref(&self) -> &Self::Target {
        self.history
    }
}

impl<T: HistoryItem> DerefMut for Gesture<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.history
    }
}

impl<T: HistoryItem> Drop for Gesture<'_, T> {
    fn drop(&mut self) {
        if self.owns_batch {
            self.history.end_batch();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::HistoryConfig;
    use crate::history::HistoryManager;
    use crate::item::{Annotation, Point, Shape};

    fn rect(id: &str, x: f64) -> Annotation {
        Annotation::new(
            id,
            Shape::Rect {
                origin: Point::new(x, 0.0),
                width: 10.0,
                height: 10.0,
            },
        )
    }

    fn origin_x(h: &HistoryManager<Annotation>, id: &str) -> f64 {
        match h.get(id).map(|a| &a.shape) {
            Some(Shape::Rect { origin, .. }) => origin.x,
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn drag_is_one_undo_step() {
        let mut h = HistoryManager::new(HistoryConfig::unlimited());
        h.add(rect("r", 0.0)).unwrap();

        {
            let mut drag = h.gesture();
            for _ in 0..30 {
                drag.update("r", |mut a| {
                    a.shape.translate(1.0, 0.0);
                    a
                })
                .unwrap();
            }
            assert!(drag.is_batch_active());
        }

        assert_eq!(origin_x(&h, "r"), 30.0);
        assert_eq!(h.undo_depth(), 2);
        h.undo().unwrap();
        assert_eq!(origin_x(&h, "r"), 0.0);
    }

    #[test]
    fn cancel_restores_pre_gesture_state() {
        let mut h = HistoryManager::new(HistoryConfig::unlimited());
        h.add(rect("r", 5.0)).unwrap();

        let mut drag = h.gesture();
        drag.update("r", |mut a| {
            a.shape.translate(50.0, 0.0);
            a
        })
        .unwrap();
        assert!(drag.cancel());

        assert_eq!(origin_x(&h, "r"), 5.0);
        assert_eq!(h.undo_depth(), 1);
        assert!(!h.is_batch_active());
    }

    #[test]
    fn explicit_commit_ends_batch() {
        let mut h = HistoryManager::<Annotation>::default();
        let mut g = h.gesture();
        g.add(rect("r", 0.0)).unwrap();
        g.commit();
        assert!(!h.is_batch_active());
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn inner_gesture_leaves_outer_batch_open() {
        let mut h = HistoryManager::<Annotation>::default();
        h.start_batch();
        {
            let mut inner = h.gesture();
            inner.add(rect("r", 0.0)).unwrap();
            assert!(!inner.cancel());
        }
        assert!(h.is_batch_active());
        assert_eq!(h.current().len(), 1);
        h.end_batch();
        assert_eq!(h.undo_depth(), 1);
    }
}
