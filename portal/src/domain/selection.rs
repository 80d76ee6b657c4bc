//! Course cart and its promotion to enrollment.
//!
//! The selection set is the in-progress cart; the enrollment set is whatever
//! the cart held at the most recent commit. Every operation is an in-memory
//! mutation that cannot fail.

use tracing::debug;

use crate::domain::course::{CourseId, CourseRef};

/// Selection and enrollment state for one running portal.
///
/// ## Invariants
/// - `selected` holds at most one entry per course id, in insertion order.
/// - `enrolled` equals `selected` as it stood at the last commit; later
///   toggles never touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected: Vec<CourseRef>,
    enrolled: Vec<CourseRef>,
}

impl SelectionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `course` to the cart, or remove it when its id is already there.
    ///
    /// Returns `true` when the course is selected after the call. Two toggles
    /// of the same id in a row restore the original membership.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{CourseRef, SelectionStore};
    ///
    /// let mut store = SelectionStore::new();
    /// let course = CourseRef::try_from_parts("CSE201", "Data Structures", 3).unwrap();
    /// assert!(store.toggle_selection(course.clone()));
    /// assert!(!store.toggle_selection(course));
    /// assert!(store.selected().is_empty());
    /// ```
    pub fn toggle_selection(&mut self, course: CourseRef) -> bool {
        if let Some(position) = self
            .selected
            .iter()
            .position(|entry| entry.id() == course.id())
        {
            let removed = self.selected.remove(position);
            debug!(course_id = %removed.id(), "course deselected");
            false
        } else {
            debug!(course_id = %course.id(), "course selected");
            self.selected.push(course);
            true
        }
    }

    /// Replace the enrollment set with the current cart and empty the cart.
    ///
    /// An empty cart still replaces the enrollment, leaving it empty.
    pub fn commit_enrollment(&mut self) {
        self.enrolled = std::mem::take(&mut self.selected);
        debug!(enrolled = self.enrolled.len(), "enrollment committed");
    }

    /// Empty the enrollment set; the cart is untouched.
    pub fn clear_enrollment(&mut self) {
        self.enrolled.clear();
        debug!("enrollment cleared");
    }

    /// Cart entries in insertion order.
    #[must_use]
    pub fn selected(&self) -> &[CourseRef] {
        &self.selected
    }

    /// Enrolled courses from the most recent commit.
    #[must_use]
    pub fn enrolled(&self) -> &[CourseRef] {
        &self.enrolled
    }

    /// Whether a course with `id` is in the cart.
    #[must_use]
    pub fn is_selected(&self, id: &CourseId) -> bool {
        self.selected.iter().any(|entry| entry.id() == id)
    }

    /// Credit total of the cart, as shown on the registration bill.
    #[must_use]
    pub fn selected_credits(&self) -> u32 {
        total_credits(&self.selected)
    }

    /// Credit total of the enrollment.
    #[must_use]
    pub fn enrolled_credits(&self) -> u32 {
        total_credits(&self.enrolled)
    }
}

fn total_credits(courses: &[CourseRef]) -> u32 {
    courses.iter().map(CourseRef::credit).sum()
}
