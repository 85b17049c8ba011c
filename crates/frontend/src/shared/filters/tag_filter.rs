use contracts::domain::Tag;
use contracts::shared::{CombinationOperator, TagsFilter};

use crate::shared::observable::Observable;
use crate::shared::picker::TagPickerModel;

/// Tag selection plus the operator combining the selected tags.
///
/// Notifications of the inner picker are re-emitted on this filter's
/// observable, so a list model bubbling this filter sees picker changes too.
#[derive(Debug)]
pub struct TagFilterModel {
    picker: TagPickerModel,
    operator: CombinationOperator,
    default_operator: CombinationOperator,
    observable: Observable,
}

impl TagFilterModel {
    pub fn new(default_operator: CombinationOperator) -> Self {
        let picker = TagPickerModel::new(Vec::new(), true);
        let observable = Observable::new();
        picker.observable().bubble_to(&observable);

        Self {
            picker,
            operator: default_operator,
            default_operator,
            observable,
        }
    }

    pub fn picker(&self) -> &TagPickerModel {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut TagPickerModel {
        &mut self.picker
    }

    pub fn toggle_tag(&mut self, tag: Tag) {
        self.picker.toggle(tag);
    }

    pub fn operator(&self) -> CombinationOperator {
        self.operator
    }

    /// Notifies even if the operator is unchanged
    pub fn set_operator(&mut self, operator: CombinationOperator) {
        self.operator = operator;
        self.observable.notify();
    }

    pub fn reset(&mut self) {
        self.picker.reset();
        self.operator = self.default_operator;
    }

    pub fn is_empty(&self) -> bool {
        self.picker.is_empty()
    }

    /// Selected tag texts
    pub fn selected(&self) -> Vec<String> {
        self.picker.selected()
    }

    /// Query form, `None` when no tag is selected
    pub fn normalized(&self) -> Option<TagsFilter> {
        if self.is_empty() {
            return None;
        }
        Some(TagsFilter {
            values: self.selected().join(","),
            operation: self.operator,
        })
    }

    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl Default for TagFilterModel {
    fn default() -> Self {
        Self::new(CombinationOperator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted(observable: &Observable) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        observable.observe(move || counter.set(counter.get() + 1));
        count
    }

    #[test]
    fn test_picker_changes_bubble_up() {
        let mut filter = TagFilterModel::default();
        let parent = Observable::new();
        filter.observable().bubble_to(&parent);
        let notifications = counted(&parent);

        filter.toggle_tag(Tag::new(1, "FOOD"));
        filter.picker_mut().toggle_collapse();

        assert_eq!(notifications.get(), 2);
    }

    #[test]
    fn test_set_operator_always_notifies() {
        let mut filter = TagFilterModel::default();
        let notifications = counted(filter.observable());

        filter.set_operator(CombinationOperator::And);
        filter.set_operator(CombinationOperator::And);

        assert_eq!(notifications.get(), 2);
    }

    #[test]
    fn test_normalized() {
        let mut filter = TagFilterModel::default();
        assert_eq!(filter.normalized(), None);

        filter.toggle_tag(Tag::new(1, "RUN"));
        filter.toggle_tag(Tag::new(2, "TEST"));
        filter.set_operator(CombinationOperator::Or);

        assert_eq!(
            filter.normalized(),
            Some(TagsFilter {
                values: "RUN,TEST".to_string(),
                operation: CombinationOperator::Or,
            })
        );
    }

    #[test]
    fn test_reset_restores_picker_and_operator() {
        let mut filter = TagFilterModel::new(CombinationOperator::Or);
        filter.toggle_tag(Tag::new(1, "RUN"));
        filter.set_operator(CombinationOperator::NoneOf);

        filter.reset();

        assert!(filter.is_empty());
        assert_eq!(filter.operator(), CombinationOperator::Or);
    }
}
