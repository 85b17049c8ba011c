use std::collections::HashSet;

use contracts::domain::Tag;

use super::component::PickerEntry;
use super::traits::PickerOption;
use crate::shared::observable::Observable;

/// Selection of options plus the collapsed state of the picker listing them.
///
/// Both are resettable to the values given at construction. Mutations notify
/// [`PickerModel::observable`], `reset` does not: the owner reloads anyway.
#[derive(Debug)]
pub struct PickerModel<O: PickerOption> {
    default_selection: Vec<O>,
    selected: Vec<O>,
    default_collapsed: bool,
    collapsed: bool,
    observable: Observable,
}

pub type TagPickerModel = PickerModel<Tag>;

impl<O: PickerOption> PickerModel<O> {
    pub fn new(default_selection: Vec<O>, default_collapsed: bool) -> Self {
        Self {
            selected: default_selection.clone(),
            default_selection,
            default_collapsed,
            collapsed: default_collapsed,
            observable: Observable::new(),
        }
    }

    pub fn reset(&mut self) {
        self.reset_selection();
        self.reset_collapse();
    }

    pub fn reset_selection(&mut self) {
        self.selected = self.default_selection.clone();
    }

    pub fn reset_collapse(&mut self) {
        self.collapsed = self.default_collapsed;
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|option| option.value() == value)
    }

    pub fn select(&mut self, option: O) {
        if !self.is_selected(&option.value()) {
            self.selected.push(option);
            self.observable.notify();
        }
    }

    pub fn deselect(&mut self, value: &str) {
        let before = self.selected.len();
        self.selected.retain(|option| option.value() != value);
        if self.selected.len() != before {
            self.observable.notify();
        }
    }

    pub fn toggle(&mut self, option: O) {
        let value = option.value();
        if self.is_selected(&value) {
            self.deselect(&value);
        } else {
            self.select(option);
        }
    }

    /// Replace the whole selection
    pub fn set_selected_options(&mut self, options: Vec<O>) {
        self.selected = options;
        self.observable.notify();
    }

    pub fn selected_options(&self) -> &[O] {
        &self.selected
    }

    /// Values of the selected options, without duplicates, in selection order
    pub fn selected(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.selected
            .iter()
            .map(PickerOption::value)
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Compares values as sets, order does not matter.
    ///
    /// The value is the identity here, not the id: for tags it is the text the
    /// API filters by, so two tags with the same text count as one selection.
    pub fn has_only_default_selection(&self) -> bool {
        let selected: HashSet<String> = self.selected.iter().map(PickerOption::value).collect();
        let defaults: HashSet<String> = self
            .default_selection
            .iter()
            .map(PickerOption::value)
            .collect();
        selected == defaults
    }

    pub fn toggle_collapse(&mut self) {
        self.collapsed = !self.collapsed;
        self.observable.notify();
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// `available` followed by the default options it is missing
    pub fn options(&self, available: &[O]) -> Vec<O> {
        let mut options = available.to_vec();
        for default in &self.default_selection {
            if !available.iter().any(|option| option.value() == default.value()) {
                options.push(default.clone());
            }
        }
        options
    }

    /// Checkbox rows of [`PickerModel::options`]
    pub fn entries(&self, available: &[O]) -> Vec<PickerEntry> {
        self.options(available)
            .into_iter()
            .map(|option| PickerEntry {
                selected: self.is_selected(&option.value()),
                value: option.value(),
                label: option.display_name(),
            })
            .collect()
    }

    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tag(id: i64, text: &str) -> Tag {
        Tag::new(id, text)
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut picker = TagPickerModel::new(Vec::new(), true);
        picker.select(tag(1, "FOOD"));
        picker.select(tag(1, "FOOD"));

        assert_eq!(picker.selected(), vec!["FOOD".to_string()]);
    }

    #[test]
    fn test_toggle_and_deselect() {
        let mut picker = TagPickerModel::new(Vec::new(), true);
        picker.toggle(tag(1, "FOOD"));
        picker.toggle(tag(2, "RUN"));
        picker.toggle(tag(1, "FOOD"));

        assert_eq!(picker.selected(), vec!["RUN".to_string()]);

        picker.deselect("RUN");
        assert!(picker.is_empty());
    }

    #[test]
    fn test_default_selection_ignores_order() {
        let mut picker = TagPickerModel::new(vec![tag(1, "FOOD"), tag(2, "RUN")], true);
        assert!(picker.has_only_default_selection());

        picker.set_selected_options(vec![tag(2, "RUN"), tag(1, "FOOD")]);
        assert!(picker.has_only_default_selection());

        picker.deselect("RUN");
        assert!(!picker.has_only_default_selection());

        picker.reset();
        assert!(picker.has_only_default_selection());
    }

    #[test]
    fn test_default_selection_matches_by_value() {
        let mut picker = TagPickerModel::new(vec![tag(1, "FOOD")], true);
        picker.set_selected_options(vec![tag(7, "FOOD"), tag(8, "FOOD")]);
        assert!(picker.has_only_default_selection());

        picker.set_selected_options(vec![tag(1, "RUN")]);
        assert!(!picker.has_only_default_selection());
    }

    #[test]
    fn test_collapse_is_reset_independently() {
        let mut picker = TagPickerModel::new(vec![tag(1, "FOOD")], true);
        picker.toggle_collapse();
        picker.deselect("FOOD");

        picker.reset_collapse();
        assert!(picker.is_collapsed());
        assert!(picker.is_empty());
    }

    #[test]
    fn test_notifies_only_on_change() {
        let mut picker = TagPickerModel::new(Vec::new(), true);
        let notifications = Rc::new(Cell::new(0));
        let counter = notifications.clone();
        picker.observable().observe(move || counter.set(counter.get() + 1));

        picker.select(tag(1, "FOOD"));
        picker.select(tag(1, "FOOD"));
        picker.deselect("RUN");

        assert_eq!(notifications.get(), 1);
    }

    #[test]
    fn test_options_include_missing_defaults() {
        let picker = TagPickerModel::new(vec![tag(9, "ARCHIVED")], true);
        let options = picker.options(&[tag(1, "FOOD")]);

        let values: Vec<String> = options.iter().map(PickerOption::value).collect();
        assert_eq!(values, vec!["FOOD".to_string(), "ARCHIVED".to_string()]);
    }
}
