use contracts::domain::Tag;

/// Item that can be selected through a picker
pub trait PickerOption: Clone {
    /// Identity of the option, also what gets sent to the API
    fn value(&self) -> String;

    fn display_name(&self) -> String {
        self.value()
    }
}

impl PickerOption for Tag {
    fn value(&self) -> String {
        self.text.clone()
    }
}
