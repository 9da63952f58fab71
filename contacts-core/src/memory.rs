//! Headless page that records what the handlers do to it.

use std::collections::{BTreeSet, HashMap};

use crate::view::{
    ApiForm, ContactField, ContactFormView, Dialogs, ExerciserView, FieldState, FileInfo,
    FormInput, PageView, ResultSlot, UploadView, WeatherPane, WeatherSlot, WeatherWidget,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub visible: bool,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct MemoryWidget {
    pub city: String,
    pub texts: HashMap<WeatherSlot, String>,
    pub pane: WeatherPane,
}

impl MemoryWidget {
    pub fn new(city: &str) -> Self {
        Self { city: city.to_string(), texts: HashMap::new(), pane: WeatherPane::Loading }
    }

    pub fn text(&self, slot: WeatherSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }
}

impl WeatherWidget for MemoryWidget {
    fn city(&self) -> &str {
        &self.city
    }

    fn set_text(&mut self, slot: WeatherSlot, text: &str) {
        self.texts.insert(slot, text.to_string());
    }

    fn show_only(&mut self, pane: WeatherPane) {
        self.pane = pane;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub inputs: HashMap<(ApiForm, FormInput), String>,
    pub status_options: HashMap<ApiForm, Vec<(String, String)>>,
    pub slots: HashMap<ResultSlot, Slot>,
    pub resets: Vec<ApiForm>,

    pub fields: HashMap<ContactField, String>,
    pub classes: HashMap<ContactField, BTreeSet<&'static str>>,
    pub revealed: Option<ContactField>,

    pub widgets: Vec<MemoryWidget>,
    pub file: Option<FileInfo>,

    /// Answer returned by every `confirm`.
    pub confirm_answer: bool,
    pub confirms: Vec<String>,
    pub alerts: Vec<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, form: ApiForm, input: FormInput, value: &str) -> Self {
        self.inputs.insert((form, input), value.to_string());
        self
    }

    /// Fills the six contact fields of `form` in `ContactField::ALL` order.
    pub fn with_contact(mut self, form: ApiForm, values: [&str; 6]) -> Self {
        for (field, value) in ContactField::ALL.into_iter().zip(values) {
            self.inputs.insert((form, FormInput::Field(field)), value.to_string());
        }
        self
    }

    pub fn with_field(mut self, field: ContactField, value: &str) -> Self {
        self.fields.insert(field, value.to_string());
        self
    }

    pub fn with_fields(mut self, values: [&str; 6]) -> Self {
        for (field, value) in ContactField::ALL.into_iter().zip(values) {
            self.fields.insert(field, value.to_string());
        }
        self
    }

    pub fn with_widget(mut self, city: &str) -> Self {
        self.widgets.push(MemoryWidget::new(city));
        self
    }

    pub fn slot(&self, slot: ResultSlot) -> Slot {
        self.slots.get(&slot).cloned().unwrap_or_default()
    }

    pub fn classes(&self, field: ContactField) -> Vec<&'static str> {
        self.classes
            .get(&field)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn state(&self, field: ContactField) -> Option<FieldState> {
        let classes = self.classes.get(&field)?;
        if classes.contains(FieldState::Invalid.class()) {
            Some(FieldState::Invalid)
        } else if classes.contains(FieldState::Valid.class()) {
            Some(FieldState::Valid)
        } else {
            None
        }
    }
}

impl ExerciserView for MemoryPage {
    fn input_value(&self, form: ApiForm, input: FormInput) -> String {
        self.inputs.get(&(form, input)).cloned().unwrap_or_default()
    }

    fn add_status_option(&mut self, form: ApiForm, label: &str, value: &str) {
        self.status_options
            .entry(form)
            .or_default()
            .push((label.to_string(), value.to_string()));
    }

    fn show_slot(&mut self, slot: ResultSlot) {
        self.slots.entry(slot).or_default().visible = true;
    }

    fn set_slot_text(&mut self, slot: ResultSlot, text: &str) {
        self.slots.entry(slot).or_default().text = text.to_string();
    }

    fn reset_form(&mut self, form: ApiForm) {
        self.inputs.retain(|(owner, _), _| *owner != form);
        self.resets.push(form);
    }
}

impl ContactFormView for MemoryPage {
    fn field_value(&self, field: ContactField) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn clear_state(&mut self, field: ContactField) {
        if let Some(classes) = self.classes.get_mut(&field) {
            classes.remove(FieldState::Valid.class());
            classes.remove(FieldState::Invalid.class());
        }
    }

    fn set_state(&mut self, field: ContactField, state: FieldState) {
        let classes = self.classes.entry(field).or_default();
        classes.remove(FieldState::Valid.class());
        classes.remove(FieldState::Invalid.class());
        classes.insert(state.class());
    }

    fn reveal(&mut self, field: ContactField) {
        self.revealed = Some(field);
    }
}

impl UploadView for MemoryPage {
    fn selected_file(&self) -> Option<FileInfo> {
        self.file.clone()
    }
}

impl Dialogs for MemoryPage {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

impl PageView for MemoryPage {
    type Widget = MemoryWidget;

    fn weather_widgets(&mut self) -> &mut [MemoryWidget] {
        &mut self.widgets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_only_the_given_form() {
        let mut page = MemoryPage::new()
            .with_input(ApiForm::Create, FormInput::Field(ContactField::City), "Lodz")
            .with_input(ApiForm::Update, FormInput::ContactId, "4");

        page.reset_form(ApiForm::Create);

        assert_eq!(page.input_value(ApiForm::Create, FormInput::Field(ContactField::City)), "");
        assert_eq!(page.input_value(ApiForm::Update, FormInput::ContactId), "4");
        assert_eq!(page.resets, vec![ApiForm::Create]);
    }

    #[test]
    fn set_state_keeps_exactly_one_validity_class() {
        let mut page = MemoryPage::new();

        page.set_state(ContactField::Email, FieldState::Invalid);
        page.set_state(ContactField::Email, FieldState::Valid);

        assert_eq!(page.classes(ContactField::Email), vec!["is-valid"]);
        assert_eq!(page.state(ContactField::Email), Some(FieldState::Valid));
    }
}
