//! Terminal rendering of the contacts page.

use std::collections::{BTreeMap, HashMap};

use contacts_core::view::{
    ApiForm, ContactField, ContactFormView, Dialogs, ExerciserView, FieldState, FileInfo,
    FormInput, PageView, ResultSlot, UploadView, WeatherPane, WeatherSlot, WeatherWidget,
};
use inquire::Confirm;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TerminalWidget {
    pub city: String,
    pub texts: HashMap<WeatherSlot, String>,
    pub pane: WeatherPane,
}

impl TerminalWidget {
    pub fn new(city: String) -> Self {
        Self { city, texts: HashMap::new(), pane: WeatherPane::Loading }
    }

    pub fn text(&self, slot: WeatherSlot) -> &str {
        self.texts.get(&slot).map(String::as_str).unwrap_or_default()
    }
}

impl WeatherWidget for TerminalWidget {
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

#[derive(Debug, Default)]
pub struct Terminal {
    inputs: HashMap<(ApiForm, FormInput), String>,
    fields: HashMap<ContactField, String>,
    pub states: BTreeMap<ContactField, FieldState>,
    pub revealed: Option<ContactField>,
    slots: HashMap<ResultSlot, String>,
    pub status_options: Vec<(String, String)>,
    pub widgets: Vec<TerminalWidget>,
    pub file: Option<FileInfo>,
    /// Answer every confirmation with "yes" without prompting.
    pub assume_yes: bool,
}

impl Terminal {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes, ..Default::default() }
    }

    pub fn set_input(&mut self, form: ApiForm, input: FormInput, value: String) {
        self.inputs.insert((form, input), value);
    }

    pub fn set_field(&mut self, field: ContactField, value: String) {
        self.fields.insert(field, value);
    }

    pub fn slot_text(&self, slot: ResultSlot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or_default()
    }

    pub fn print_slot(&self, slot: ResultSlot) {
        println!("{}", self.slot_text(slot));
    }
}

impl ExerciserView for Terminal {
    fn input_value(&self, form: ApiForm, input: FormInput) -> String {
        self.inputs.get(&(form, input)).cloned().unwrap_or_default()
    }

    fn add_status_option(&mut self, form: ApiForm, label: &str, value: &str) {
        // Both selects receive the same list; keep one copy.
        if form == ApiForm::Create {
            self.status_options.push((label.to_string(), value.to_string()));
        }
    }

    fn show_slot(&mut self, _slot: ResultSlot) {}

    fn set_slot_text(&mut self, slot: ResultSlot, text: &str) {
        self.slots.insert(slot, text.to_string());
    }

    fn reset_form(&mut self, form: ApiForm) {
        self.inputs.retain(|(owner, _), _| *owner != form);
    }
}

impl ContactFormView for Terminal {
    fn field_value(&self, field: ContactField) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn clear_state(&mut self, field: ContactField) {
        self.states.remove(&field);
    }

    fn set_state(&mut self, field: ContactField, state: FieldState) {
        self.states.insert(field, state);
    }

    fn reveal(&mut self, field: ContactField) {
        self.revealed = Some(field);
    }
}

impl UploadView for Terminal {
    fn selected_file(&self) -> Option<FileInfo> {
        self.file.clone()
    }
}

impl Dialogs for Terminal {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        Confirm::new(message)
            .with_default(false)
            .prompt()
            .unwrap_or_else(|err| {
                warn!("confirmation prompt failed, treating as declined: {err}");
                false
            })
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

impl PageView for Terminal {
    type Widget = TerminalWidget;

    fn weather_widgets(&mut self) -> &mut [TerminalWidget] {
        &mut self.widgets
    }
}
