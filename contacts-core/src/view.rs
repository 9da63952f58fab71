//! Typed view-model capabilities the page behaviours render into.
//!
//! The server-rendered templates bind to fixed element ids and classes. Those
//! names live here as constants on the enums below, so any rendering (a DOM
//! page, a terminal, an in-memory double) can satisfy the same contract.

/// Selectors that are not tied to one of the typed enums.
pub mod ids {
    pub const DOCUMENT: &str = "document";
    pub const BTN_GET_CONTACTS: &str = "#btnGetContacts";
    pub const CONTACT_FORM: &str = "#contactForm";
    pub const EMAIL_INPUT: &str = "#id_email";
    pub const PHONE_INPUT: &str = "#id_phone_number";
    pub const CREATE_FORM: &str = "#createContactForm";
    pub const UPDATE_FORM: &str = "#updateContactForm";
    pub const DELETE_FORM: &str = "#deleteContactForm";
    pub const CSV_FORM: &str = "#csvForm";
    pub const CSV_FILE_INPUT: &str = "#id_csv_file";
    pub const WEATHER_CONTAINER: &str = ".weather-container";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    City,
    Status,
}

impl ContactField {
    /// Fields in the order the contact form checks them.
    pub const ALL: [ContactField; 6] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::City,
        ContactField::Status,
    ];

    /// Element id on the contact form page.
    pub fn form_id(self) -> &'static str {
        match self {
            ContactField::FirstName => "id_first_name",
            ContactField::LastName => "id_last_name",
            ContactField::Email => "id_email",
            ContactField::Phone => "id_phone_number",
            ContactField::City => "id_city",
            ContactField::Status => "id_status",
        }
    }

    pub fn from_form_selector(selector: &str) -> Option<Self> {
        let id = selector.strip_prefix('#').unwrap_or(selector);
        Self::ALL.into_iter().find(|field| field.form_id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactField::FirstName => "first name",
            ContactField::LastName => "last name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::City => "city",
            ContactField::Status => "status",
        }
    }
}

/// The three forms on the API exerciser page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiForm {
    Create,
    Update,
    Delete,
}

impl ApiForm {
    pub fn selector(self) -> &'static str {
        match self {
            ApiForm::Create => ids::CREATE_FORM,
            ApiForm::Update => ids::UPDATE_FORM,
            ApiForm::Delete => ids::DELETE_FORM,
        }
    }

    pub fn form_id(self) -> &'static str {
        &self.selector()[1..]
    }

    pub fn result_slot(self) -> ResultSlot {
        match self {
            ApiForm::Create => ResultSlot::Create,
            ApiForm::Update => ResultSlot::Update,
            ApiForm::Delete => ResultSlot::Delete,
        }
    }

    /// Element id of `input` on this form, if the form has it.
    pub fn input_id(self, input: FormInput) -> Option<&'static str> {
        use ContactField::*;

        let id = match (self, input) {
            (ApiForm::Create, FormInput::Field(FirstName)) => "createFirstName",
            (ApiForm::Create, FormInput::Field(LastName)) => "createLastName",
            (ApiForm::Create, FormInput::Field(Email)) => "createEmail",
            (ApiForm::Create, FormInput::Field(Phone)) => "createPhone",
            (ApiForm::Create, FormInput::Field(City)) => "createCity",
            (ApiForm::Create, FormInput::Field(Status)) => "createStatus",
            (ApiForm::Update, FormInput::Field(FirstName)) => "updateFirstName",
            (ApiForm::Update, FormInput::Field(LastName)) => "updateLastName",
            (ApiForm::Update, FormInput::Field(Email)) => "updateEmail",
            (ApiForm::Update, FormInput::Field(Phone)) => "updatePhone",
            (ApiForm::Update, FormInput::Field(City)) => "updateCity",
            (ApiForm::Update, FormInput::Field(Status)) => "updateStatus",
            (ApiForm::Update, FormInput::ContactId) => "updateContactId",
            (ApiForm::Delete, FormInput::ContactId) => "deleteContactId",
            (ApiForm::Create, FormInput::ContactId) | (ApiForm::Delete, FormInput::Field(_)) => {
                return None;
            }
        };
        Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormInput {
    Field(ContactField),
    ContactId,
}

/// Output areas on the API exerciser page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSlot {
    ContactsList,
    Create,
    Update,
    Delete,
}

impl ResultSlot {
    pub fn id(self) -> &'static str {
        match self {
            ResultSlot::ContactsList => "contactsList",
            ResultSlot::Create => "createResult",
            ResultSlot::Update => "updateResult",
            ResultSlot::Delete => "deleteResult",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    Valid,
    Invalid,
}

impl FieldState {
    pub fn class(self) -> &'static str {
        match self {
            FieldState::Valid => "is-valid",
            FieldState::Invalid => "is-invalid",
        }
    }

    pub fn from_check(passed: bool) -> Self {
        if passed { FieldState::Valid } else { FieldState::Invalid }
    }
}

/// Mutually exclusive display states of a weather container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherPane {
    Loading,
    Info,
    Error,
}

impl WeatherPane {
    pub fn class(self) -> &'static str {
        match self {
            WeatherPane::Loading => "weather-loading",
            WeatherPane::Info => "weather-info",
            WeatherPane::Error => "weather-error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherSlot {
    Temperature,
    Humidity,
    WindSpeed,
}

impl WeatherSlot {
    pub fn class(self) -> &'static str {
        match self {
            WeatherSlot::Temperature => "weather-temp",
            WeatherSlot::Humidity => "weather-humidity",
            WeatherSlot::WindSpeed => "weather-wind",
        }
    }
}

/// What the browser reports about a chosen upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

pub trait ExerciserView {
    fn input_value(&self, form: ApiForm, input: FormInput) -> String;
    fn add_status_option(&mut self, form: ApiForm, label: &str, value: &str);
    fn show_slot(&mut self, slot: ResultSlot);
    fn set_slot_text(&mut self, slot: ResultSlot, text: &str);
    fn reset_form(&mut self, form: ApiForm);
}

pub trait ContactFormView {
    fn field_value(&self, field: ContactField) -> String;
    fn clear_state(&mut self, field: ContactField);
    fn set_state(&mut self, field: ContactField, state: FieldState);
    /// Smoothly scroll `field` to the middle of the view and focus it.
    fn reveal(&mut self, field: ContactField);
}

pub trait WeatherWidget {
    fn city(&self) -> &str;
    fn set_text(&mut self, slot: WeatherSlot, text: &str);
    fn show_only(&mut self, pane: WeatherPane);
}

pub trait UploadView {
    fn selected_file(&self) -> Option<FileInfo>;
}

/// Blocking user prompts.
pub trait Dialogs {
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Everything a page offers to the registered handlers.
pub trait PageView: ExerciserView + ContactFormView + UploadView + Dialogs {
    type Widget: WeatherWidget;

    fn weather_widgets(&mut self) -> &mut [Self::Widget];
}
