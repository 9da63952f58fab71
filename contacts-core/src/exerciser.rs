//! Handlers behind the manual API exerciser page.
//!
//! Each handler issues at most one request and leaves exactly one outcome in
//! its result slot. Transport and decoding failures render as `Error: ...`;
//! a non-2xx reply with a JSON body renders that body.

use serde_json::Value;
use tracing::error;

use crate::{
    api::{ApiReply, ContactsApi, DeleteReply},
    error::FetchError,
    model::{Contact, parse_status},
    view::{ApiForm, ContactField, Dialogs, ExerciserView, FormInput, ResultSlot},
};

/// `JSON.stringify(value, null, 2)`.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn success_text(body: &Value) -> String {
    format!("✅ Success!\n\n{}", pretty(body))
}

pub fn failure_text(body: &Value) -> String {
    format!("❌ Error!\n\n{}", pretty(body))
}

pub fn fetch_error_text(err: &FetchError) -> String {
    format!("❌ Error: {err}")
}

pub fn delete_prompt(id: &str) -> String {
    format!("Are you sure you want to delete contact #{id}?")
}

pub fn deleted_text(id: &str) -> String {
    format!("✅ Contact #{id} deleted successfully!")
}

pub const CANCELLED: &str = "Cancelled";

/// Reads the six contact fields of `form`.
pub fn collect_contact<V: ExerciserView + ?Sized>(view: &V, form: ApiForm) -> Contact {
    let value = |field| view.input_value(form, FormInput::Field(field));

    Contact {
        first_name: value(ContactField::FirstName),
        last_name: value(ContactField::LastName),
        email: value(ContactField::Email),
        phone_number: value(ContactField::Phone),
        city: value(ContactField::City),
        status: parse_status(&value(ContactField::Status)),
    }
}

/// Page-load fill of the create and update status selects. Failures are
/// only logged.
pub async fn load_statuses<V: ExerciserView + ?Sized>(api: &ContactsApi, view: &mut V) {
    match api.statuses().await {
        Ok(statuses) => {
            for status in &statuses {
                let id = status.id.to_string();
                view.add_status_option(ApiForm::Create, &status.name, &id);
                view.add_status_option(ApiForm::Update, &status.name, &id);
            }
        }
        Err(err) => error!("Error loading statuses: {err}"),
    }
}

/// Click handler for `#btnGetContacts`.
pub async fn list_contacts<V: ExerciserView + ?Sized>(api: &ContactsApi, view: &mut V) {
    let slot = ResultSlot::ContactsList;
    view.set_slot_text(slot, "Loading...");

    let text = match api.list_contacts().await {
        Ok(data) => pretty(&data),
        Err(err) => format!("Error: {err}"),
    };
    view.set_slot_text(slot, &text);
}

fn render_reply(reply: Result<ApiReply, FetchError>) -> (String, bool) {
    match reply {
        Ok(ApiReply { ok: true, body }) => (success_text(&body), true),
        Ok(ApiReply { ok: false, body }) => (failure_text(&body), false),
        Err(err) => (fetch_error_text(&err), false),
    }
}

/// Submit handler for `#createContactForm`. Clears the form on success.
pub async fn create_contact<V: ExerciserView + ?Sized>(api: &ContactsApi, view: &mut V) {
    let slot = ApiForm::Create.result_slot();
    view.show_slot(slot);
    view.set_slot_text(slot, "Creating...");

    let contact = collect_contact(view, ApiForm::Create);
    let (text, ok) = render_reply(api.create_contact(&contact).await);

    view.set_slot_text(slot, &text);
    if ok {
        view.reset_form(ApiForm::Create);
    }
}

/// Submit handler for `#updateContactForm`. The form keeps its values.
pub async fn update_contact<V: ExerciserView + ?Sized>(api: &ContactsApi, view: &mut V) {
    let slot = ApiForm::Update.result_slot();
    view.show_slot(slot);
    view.set_slot_text(slot, "Updating...");

    let id = view.input_value(ApiForm::Update, FormInput::ContactId);
    let contact = collect_contact(view, ApiForm::Update);
    let (text, _) = render_reply(api.update_contact(&id, &contact).await);

    view.set_slot_text(slot, &text);
}

/// Submit handler for `#deleteContactForm`. Nothing is sent unless the user
/// confirms.
pub async fn delete_contact<V: ExerciserView + Dialogs + ?Sized>(api: &ContactsApi, view: &mut V) {
    let slot = ApiForm::Delete.result_slot();
    view.show_slot(slot);
    view.set_slot_text(slot, "Deleting...");

    let id = view.input_value(ApiForm::Delete, FormInput::ContactId);
    if !view.confirm(&delete_prompt(&id)) {
        view.set_slot_text(slot, CANCELLED);
        return;
    }

    match api.delete_contact(&id).await {
        Ok(DeleteReply::Deleted) => {
            view.set_slot_text(slot, &deleted_text(&id));
            view.reset_form(ApiForm::Delete);
        }
        Ok(DeleteReply::Rejected(body)) => view.set_slot_text(slot, &failure_text(&body)),
        Err(err) => view.set_slot_text(slot, &fetch_error_text(&err)),
    }
}

/// Renders `GET /api/contacts/{id}/` into the contacts list slot.
pub async fn show_contact<V: ExerciserView + ?Sized>(api: &ContactsApi, view: &mut V, id: &str) {
    let slot = ResultSlot::ContactsList;
    view.set_slot_text(slot, "Loading...");

    let text = match api.contact(id).await {
        Ok(ApiReply { ok: true, body }) => pretty(&body),
        Ok(ApiReply { ok: false, body }) => failure_text(&body),
        Err(err) => format!("Error: {err}"),
    };
    view.set_slot_text(slot, &text);
}
