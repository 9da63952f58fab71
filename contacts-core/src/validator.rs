//! Client-side gate on the contact form. Never touches the network.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    page::Event,
    view::{ContactField, ContactFormView, FieldState},
};

lazy_static! {
    static ref NAME_RE: Regex =
        Regex::new(r"^[a-zA-ZąćęłńóśźżĄĆĘŁŃÓŚŹŻ\s\-']+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    // min 8 chars: a leading digit or '+', then 7+ of digits, spaces, '-', '(' or ')'
    static ref PHONE_RE: Regex = Regex::new(r"^[+0-9][0-9\s\-()]{7,}$").unwrap();
}

const MIN_PHONE_DIGITS: usize = 8;

pub fn is_valid_name(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && NAME_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && EMAIL_RE.is_match(value)
}

/// Both the character shape and at least eight digits are required.
pub fn is_valid_phone(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || !PHONE_RE.is_match(trimmed) {
        return false;
    }
    value.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

pub fn is_valid_city(value: &str) -> bool {
    !value.trim().is_empty()
}

/// A status is chosen when the select holds any value at all.
pub fn is_valid_status(value: &str) -> bool {
    !value.is_empty()
}

pub fn check_field(field: ContactField, value: &str) -> bool {
    match field {
        ContactField::FirstName | ContactField::LastName => is_valid_name(value),
        ContactField::Email => is_valid_email(value),
        ContactField::Phone => is_valid_phone(value),
        ContactField::City => is_valid_city(value),
        ContactField::Status => is_valid_status(value),
    }
}

/// Submit handler for `#contactForm`. Marks every field and returns whether
/// the submission may proceed; on failure the event is cancelled and the
/// first invalid field is brought into view.
pub fn validate_contact_form<V: ContactFormView + ?Sized>(view: &mut V, event: &mut Event) -> bool {
    for field in ContactField::ALL {
        view.clear_state(field);
    }

    let mut first_invalid = None;
    for field in ContactField::ALL {
        let state = FieldState::from_check(check_field(field, &view.field_value(field)));
        view.set_state(field, state);
        if state == FieldState::Invalid && first_invalid.is_none() {
            first_invalid = Some(field);
        }
    }

    match first_invalid {
        None => true,
        Some(field) => {
            debug!(field = field.form_id(), "contact form blocked");
            event.prevent_default();
            event.stop_propagation();
            view.reveal(field);
            false
        }
    }
}

/// Blur handler for the email and phone inputs. Blank values keep whatever
/// state the field already has.
pub fn revalidate_on_blur<V: ContactFormView + ?Sized>(view: &mut V, field: ContactField) {
    let value = view.field_value(field);
    if value.trim().is_empty() {
        return;
    }
    view.set_state(field, FieldState::from_check(check_field(field, &value)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::MemoryPage, page::EventKind};

    const VALID: [&str; 6] =
        ["Łukasz", "O'Neil-Żak", "lukasz@example.pl", "+48 123 456 789", "Gdańsk", "2"];

    fn submit() -> Event {
        Event::new(EventKind::Submit, "#contactForm")
    }

    #[test]
    fn phone_needs_shape_and_eight_digits() {
        assert!(is_valid_phone("+1 234 5678"));
        assert!(is_valid_phone("12 345-67-89"));
        assert!(!is_valid_phone("(12) 345-67-89"));
        assert!(!is_valid_phone("123456"));
        assert!(!is_valid_phone("abcdefgh"));
        // shape passes but only 7 digits
        assert!(!is_valid_phone("+1 (23) 45-67"));
        assert!(!is_valid_phone("   "));
    }

    #[test]
    fn email_needs_dot_in_domain() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("  a@b.co  "));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn names_allow_polish_letters_hyphen_and_apostrophe() {
        assert!(is_valid_name("Zażółć"));
        assert!(is_valid_name("Anne-Marie O'Brien"));
        assert!(!is_valid_name("R2D2"));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name("Jan!"));
    }

    #[test]
    fn status_is_not_trimmed() {
        assert!(is_valid_status("1"));
        assert!(!is_valid_status(""));
    }

    #[test]
    fn valid_form_passes_and_marks_every_field_valid() {
        let mut page = MemoryPage::new().with_fields(VALID);
        let mut event = submit();

        assert!(validate_contact_form(&mut page, &mut event));

        assert!(!event.default_prevented());
        for field in ContactField::ALL {
            assert_eq!(page.classes(field), vec!["is-valid"], "{field:?}");
        }
        assert_eq!(page.revealed, None);
    }

    #[test]
    fn any_invalid_field_blocks_and_reveals_the_first_one() {
        let mut page = MemoryPage::new()
            .with_fields(VALID)
            .with_field(ContactField::Email, "a@b")
            .with_field(ContactField::City, " ");
        let mut event = submit();

        assert!(!validate_contact_form(&mut page, &mut event));

        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
        assert_eq!(page.revealed, Some(ContactField::Email));
        assert_eq!(page.state(ContactField::Email), Some(FieldState::Invalid));
        assert_eq!(page.state(ContactField::City), Some(FieldState::Invalid));
        assert_eq!(page.state(ContactField::FirstName), Some(FieldState::Valid));
    }

    #[test]
    fn resubmitting_replaces_previous_states() {
        let mut page = MemoryPage::new().with_fields(VALID).with_field(ContactField::Status, "");
        validate_contact_form(&mut page, &mut submit());
        assert_eq!(page.state(ContactField::Status), Some(FieldState::Invalid));

        page = page.with_field(ContactField::Status, "3");
        assert!(validate_contact_form(&mut page, &mut submit()));
        assert_eq!(page.classes(ContactField::Status), vec!["is-valid"]);
    }

    #[test]
    fn blocked_iff_some_field_fails() {
        for (index, field) in ContactField::ALL.into_iter().enumerate() {
            let mut values = VALID;
            values[index] = "";
            let mut page = MemoryPage::new().with_fields(values);
            let mut event = submit();

            assert!(!validate_contact_form(&mut page, &mut event), "{field:?}");
            assert_eq!(page.revealed, Some(field));
            let invalid: Vec<_> = ContactField::ALL
                .into_iter()
                .filter(|f| page.state(*f) == Some(FieldState::Invalid))
                .collect();
            assert_eq!(invalid, vec![field]);
        }
    }

    #[test]
    fn blur_updates_only_that_field() {
        let mut page = MemoryPage::new()
            .with_field(ContactField::Phone, "123456")
            .with_field(ContactField::Email, "a@b.co");

        revalidate_on_blur(&mut page, ContactField::Phone);
        revalidate_on_blur(&mut page, ContactField::Email);

        assert_eq!(page.state(ContactField::Phone), Some(FieldState::Invalid));
        assert_eq!(page.state(ContactField::Email), Some(FieldState::Valid));
        assert_eq!(page.state(ContactField::City), None);
    }

    #[test]
    fn blur_on_blank_value_leaves_state_alone() {
        let mut page = MemoryPage::new().with_field(ContactField::Email, "a@b");
        revalidate_on_blur(&mut page, ContactField::Email);
        assert_eq!(page.state(ContactField::Email), Some(FieldState::Invalid));

        page = page.with_field(ContactField::Email, "  ");
        revalidate_on_blur(&mut page, ContactField::Email);
        assert_eq!(page.state(ContactField::Email), Some(FieldState::Invalid));
    }
}
