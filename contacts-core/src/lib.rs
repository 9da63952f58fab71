//! Core library for the contacts page client.
//!
//! This crate defines:
//! - Configuration & session cookies
//! - The HTTP transport seam and the contacts REST client
//! - The page behaviours: API exerciser, contact form validator, weather
//!   widget loader, CSV upload guard
//! - Typed view-model capabilities those behaviours render into
//! - A page context plus the table binding page events to handlers
//!
//! It is used by `contacts-cli`, but any rendering that implements the
//! [`view`] traits can drive the same handlers.

pub mod api;
pub mod config;
pub mod csrf;
pub mod error;
pub mod exerciser;
pub mod http;
pub mod memory;
pub mod model;
pub mod page;
pub mod upload;
pub mod validator;
pub mod view;
pub mod weather;

pub use api::{ApiReply, ContactsApi, DeleteReply};
pub use config::Config;
pub use error::FetchError;
pub use http::{HttpTransport, Transport};
pub use model::{Contact, Status, WeatherReading};
pub use page::{Event, EventKind, Page, PageContext};
pub use weather::{WeatherCache, WeatherLoader};
