//! Page-scoped context and the table binding page events to handlers.

use futures::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::ContactsApi,
    config::Config,
    csrf::get_cookie,
    exerciser,
    http::{HttpTransport, Transport},
    upload::guard_csv_upload,
    validator::{revalidate_on_blur, validate_contact_form},
    view::{ApiForm, ContactField, PageView, ids},
    weather::{WeatherCache, WeatherLoader},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DomContentLoaded,
    Click,
    Submit,
    Blur,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DomContentLoaded => "DOMContentLoaded",
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Blur => "blur",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic page event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Selector of the element the event fired on.
    pub target: String,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: &str) -> Self {
        Self {
            kind,
            target: target.to_string(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn load() -> Self {
        Self::new(EventKind::DomContentLoaded, ids::DOCUMENT)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// State that lives exactly as long as one page: the API client with its
/// CSRF token and the weather loader with its cache.
#[derive(Debug)]
pub struct PageContext {
    api: ContactsApi,
    weather: WeatherLoader,
}

impl PageContext {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        let csrf_token = get_cookie(config.cookies(), &config.csrf_cookie);
        if csrf_token.is_none() {
            debug!(cookie = %config.csrf_cookie, "no CSRF cookie; mutating requests go without it");
        }

        Self {
            api: ContactsApi::new(transport.clone(), &config.api_base, csrf_token),
            weather: WeatherLoader::new(transport, &config.weather_base),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(HttpTransport::new(&config.base_url)), config)
    }

    pub fn with_weather_cache(
        transport: Arc<dyn Transport>,
        config: &Config,
        cache: Box<dyn WeatherCache>,
    ) -> Self {
        let mut ctx = Self::new(transport.clone(), config);
        ctx.weather = WeatherLoader::with_cache(transport, &config.weather_base, cache);
        ctx
    }

    pub fn api(&self) -> &ContactsApi {
        &self.api
    }

    pub fn weather(&mut self) -> &mut WeatherLoader {
        &mut self.weather
    }
}

pub type Handler<V> =
    for<'a> fn(&'a mut PageContext, &'a mut V, &'a mut Event) -> LocalBoxFuture<'a, ()>;

pub struct Binding<V> {
    pub event: EventKind,
    pub selector: &'static str,
    pub handler: Handler<V>,
}

impl<V> Binding<V> {
    fn new(event: EventKind, selector: &'static str, handler: Handler<V>) -> Self {
        Self { event, selector, handler }
    }

    /// Page load reaches every load binding, whatever its selector.
    pub fn matches(&self, event: &Event) -> bool {
        self.event == event.kind
            && (event.kind == EventKind::DomContentLoaded || self.selector == event.target)
    }
}

impl<V> std::fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("event", &self.event)
            .field("selector", &self.selector)
            .finish()
    }
}

/// Every event the page listens for.
pub fn bindings<V: PageView>() -> Vec<Binding<V>> {
    use EventKind::*;

    vec![
        Binding::new(DomContentLoaded, ids::DOCUMENT, on_load_statuses::<V>),
        Binding::new(DomContentLoaded, ids::WEATHER_CONTAINER, on_load_weather::<V>),
        Binding::new(Click, ids::BTN_GET_CONTACTS, on_list_contacts::<V>),
        Binding::new(Submit, ids::CREATE_FORM, on_create_contact::<V>),
        Binding::new(Submit, ids::UPDATE_FORM, on_update_contact::<V>),
        Binding::new(Submit, ids::DELETE_FORM, on_delete_contact::<V>),
        Binding::new(Submit, ids::CONTACT_FORM, on_contact_form_submit::<V>),
        Binding::new(Blur, ids::EMAIL_INPUT, on_field_blur::<V>),
        Binding::new(Blur, ids::PHONE_INPUT, on_field_blur::<V>),
        Binding::new(Submit, ids::CSV_FORM, on_csv_submit::<V>),
    ]
}

fn on_load_statuses<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    _: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    Box::pin(exerciser::load_statuses(&ctx.api, view))
}

fn on_load_weather<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    _: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    Box::pin(async move { ctx.weather.load_all(view.weather_widgets()).await })
}

fn on_list_contacts<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    _: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    Box::pin(exerciser::list_contacts(&ctx.api, view))
}

fn on_create_contact<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    event.prevent_default();
    Box::pin(exerciser::create_contact(&ctx.api, view))
}

fn on_update_contact<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    event.prevent_default();
    Box::pin(exerciser::update_contact(&ctx.api, view))
}

fn on_delete_contact<'a, V: PageView>(
    ctx: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    event.prevent_default();
    Box::pin(exerciser::delete_contact(&ctx.api, view))
}

fn on_contact_form_submit<'a, V: PageView>(
    _: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    validate_contact_form(view, event);
    Box::pin(async {})
}

fn on_field_blur<'a, V: PageView>(
    _: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    if let Some(field @ (ContactField::Email | ContactField::Phone)) =
        ContactField::from_form_selector(&event.target)
    {
        revalidate_on_blur(view, field);
    }
    Box::pin(async {})
}

fn on_csv_submit<'a, V: PageView>(
    _: &'a mut PageContext,
    view: &'a mut V,
    event: &'a mut Event,
) -> LocalBoxFuture<'a, ()> {
    if let Err(rejection) = guard_csv_upload(view, event) {
        debug!(%rejection, "csv upload blocked");
    }
    Box::pin(async {})
}

/// A page: its context plus the registration table, ready for events.
#[derive(Debug)]
pub struct Page<V: PageView> {
    ctx: PageContext,
    bindings: Vec<Binding<V>>,
}

impl<V: PageView> Page<V> {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx, bindings: bindings() }
    }

    pub fn context(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    pub fn bindings(&self) -> &[Binding<V>] {
        &self.bindings
    }

    /// Runs every handler bound to `event`, in registration order, and
    /// returns how many ran.
    pub async fn dispatch(&mut self, view: &mut V, event: &mut Event) -> usize {
        let mut ran = 0;
        for binding in &self.bindings {
            if binding.matches(event) {
                debug!(event = %event.kind, selector = binding.selector, "dispatch");
                (binding.handler)(&mut self.ctx, view, event).await;
                ran += 1;
            }
        }
        ran
    }

    /// Fires `DOMContentLoaded`.
    pub async fn load(&mut self, view: &mut V) -> usize {
        self.dispatch(view, &mut Event::load()).await
    }

    pub async fn submit(&mut self, view: &mut V, form: ApiForm) -> Event {
        let mut event = Event::new(EventKind::Submit, form.selector());
        self.dispatch(view, &mut event).await;
        event
    }
}
