use futures::future::join_all;
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    sync::Arc,
};
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    http::{ApiRequest, Method, Transport, encode_component},
    model::WeatherReading,
    view::{WeatherPane, WeatherSlot, WeatherWidget},
};

/// City name → last decoded `/weather/{city}/` payload, for one page.
pub trait WeatherCache: Send + Sync + Debug {
    fn get(&self, city: &str) -> Option<&Value>;
    fn insert(&mut self, city: String, payload: Value);

    fn contains(&self, city: &str) -> bool {
        self.get(city).is_some()
    }
}

impl WeatherCache for HashMap<String, Value> {
    fn get(&self, city: &str) -> Option<&Value> {
        HashMap::get(self, city)
    }

    fn insert(&mut self, city: String, payload: Value) {
        HashMap::insert(self, city, payload);
    }
}

#[derive(Debug)]
pub struct WeatherLoader {
    transport: Arc<dyn Transport>,
    weather_base: String,
    cache: Box<dyn WeatherCache>,
}

impl WeatherLoader {
    pub fn new(transport: Arc<dyn Transport>, weather_base: &str) -> Self {
        Self::with_cache(transport, weather_base, Box::new(HashMap::new()))
    }

    pub fn with_cache(
        transport: Arc<dyn Transport>,
        weather_base: &str,
        cache: Box<dyn WeatherCache>,
    ) -> Self {
        Self {
            transport,
            weather_base: weather_base.trim_end_matches('/').to_string(),
            cache,
        }
    }

    pub fn cache(&self) -> &dyn WeatherCache {
        self.cache.as_ref()
    }

    /// `GET /weather/{city}/`. Any non-2xx status is an error; its body is
    /// not read.
    pub async fn fetch(&self, city: &str) -> Result<Value, FetchError> {
        let path = format!("{}/{}/", self.weather_base, encode_component(city));
        let res = self.transport.send(ApiRequest::new(Method::Get, path)).await?;

        if !res.is_ok() {
            return Err(FetchError::Status("Weather data not available".to_string()));
        }

        res.json()
    }

    fn remember(&mut self, city: &str, payload: Value) {
        // Cached even without a `weather` member; every later visit renders
        // the error pane for this city until the page is reloaded.
        if WeatherReading::from_payload(&payload).is_none() {
            warn!(%city, "caching weather payload without a weather reading");
        }
        self.cache.insert(city.to_string(), payload);
    }

    /// One load attempt for one container.
    pub async fn load_weather<W: WeatherWidget + ?Sized>(&mut self, widget: &mut W) {
        let city = widget.city().to_string();

        if let Some(payload) = self.cache.get(&city) {
            debug!(%city, "weather served from cache");
            display_weather(widget, payload);
            return;
        }

        match self.fetch(&city).await {
            Ok(payload) => {
                display_weather(widget, &payload);
                self.remember(&city, payload);
            }
            Err(err) => {
                debug!(%city, error = %err, "weather unavailable");
                show_weather_error(widget);
            }
        }
    }

    /// Page-load pass over every container. Distinct uncached cities are
    /// fetched concurrently; containers sharing a city share one request.
    pub async fn load_all<W: WeatherWidget>(&mut self, widgets: &mut [W]) {
        let mut seen = HashSet::new();
        let pending: Vec<String> = widgets
            .iter()
            .map(|w| w.city().to_string())
            .filter(|city| !self.cache.contains(city) && seen.insert(city.clone()))
            .collect();

        let results = join_all(pending.iter().map(|city| self.fetch(city))).await;

        for (city, result) in pending.into_iter().zip(results) {
            match result {
                Ok(payload) => self.remember(&city, payload),
                Err(err) => debug!(%city, error = %err, "weather unavailable"),
            }
        }

        for widget in widgets.iter_mut() {
            match self.cache.get(widget.city()) {
                Some(payload) => display_weather(widget, payload),
                None => show_weather_error(widget),
            }
        }
    }
}

/// Fills the three text slots and shows only the info pane, or shows the
/// error pane when the payload carries no reading.
pub fn display_weather<W: WeatherWidget + ?Sized>(widget: &mut W, payload: &Value) {
    let Some(reading) = WeatherReading::from_payload(payload) else {
        show_weather_error(widget);
        return;
    };

    widget.set_text(WeatherSlot::Temperature, &reading.temperature);
    widget.set_text(WeatherSlot::Humidity, &reading.humidity);
    widget.set_text(WeatherSlot::WindSpeed, &reading.wind_speed);
    widget.show_only(WeatherPane::Info);
}

pub fn show_weather_error<W: WeatherWidget + ?Sized>(widget: &mut W) {
    widget.show_only(WeatherPane::Error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{http::testing::FakeTransport, memory::MemoryWidget, model::NOT_AVAILABLE};
    use serde_json::json;

    const WARSAW: &str =
        r#"{"city":"Warsaw","weather":{"temperature":18.5,"humidity":70,"wind_speed":9.0}}"#;

    fn loader(transport: &Arc<FakeTransport>) -> WeatherLoader {
        WeatherLoader::new(transport.clone(), "/weather")
    }

    #[tokio::test]
    async fn cached_city_issues_no_request() {
        let transport = Arc::new(FakeTransport::new());
        let mut cache = HashMap::new();
        cache.insert(
            "Poznań".to_string(),
            json!({"weather": {"temperature": 5, "humidity": 80, "wind_speed": 2}}),
        );
        let mut loader = WeatherLoader::with_cache(transport.clone(), "/weather", Box::new(cache));
        let mut widget = MemoryWidget::new("Poznań");

        loader.load_weather(&mut widget).await;

        assert!(transport.requests().is_empty());
        assert_eq!(widget.pane, WeatherPane::Info);
        assert_eq!(widget.text(WeatherSlot::Temperature), Some("5"));
    }

    #[tokio::test]
    async fn miss_fetches_encoded_city_and_caches_payload() {
        let transport = Arc::new(FakeTransport::new().reply(200, WARSAW));
        let mut loader = loader(&transport);
        let mut widget = MemoryWidget::new("Nowy Sącz");

        loader.load_weather(&mut widget).await;
        loader.load_weather(&mut MemoryWidget::new("Nowy Sącz")).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/weather/Nowy%20S%C4%85cz/");
        assert!(loader.cache().contains("Nowy Sącz"));
        assert_eq!(widget.pane, WeatherPane::Info);
        assert_eq!(widget.text(WeatherSlot::Temperature), Some("18.5"));
        assert_eq!(widget.text(WeatherSlot::Humidity), Some("70"));
        assert_eq!(widget.text(WeatherSlot::WindSpeed), Some("9"));
    }

    #[tokio::test]
    async fn non_2xx_shows_error_and_is_not_cached() {
        let transport = Arc::new(FakeTransport::new().reply(404, r#"{"error":"City not found"}"#));
        let mut loader = loader(&transport);
        let mut widget = MemoryWidget::new("Atlantis");

        loader.load_weather(&mut widget).await;

        assert_eq!(widget.pane, WeatherPane::Error);
        assert!(!loader.cache().contains("Atlantis"));
    }

    #[tokio::test]
    async fn transport_failure_shows_error() {
        let transport = Arc::new(FakeTransport::new().fail("connection refused"));
        let mut widget = MemoryWidget::new("Lodz");

        loader(&transport).load_weather(&mut widget).await;

        assert_eq!(widget.pane, WeatherPane::Error);
    }

    #[tokio::test]
    async fn payload_without_weather_is_cached_but_renders_error() {
        let transport = Arc::new(FakeTransport::new().reply(200, r#"{"city":"Opole"}"#));
        let mut loader = loader(&transport);
        let mut first = MemoryWidget::new("Opole");
        let mut second = MemoryWidget::new("Opole");

        loader.load_weather(&mut first).await;
        loader.load_weather(&mut second).await;

        assert_eq!(transport.requests().len(), 1);
        assert!(loader.cache().contains("Opole"));
        assert_eq!(first.pane, WeatherPane::Error);
        assert_eq!(second.pane, WeatherPane::Error);
    }

    #[tokio::test]
    async fn falsy_weather_member_renders_error() {
        let transport = Arc::new(
            FakeTransport::new()
                .reply(200, r#"{"city":"Hel","weather":0}"#)
                .reply(200, r#"{"city":"Jastarnia","weather":""}"#),
        );
        let mut loader = loader(&transport);
        let mut zero = MemoryWidget::new("Hel");
        let mut empty = MemoryWidget::new("Jastarnia");

        loader.load_weather(&mut zero).await;
        loader.load_weather(&mut empty).await;

        assert_eq!(zero.pane, WeatherPane::Error);
        assert_eq!(empty.pane, WeatherPane::Error);
        assert!(zero.texts.is_empty());
    }

    #[tokio::test]
    async fn missing_fields_fall_back_to_not_available() {
        let transport = Arc::new(FakeTransport::new().reply(200, r#"{"weather":{"humidity":40}}"#));
        let mut widget = MemoryWidget::new("Torun");

        loader(&transport).load_weather(&mut widget).await;

        assert_eq!(widget.pane, WeatherPane::Info);
        assert_eq!(widget.text(WeatherSlot::Temperature), Some(NOT_AVAILABLE));
        assert_eq!(widget.text(WeatherSlot::Humidity), Some("40"));
        assert_eq!(widget.text(WeatherSlot::WindSpeed), Some(NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn load_all_fetches_each_distinct_city_once() {
        let transport = Arc::new(
            FakeTransport::new()
                .reply(200, WARSAW)
                .reply(503, r#"{"error":"Weather data not available"}"#),
        );
        let mut loader = loader(&transport);
        let mut widgets = vec![
            MemoryWidget::new("Warsaw"),
            MemoryWidget::new("Krakow"),
            MemoryWidget::new("Warsaw"),
        ];

        loader.load_all(&mut widgets).await;

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&"/weather/Warsaw/".to_string()));
        assert!(paths.contains(&"/weather/Krakow/".to_string()));

        // Replies are handed out in request order, so the first city asked for got the 200.
        let ok_city = paths[0].trim_start_matches("/weather/").trim_end_matches('/');
        for widget in &widgets {
            let expected =
                if widget.city == ok_city { WeatherPane::Info } else { WeatherPane::Error };
            assert_eq!(widget.pane, expected, "{}", widget.city);
        }
    }
}
