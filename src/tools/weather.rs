use super::http::HttpFetcher;
use super::params::first_string_param;
use super::traits::{Tool, ToolOutput};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

const DEFAULT_CITY: &str = "London";
const CITY_KEYS: [&str; 3] = ["city", "location", "place"];

/// Current conditions from weatherapi.com.
pub struct WeatherTool {
    fetcher: Arc<HttpFetcher>,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    temp_f: f64,
    condition: Condition,
    /// Percent, kept as sent (weatherapi reports an integer).
    #[serde(default)]
    humidity: Option<Value>,
    #[serde(default)]
    wind_kph: Option<f64>,
    #[serde(default)]
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

impl WeatherTool {
    pub fn new(fetcher: Arc<HttpFetcher>, api_url: &str, api_key: Option<&str>) -> Self {
        Self {
            fetcher,
            api_url: api_url.to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
        }
    }

    async fn fetch(&self, city: &str) -> anyhow::Result<ToolOutput> {
        let mut query = Vec::with_capacity(3);
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }
        query.push(("q", city.to_string()));
        query.push(("aqi", "no".to_string()));

        let body = self.fetcher.get_json(&self.api_url, &query, &[]).await?;
        let parsed: CurrentResponse = serde_json::from_value(body)?;

        let mut out = Map::new();
        out.insert("city".into(), json!(parsed.location.name));
        out.insert("country".into(), json!(parsed.location.country));
        out.insert("temperature_c".into(), json!(parsed.current.temp_c));
        out.insert("temperature_f".into(), json!(parsed.current.temp_f));
        out.insert("condition".into(), json!(parsed.current.condition.text));
        out.insert("humidity".into(), json!(parsed.current.humidity));
        out.insert("wind_kph".into(), json!(parsed.current.wind_kph));
        out.insert("last_updated".into(), json!(parsed.current.last_updated));
        Ok(out)
    }

    /// Current weather for `city`. Failures come back as `{error, city}`.
    pub async fn current(&self, city: &str) -> ToolOutput {
        tracing::info!(city, "Fetching current weather");
        match self.fetch(city).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(city, error = %e, "Weather lookup failed");
                let mut out = Map::new();
                out.insert("error".into(), json!(format!("{e:#}")));
                out.insert("city".into(), json!(city));
                out
            }
        }
    }
}

impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Get current weather conditions for a city"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. Tokyo"
                }
            },
            "required": ["city"]
        })
    }

    fn execute<'a>(
        &'a self,
        params: Map<String, Value>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolOutput>> + Send + 'a>> {
        Box::pin(async move {
            let city = first_string_param(&params, &CITY_KEYS)
                .unwrap_or_else(|| DEFAULT_CITY.to_string());
            Ok(self.current(&city).await)
        })
    }
}
