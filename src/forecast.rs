//! Real-time arrival countdowns from the iBus API.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::error::TmbError;
use crate::models::ArrivalEntry;

#[derive(Debug, Deserialize)]
struct IbusResponse {
    data: IbusData,
}

#[derive(Debug, Deserialize)]
struct IbusData {
    #[serde(default)]
    ibus: Vec<IbusArrival>,
}

#[derive(Debug, Deserialize)]
struct IbusArrival {
    #[serde(default)]
    line: Option<String>,
    #[serde(rename = "routeId")]
    route_id: String,
    #[serde(rename = "t-in-min")]
    minutes: u32,
    #[serde(rename = "t-in-s")]
    seconds: u32,
    #[serde(rename = "text-ca")]
    text: String,
}

impl IbusArrival {
    fn into_entry(self, line: Option<String>) -> ArrivalEntry {
        ArrivalEntry {
            line,
            route_id: self.route_id,
            minutes_remaining: self.minutes,
            seconds_remaining: self.seconds,
            display_text: self.text,
        }
    }
}

/// Client for the iBus arrival forecasts.
#[derive(Debug, Clone)]
pub struct ArrivalForecast {
    client: Client,
}

impl ArrivalForecast {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, TmbError> {
        Ok(Self::with_client(Client::new(app_id, app_key)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Upcoming arrivals at `stop_code`, in provider order.
    ///
    /// Without `line_code` every line serving the stop is included and each
    /// entry names its line. With `line_code` only that line is queried and
    /// entries leave `line` unset. No announced arrivals yields an empty vector.
    #[instrument(skip(self))]
    pub fn stop_forecast(
        &self,
        stop_code: &str,
        line_code: Option<&str>,
    ) -> Result<Vec<ArrivalEntry>, TmbError> {
        let url = match line_code {
            Some(line) => self
                .client
                .endpoint(&["ibus", "lines", line, "stops", stop_code])?,
            None => self.client.endpoint(&["ibus", "stops", stop_code])?,
        };
        let body: IbusResponse = self.client.fetch_json(url.clone(), &[])?;
        debug!(count = body.data.ibus.len(), "arrivals fetched");

        match line_code {
            Some(_) => Ok(body
                .data
                .ibus
                .into_iter()
                .map(|a| a.into_entry(None))
                .collect()),
            None => body
                .data
                .ibus
                .into_iter()
                .map(|mut a| match a.line.take() {
                    Some(line) => Ok(a.into_entry(Some(line))),
                    None => Err(TmbError::MalformedResponse {
                        url: url.to_string(),
                        reason: format!("arrival for route {} has no line", a.route_id),
                    }),
                })
                .collect(),
        }
    }

    /// The first announced arrival of `line_code` at `stop_code`, if any.
    #[instrument(skip(self))]
    pub fn next_arrival(
        &self,
        stop_code: &str,
        line_code: &str,
    ) -> Result<Option<ArrivalEntry>, TmbError> {
        Ok(self
            .stop_forecast(stop_code, Some(line_code))?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ibus_payload() {
        let json = r#"{
            "status": "success",
            "data": {"ibus": [
                {"line": "V21", "routeId": "211", "t-in-min": 3, "t-in-s": 187, "text-ca": "3 min"},
                {"line": "H12", "routeId": "1121", "t-in-min": 0, "t-in-s": 20, "text-ca": "imminent"}
            ]}
        }"#;
        let body: IbusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.data.ibus.len(), 2);
        let entry = body.data.ibus.into_iter().next().unwrap().into_entry(None);
        assert_eq!(entry.route_id, "211");
        assert_eq!(entry.minutes_remaining, 3);
        assert_eq!(entry.seconds_remaining, 187);
        assert_eq!(entry.display_text, "3 min");
        assert_eq!(entry.line, None);
    }

    #[test]
    fn empty_forecast_parses() {
        let body: IbusResponse =
            serde_json::from_str(r#"{"status":"success","data":{"ibus":[]}}"#).unwrap();
        assert!(body.data.ibus.is_empty());
    }

    #[test]
    fn missing_countdown_is_rejected() {
        let json = r#"{"data": {"ibus": [{"routeId": "211", "text-ca": "3 min"}]}}"#;
        assert!(serde_json::from_str::<IbusResponse>(json).is_err());
    }
}
