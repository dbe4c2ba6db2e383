//! Line and stop metadata from the `transit` API.
//!
//! The API addresses a line's stops by its internal numeric code, not by the
//! public name, so [`TransitCatalog::list_stops_for_line`] runs as a pipeline:
//! fetch the bus catalog, locate the line by exact name, fetch its stops.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::error::TmbError;
use crate::models::{Line, Stop};

const BUS_LINES_PATH: [&str; 3] = ["transit", "linies", "bus"];
const METRO_LINES_PATH: [&str; 3] = ["transit", "linies", "metro"];

#[derive(Debug, Deserialize)]
struct FeatureCollection<P> {
    features: Vec<Feature<P>>,
}

#[derive(Debug, Deserialize)]
struct Feature<P> {
    properties: P,
}

#[derive(Debug, Deserialize)]
struct LineProperties {
    #[serde(rename = "CODI_LINIA")]
    code: u32,
    #[serde(rename = "NOM_LINIA")]
    name: String,
    #[serde(rename = "ORIGEN_LINIA")]
    origin: String,
    #[serde(rename = "DESTI_LINIA")]
    destination: String,
}

impl LineProperties {
    fn to_line(&self) -> Line {
        Line {
            code: self.code,
            name: self.name.clone(),
            description: format!("{} - {}", self.origin, self.destination),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StopProperties {
    #[serde(rename = "CODI_PARADA")]
    code: u32,
    #[serde(rename = "NOM_LINIA")]
    line: String,
    #[serde(rename = "NOM_PARADA")]
    name: String,
    #[serde(rename = "ADRECA")]
    address: String,
}

impl From<StopProperties> for Stop {
    fn from(p: StopProperties) -> Self {
        Stop {
            code: p.code,
            line: p.line,
            name: p.name,
            description: p.address,
        }
    }
}

/// Client for bus/metro line listings and per-line stop listings.
#[derive(Debug, Clone)]
pub struct TransitCatalog {
    client: Client,
}

impl TransitCatalog {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, TmbError> {
        Ok(Self::with_client(Client::new(app_id, app_key)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// All bus lines, sorted by name.
    #[instrument(skip(self))]
    pub fn list_bus_lines(&self) -> Result<Vec<Line>, TmbError> {
        let catalog = self.fetch_lines(&BUS_LINES_PATH)?;
        Ok(sorted_lines(&catalog))
    }

    /// All metro lines, sorted by name.
    #[instrument(skip(self))]
    pub fn list_metro_lines(&self) -> Result<Vec<Line>, TmbError> {
        let catalog = self.fetch_lines(&METRO_LINES_PATH)?;
        Ok(sorted_lines(&catalog))
    }

    /// Looks up a bus line by its exact public name.
    #[instrument(skip(self))]
    pub fn find_bus_line(&self, line_name: &str) -> Result<Line, TmbError> {
        let catalog = self.fetch_lines(&BUS_LINES_PATH)?;
        locate_line(&catalog, line_name).map(LineProperties::to_line)
    }

    /// Stops of the bus line named `line_name`, sorted by stop code.
    ///
    /// Fails with [`TmbError::InvalidLine`] without requesting any stops when
    /// the name is not in the bus catalog.
    #[instrument(skip(self))]
    pub fn list_stops_for_line(&self, line_name: &str) -> Result<Vec<Stop>, TmbError> {
        let catalog = self.fetch_lines(&BUS_LINES_PATH)?;
        let line = locate_line(&catalog, line_name)?;
        debug!(line = %line.name, code = line.code, "resolved line code");

        let mut stops = self.fetch_stops(line.code)?;
        stops.sort_by_key(|s| s.code);
        Ok(stops)
    }

    fn fetch_lines(&self, path: &[&str]) -> Result<Vec<LineProperties>, TmbError> {
        let body: FeatureCollection<LineProperties> = self.client.get_json(path, &[])?;
        debug!(count = body.features.len(), "lines fetched");
        Ok(body.features.into_iter().map(|f| f.properties).collect())
    }

    fn fetch_stops(&self, line_code: u32) -> Result<Vec<Stop>, TmbError> {
        let code = line_code.to_string();
        let body: FeatureCollection<StopProperties> = self
            .client
            .get_json(&["transit", "linies", "bus", code.as_str(), "parades"], &[])?;
        debug!(count = body.features.len(), "stops fetched");
        Ok(body
            .features
            .into_iter()
            .map(|f| Stop::from(f.properties))
            .collect())
    }
}

fn sorted_lines(catalog: &[LineProperties]) -> Vec<Line> {
    let mut lines: Vec<Line> = catalog.iter().map(LineProperties::to_line).collect();
    lines.sort_by(|a, b| a.name.cmp(&b.name));
    lines
}

fn locate_line<'a>(
    catalog: &'a [LineProperties],
    line_name: &str,
) -> Result<&'a LineProperties, TmbError> {
    catalog
        .iter()
        .find(|l| l.name == line_name)
        .ok_or_else(|| TmbError::InvalidLine {
            name: line_name.to_string(),
        })
}
