// Chart-ready series domain models
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// One normalized row: an axis label plus named numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub axis: String,
    pub values: BTreeMap<String, f64>,
}

impl ChartPoint {
    pub fn new(axis: impl Into<String>) -> Self {
        Self {
            axis: axis.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Ordered points for one metric domain. `axis_key` names the category
/// field in the serialized form, e.g. `name`, `subject` or `skill`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub axis_key: String,
    pub points: Vec<ChartPoint>,
}

impl Series {
    pub fn new(axis_key: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            axis_key: axis_key.into(),
            points,
        }
    }

    pub fn empty(axis_key: impl Into<String>) -> Self {
        Self::new(axis_key, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        self.points.iter().map(|p| p.axis.clone()).collect()
    }
}

// Points serialize flat: {"name": "Jan", "total": 1200}
impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a>(&'a str, &'a ChartPoint);

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.1.values.len() + 1))?;
                map.serialize_entry(self.0, &self.1.axis)?;
                for (key, value) in &self.1.values {
                    match whole_number(*value) {
                        Some(whole) => map.serialize_entry(key, &whole)?,
                        None => map.serialize_entry(key, value)?,
                    }
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.points.len()))?;
        for point in &self.points {
            seq.serialize_element(&Row(&self.axis_key, point))?;
        }
        seq.end()
    }
}

// 2^53: beyond this f64 no longer holds every integer exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn whole_number(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER).then_some(value as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Radar,
    Scatter,
    Pie,
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "radar" => Ok(ChartKind::Radar),
            "scatter" => Ok(ChartKind::Scatter),
            "pie" => Ok(ChartKind::Pie),
            other => Err(format!("unknown chart kind '{}'", other)),
        }
    }
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Radar,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];
}

/// How a value is turned into tooltip text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueFormat {
    Plain,
    Percent,
    Currency { symbol: String },
}

impl ValueFormat {
    pub fn currency(symbol: &str) -> Self {
        ValueFormat::Currency {
            symbol: symbol.to_string(),
        }
    }

    pub fn format(&self, value: f64, fraction_digits: Option<usize>) -> String {
        let number = format_number(value, fraction_digits);
        match self {
            ValueFormat::Plain => number,
            ValueFormat::Percent => format!("{}%", number),
            ValueFormat::Currency { symbol } => format!("{}{}", symbol, number),
        }
    }
}

/// Locale-independent number text. Integral values print without a
/// fractional part unless digits are requested.
fn format_number(value: f64, fraction_digits: Option<usize>) -> String {
    match fraction_digits {
        Some(digits) => format!("{:.*}", digits, value),
        None if value.fract() == 0.0 => format!("{:.0}", value),
        None => format!("{}", value),
    }
}

/// Display metadata for one series key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesKey {
    pub key: String,
    pub name: String,
    pub format: ValueFormat,
    pub fraction_digits: Option<usize>,
    pub color: Option<String>,
}

impl SeriesKey {
    pub fn new(key: &str, name: &str, format: ValueFormat) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            format,
            fraction_digits: None,
            color: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_fraction_digits(mut self, digits: usize) -> Self {
        self.fraction_digits = Some(digits);
        self
    }

    pub fn format(&self, value: f64) -> String {
        self.format.format(value, self.fraction_digits)
    }
}

/// Declared series keys, in legend order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub keys: Vec<SeriesKey>,
}

impl SeriesDescriptor {
    pub fn new(keys: Vec<SeriesKey>) -> Self {
        Self { keys }
    }

    pub fn get(&self, key: &str) -> Option<&SeriesKey> {
        self.keys.iter().find(|k| k.key == key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn key_names(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Display name lookup, e.g. `average` -> "Class Average"
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.get(key).map(|k| k.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_format() {
        assert_eq!(ValueFormat::Plain.format(1200.0, None), "1200");
        assert_eq!(ValueFormat::Percent.format(85.0, None), "85%");
        assert_eq!(ValueFormat::Percent.format(85.26, Some(1)), "85.3%");
        assert_eq!(ValueFormat::currency("$").format(1900.0, None), "$1900");
        assert_eq!(ValueFormat::Plain.format(2.5, None), "2.5");
    }

    #[test]
    fn test_series_serializes_flat_rows() {
        let series = Series::new(
            "name",
            vec![
                ChartPoint::new("Jan").with("total", 1200.0),
                ChartPoint::new("Feb").with("total", 1900.5),
            ],
        );
        assert_eq!(
            serde_json::to_string(&series).unwrap(),
            r#"[{"name":"Jan","total":1200},{"name":"Feb","total":1900.5}]"#
        );
    }

    #[test]
    fn test_chart_kind_from_str() {
        assert_eq!("Radar".parse::<ChartKind>(), Ok(ChartKind::Radar));
        assert!("donut".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_descriptor_lookup() {
        let descriptor = SeriesDescriptor::new(vec![
            SeriesKey::new("value", "Your Skills", ValueFormat::Percent),
            SeriesKey::new("average", "Class Average", ValueFormat::Percent),
        ]);
        assert_eq!(descriptor.display_name("average"), Some("Class Average"));
        assert!(!descriptor.declares("total"));
        assert_eq!(descriptor.key_names(), vec!["value", "average"]);
    }
}
