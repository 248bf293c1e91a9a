use std::{fmt, str::FromStr};

use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Placeholder the sheet uses for "no shipment type".
pub const TYPE_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    #[serde(default, alias = "customer_reference", deserialize_with = "null_as_empty")]
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
}

/// Sheets export blank cells as `null`; treat them like a missing key.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ShipmentRecord {
    /// Trims every field and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        Self {
            customer: self.customer.trim().to_string(),
            reference: clean_optional(self.reference),
            arrival: clean_optional(self.arrival),
            departure: clean_optional(self.departure),
            kind: clean_optional(self.kind),
        }
    }

    /// Arrival if present, otherwise departure. An unparseable arrival still wins.
    pub fn effective_date_raw(&self) -> Option<&str> {
        non_blank(&self.arrival).or_else(|| non_blank(&self.departure))
    }

    pub fn display_type(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != TYPE_PLACEHOLDER)
    }

    pub fn display_reference(&self) -> &str {
        self.reference.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Sunday-first canonical order used by the weekly grid.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWeekday(pub String);

impl fmt::Display for UnknownWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weekday '{}'", self.0)
    }
}

impl std::error::Error for UnknownWeekday {}

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownWeekday(trimmed.to_string()))
    }
}

/// One row of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub weekday: Weekday,
    pub record: ShipmentRecord,
}

/// The fetched board document, either keyed by weekday name or already flat.
///
/// Weekday keys keep the order the source wrote them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDocument {
    ByWeekday(Vec<(String, Vec<ShipmentRecord>)>),
    Flat(Vec<ShipmentRecord>),
}

impl RecordDocument {
    /// Concatenates every record in source order, normalizing each one.
    pub fn flatten(&self) -> Vec<ShipmentRecord> {
        match self {
            RecordDocument::ByWeekday(days) => days
                .iter()
                .flat_map(|(_, records)| records.iter().cloned())
                .map(ShipmentRecord::normalized)
                .collect(),
            RecordDocument::Flat(records) => records
                .iter()
                .cloned()
                .map(ShipmentRecord::normalized)
                .collect(),
        }
    }

    /// Grid rows ordered Sunday..Saturday, stable within a day.
    ///
    /// Keys that are not weekday names are skipped. Rows under a weekday key keep
    /// their day even when undated, because the key itself places them. A flat
    /// document has no day keys, so `weekday_of` supplies one per record and
    /// `None` leaves it out.
    pub fn weekly_rows(
        &self,
        weekday_of: impl Fn(&ShipmentRecord) -> Option<Weekday>,
    ) -> Vec<GridRow> {
        let mut rows: Vec<GridRow> = match self {
            RecordDocument::ByWeekday(days) => days
                .iter()
                .filter_map(|(name, records)| {
                    name.parse::<Weekday>().ok().map(|weekday| (weekday, records))
                })
                .flat_map(|(weekday, records)| {
                    records.iter().cloned().map(move |record| GridRow {
                        weekday,
                        record: record.normalized(),
                    })
                })
                .collect(),
            RecordDocument::Flat(records) => records
                .iter()
                .cloned()
                .map(ShipmentRecord::normalized)
                .filter_map(|record| {
                    weekday_of(&record).map(|weekday| GridRow { weekday, record })
                })
                .collect(),
        };
        rows.sort_by_key(|row| row.weekday.position());
        rows
    }

    pub fn record_count(&self) -> usize {
        match self {
            RecordDocument::ByWeekday(days) => days.iter().map(|(_, r)| r.len()).sum(),
            RecordDocument::Flat(records) => records.len(),
        }
    }
}

impl Serialize for RecordDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordDocument::ByWeekday(days) => {
                let mut map = serializer.serialize_map(Some(days.len()))?;
                for (day, records) in days {
                    map.serialize_entry(day, records)?;
                }
                map.end()
            }
            RecordDocument::Flat(records) => records.serialize(serializer),
        }
    }
}

struct RecordDocumentVisitor;

impl<'de> Visitor<'de> for RecordDocumentVisitor {
    type Value = RecordDocument;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of weekday name to shipment records, or a list of shipment records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(record) = seq.next_element::<ShipmentRecord>()? {
            records.push(record);
        }
        Ok(RecordDocument::Flat(records))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut days = Vec::with_capacity(map.size_hint().unwrap_or(7));
        while let Some((day, records)) = map.next_entry::<String, Vec<ShipmentRecord>>()? {
            days.push((day, records));
        }
        Ok(RecordDocument::ByWeekday(days))
    }
}

impl<'de> Deserialize<'de> for RecordDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordDocumentVisitor)
    }
}
