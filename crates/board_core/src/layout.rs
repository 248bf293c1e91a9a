//! Text the views put into marquee items and grid cells.

use shared::domain::{GridRow, ShipmentRecord};

pub const GRID_COLUMNS: [&str; 5] = ["Day", "Customer", "Reference", "Arrival / Departure", "Type"];

/// Single-line marquee label, e.g. `ACME #R-1 [FCL]`.
pub fn record_label(record: &ShipmentRecord) -> String {
    let mut label = if record.customer.is_empty() {
        "-".to_string()
    } else {
        record.customer.clone()
    };
    if let Some(reference) = record.reference.as_deref() {
        label.push_str(" #");
        label.push_str(reference);
    }
    if let Some(kind) = record.display_type() {
        label.push_str(" [");
        label.push_str(kind);
        label.push(']');
    }
    label
}

fn schedule_text(record: &ShipmentRecord) -> String {
    match (record.arrival.as_deref(), record.departure.as_deref()) {
        (Some(arrival), Some(departure)) => format!("{arrival} / {departure}"),
        (Some(arrival), None) => arrival.to_string(),
        (None, Some(departure)) => format!("- / {departure}"),
        (None, None) => "-".to_string(),
    }
}

pub fn grid_cells(row: &GridRow) -> [String; 5] {
    [
        row.weekday.abbrev().to_string(),
        row.record.customer.clone(),
        row.record.display_reference().to_string(),
        schedule_text(&row.record),
        row.record.display_type().unwrap_or("").to_string(),
    ]
}
