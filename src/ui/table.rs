use tabled::{builder::Builder, settings::Style, Table, Tabled};
use crate::attribute::{Projection, ATTRIBUTES};
use crate::histogram::Histogram;
use crate::passenger::Passenger;

#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "Attribute")]
    pub attribute: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct HistogramRow {
    #[tabled(rename = "Percentile")]
    pub bin: String,
    #[tabled(rename = "Passengers")]
    pub count: usize,
}

/// One record (or its projection) as an attribute/value table.
pub fn record_table(projection: &Projection<'_>) -> String {
    let rows: Vec<RecordRow> = projection
        .entries()
        .into_iter()
        .map(|(name, value)| RecordRow {
            attribute: name.to_string(),
            value: value.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Many records, one row each, columns in schema order.
pub fn passenger_table(passengers: &[Passenger]) -> String {
    let mut builder = Builder::default();
    builder.push_record(ATTRIBUTES.iter().map(|a| a.name.to_string()));
    for passenger in passengers {
        builder.push_record(ATTRIBUTES.iter().map(|a| a.read(passenger).to_string()));
    }

    builder.build().with(Style::rounded()).to_string()
}

pub fn histogram_table(histogram: &Histogram) -> String {
    let rows: Vec<HistogramRow> = histogram
        .entries
        .iter()
        .map(|e| HistogramRow {
            bin: format!("<= p{}", e.bin),
            count: e.count,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
