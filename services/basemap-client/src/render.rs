//! Rendering of demographic query results.

use clap::ValueEnum;
use feature_query::{FeatureRecord, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

impl OutputFormat {
    fn line_break(&self) -> &'static str {
        match self {
            OutputFormat::Text => "\n",
            OutputFormat::Html => "</br>",
        }
    }
}

fn field(record: &FeatureRecord, name: &str) -> String {
    record
        .get(name)
        .map(FieldValue::to_string)
        .unwrap_or_else(|| FieldValue::Null.to_string())
}

/// One line per zone: `TAZ = <taz> 2010 population = <p10> 2016 population = <p16>.`
pub fn render_records(records: &[FeatureRecord], format: OutputFormat) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "TAZ = {} 2010 population = {} 2016 population = {}.{}",
                field(record, "taz"),
                field(record, "total_pop_2010"),
                field(record, "total_pop_2016"),
                format.line_break()
            )
        })
        .collect()
}

/// Output area. Each result replaces the previous one.
pub trait RecordSink {
    fn replace(&mut self, content: String);
}

/// Writes each result to stdout.
pub struct StdoutSink;

impl RecordSink for StdoutSink {
    fn replace(&mut self, content: String) {
        print!("{}", content);
    }
}

/// Keeps only the latest result.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub content: Option<String>,
}

impl RecordSink for BufferSink {
    fn replace(&mut self, content: String) {
        self.content = Some(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(taz: i64, p10: i64, p16: Option<i64>) -> FeatureRecord {
        let attributes = json!({"taz": taz, "total_pop_2010": p10, "total_pop_2016": p16});
        FeatureRecord::from_attributes(
            attributes.as_object().unwrap(),
            &["taz", "town", "total_pop_2010", "total_pop_2016"],
            None,
        )
    }

    #[test]
    fn test_text_lines() {
        let out = render_records(&[record(1025, 2547, Some(2611))], OutputFormat::Text);
        assert_eq!(out, "TAZ = 1025 2010 population = 2547 2016 population = 2611.\n");
    }

    #[test]
    fn test_html_lines_and_nulls() {
        let out = render_records(
            &[record(1025, 2547, Some(2611)), record(1019, 3120, None)],
            OutputFormat::Html,
        );
        assert_eq!(
            out,
            "TAZ = 1025 2010 population = 2547 2016 population = 2611.</br>\
             TAZ = 1019 2010 population = 3120 2016 population = null.</br>"
        );
    }

    #[test]
    fn test_buffer_sink_last_write_wins() {
        let mut sink = BufferSink::default();
        sink.replace("first".to_string());
        sink.replace("second".to_string());
        assert_eq!(sink.content.as_deref(), Some("second"));
    }
}
