//! Record formatting for the `tracing` fmt layer.
//!
//! Both formats carry the same information: `time`, `level`, `msg` and any
//! extra structured fields, the extras sorted by key. JSON writes one object
//! per line. Plain writes logfmt-style `key=value` pairs.

use crate::level::Level;
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Field that overrides the level label. `tracing` has no fatal or panic
/// level, so those records travel as errors carrying this field. Only exact
/// level labels are honoured; any other value stays an ordinary field.
pub const SEVERITY_FIELD: &str = "envlog.severity";

const LEVEL_KEY: &str = "level";
const MSG_KEY: &str = "msg";
const TIME_KEY: &str = "time";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Format {
    Plain,
    Json,
}

impl Format {
    /// `JSON` in any case selects JSON, anything else is plain text.
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("JSON") {
            Format::Json
        } else {
            Format::Plain
        }
    }
}

/// One event, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: String,
    pub level: String,
    pub msg: String,
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn to_json(&self) -> String {
        let mut object = Map::new();
        for (key, value) in &self.fields {
            // clashing user fields are kept under a prefix rather than dropped
            let key = match key.as_str() {
                LEVEL_KEY | MSG_KEY | TIME_KEY => format!("fields.{}", key),
                _ => key.clone(),
            };
            object.insert(key, value.clone());
        }
        object.insert(LEVEL_KEY.to_string(), Value::String(self.level.clone()));
        object.insert(MSG_KEY.to_string(), Value::String(self.msg.clone()));
        object.insert(TIME_KEY.to_string(), Value::String(self.time.clone()));
        Value::Object(object).to_string()
    }

    pub fn to_plain(&self) -> String {
        let mut line = String::new();
        push_pair(&mut line, TIME_KEY, &self.time);
        push_pair(&mut line, LEVEL_KEY, &self.level);
        push_pair(&mut line, MSG_KEY, &self.msg);
        for (key, value) in &self.fields {
            match value {
                Value::String(s) => push_pair(&mut line, key, s),
                other => push_pair(&mut line, key, &other.to_string()),
            }
        }
        line
    }
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    if needs_quoting(value) {
        let _ = write!(line, "{}={:?}", key, value);
    } else {
        let _ = write!(line, "{}={}", key, value);
    }
}

fn needs_quoting(value: &str) -> bool {
    !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

/// Level of an event, taking the severity override into account.
pub fn event_level(event: &Event<'_>) -> Level {
    let mut visitor = SeverityVisitor::default();
    event.record(&mut visitor);
    visitor
        .severity
        .unwrap_or_else(|| Level::from(event.metadata().level()))
}

#[derive(Default)]
struct SeverityVisitor {
    severity: Option<Level>,
}

impl Visit for SeverityVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == SEVERITY_FIELD {
            self.severity = Level::from_label(value);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

#[derive(Default)]
struct RecordVisitor {
    msg: String,
    severity: Option<Level>,
    fields: BTreeMap<String, Value>,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        let severity = match (field.name(), &value) {
            (SEVERITY_FIELD, Value::String(s)) => Level::from_label(s),
            _ => None,
        };
        if severity.is_some() {
            self.severity = severity;
            return;
        }
        match field.name() {
            "message" => {
                self.msg = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                }
            }
            // bridged `log` records carry their metadata as fields
            name if name.starts_with("log.") => {}
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for RecordVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}

/// Event formatter plugged into the fmt layer.
#[derive(Debug, Clone, Copy)]
pub struct RecordFormat {
    format: Format,
}

impl RecordFormat {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn record(event: &Event<'_>) -> Record {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let level = visitor
            .severity
            .unwrap_or_else(|| Level::from(event.metadata().level()))
            .to_string();
        Record {
            time: chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            level,
            msg: visitor.msg,
            fields: visitor.fields,
        }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = Self::record(event);
        match self.format {
            Format::Json => writeln!(writer, "{}", record.to_json()),
            Format::Plain => writeln!(writer, "{}", record.to_plain()),
        }
    }
}
