//! Routes `tracing` events to the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wasm_bindgen::JsValue;
use web_sys::console;

/// A layer writing each event to `console.error/warn/info/debug` by level.
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = JsValue::from_str(&visitor.finish(meta.target()));
        match *meta.level() {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            _ => console::debug_1(&line),
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self, target: &str) -> String {
        format!("[{}] {}{}", target, self.message, self.fields)
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Installs the console layer as the global subscriber.
///
/// Later calls keep the first subscriber.
pub fn init_logging(level: LevelFilter) {
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer).with(level);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_formats_fields() {
        let visitor = MessageVisitor {
            message: "check failed".to_string(),
            fields: " check=checkHDR".to_string(),
        };
        assert_eq!(
            visitor.finish("hdr_canvas::capability"),
            "[hdr_canvas::capability] check failed check=checkHDR"
        );
    }
}
