//! In-memory event capture for tests
//!
//! `init_test_capture()` installs a layer that records every event emitted
//! by the `log_op_*` macros, so tests can check an operation's lifecycle
//! without parsing formatted output.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};

/// One recorded event; every field is kept in its display form
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct FieldMap<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldMap<'_> {
    // Strings arrive here unquoted; everything else goes through Debug
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    sink: Sink,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldMap(&mut fields));

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Shared view of everything captured so far
#[derive(Clone)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    fn new() -> (CaptureLayer, Self) {
        let sink = Sink::default();
        (CaptureLayer { sink: sink.clone() }, Self { sink })
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event with this `op` and `event` was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            events.len()
        );
    }

    /// Assert `op` emitted a start and a successful end, and never failed
    ///
    /// # Panics
    ///
    /// Panics if either event is missing or an `end_error` was captured
    pub fn assert_completed(&self, op: &str) {
        self.assert_event_exists(op, EVENT_START);
        self.assert_event_exists(op, EVENT_END);
        let failures = self.count_events(|e| e.is(op, EVENT_END_ERROR));
        assert_eq!(failures, 0, "op={} logged {} end_error events", op, failures);
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber
///
/// Every test in a binary shares the returned handle, so assertions should
/// look for specific operations rather than count everything.
///
/// ```
/// use scorekeep_core::logging_facility::test_capture::init_test_capture;
/// use scorekeep_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("score_list");
/// capture.assert_event_exists("score_list", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCapture::new();
            tracing_subscriber::registry().with(layer).try_init().ok();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};
    use crate::schema::FIELD_ERR_CODE;

    fn capture_locally(f: impl FnOnce()) -> TestCapture {
        let (layer, capture) = TestCapture::new();
        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), f);
        capture
    }

    #[test]
    fn test_macros_emit_the_schema_keys() {
        let capture = capture_locally(|| {
            crate::log_op_start!("score_get", score_id = 3);
        });

        let events = capture.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.level, Level::INFO);
        assert_eq!(event.op(), Some("score_get"));
        assert_eq!(event.event(), Some(EVENT_START));
        assert_eq!(event.component(), Some(module_path!()));
        assert_eq!(event.field("score_id"), Some("3"));
    }

    #[test]
    fn test_completed_lifecycle() {
        let capture = capture_locally(|| {
            crate::log_op_start!("score_list");
            crate::log_op_end!("score_list", duration_ms = 1, row_count = 2u64);
        });

        capture.assert_completed("score_list");
        let end = capture
            .events()
            .into_iter()
            .find(|e| e.event() == Some(EVENT_END))
            .unwrap();
        assert_eq!(end.field("duration_ms"), Some("1"));
        assert_eq!(end.field("row_count"), Some("2"));
    }

    #[test]
    fn test_error_event_carries_code_and_message() {
        let err = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
        let capture = capture_locally(|| {
            crate::log_op_error!("score_create", &err, duration_ms = 4);
        });

        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].event(), Some(EVENT_END_ERROR));
        assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_PERSISTENCE"));
        assert_eq!(events[0].field("err_message"), Some("disk I/O error"));
    }

    #[test]
    #[should_panic(expected = "end_error")]
    fn test_assert_completed_rejects_failed_op() {
        let err = ExError::new(ExErrorKind::Io);
        let capture = capture_locally(|| {
            crate::log_op_start!("store_open");
            crate::log_op_end!("store_open", duration_ms = 0);
            crate::log_op_error!("store_open", &err, duration_ms = 0);
        });

        capture.assert_completed("store_open");
    }
}
