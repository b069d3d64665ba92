#![forbid(unsafe_code)]

//! Rejected entries are skipped, reported, and logged.
//!
//! Run:
//!   cargo test -p stackmenu-core --test tree_diagnostics

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stackmenu_core::logging::TREE_TARGET;
use stackmenu_core::path::PathError;
use stackmenu_core::tree::{Entry, PathTree, RejectionReason};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (result, captured)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn invalid_paths_are_reported_and_logged() {
    let (tree, events) = with_captured_events(|| {
        PathTree::build(vec![
            Entry::new("Good/Leaf", 1),
            Entry::new("", 2),
            Entry::new("Trailing/", 3),
            Entry::new("Also/Good", 4),
        ])
    });

    let report = tree.report();
    assert_eq!(report.accepted, 2);
    let reasons: Vec<_> = report
        .rejections
        .iter()
        .map(|r| (r.entry_index, r.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (1, RejectionReason::InvalidPath(PathError::Empty)),
            (2, RejectionReason::InvalidPath(PathError::TrailingSeparator)),
        ]
    );

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN && e.target == TREE_TARGET)
        .collect();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[1].fields.get("path").map(String::as_str), Some("Trailing/"));
    assert_eq!(warnings[1].fields.get("entry_index").map(String::as_str), Some("2"));
}

#[test]
fn duplicate_leaf_keeps_first_and_logs() {
    let (tree, events) = with_captured_events(|| {
        PathTree::build(vec![Entry::new("A/B", "first"), Entry::new("A/B", "second")])
    });

    assert_eq!(tree.report().rejections[0].reason, RejectionReason::DuplicateLeaf);
    let indexed: Vec<&str> = tree.indexed_leaves().iter().map(|l| *l.leaf.value()).collect();
    assert_eq!(indexed, vec!["first"]);
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.target == TREE_TARGET)
    );
}

#[test]
fn build_summary_is_debug_level() {
    let (_, events) = with_captured_events(|| PathTree::build(vec![Entry::new("Qux", 3)]));
    let summary = events
        .iter()
        .find(|e| e.fields.get("message").map(String::as_str) == Some("menu tree built"))
        .expect("summary event");
    assert_eq!(summary.level, tracing::Level::DEBUG);
    assert_eq!(summary.fields.get("accepted").map(String::as_str), Some("1"));
}
