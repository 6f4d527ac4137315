//! Metrics sink boundary.
//!
//! Mapping and write logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// WriteKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteKind {
    Insert,
    Save,
    Replace,
    Update,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    EntityResolved {
        entity_path: &'static str,
        shard_fields: u64,
    },
    ResolutionFailed {
        entity_path: &'static str,
    },
    WriteStart {
        kind: WriteKind,
        entity_path: &'static str,
    },
    ShardFilterAugmented {
        entity_path: &'static str,
        fields_added: u64,
    },
    ShardKeyConflict {
        entity_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::EntityResolved { shard_fields, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.entities_resolved = m.ops.entities_resolved.saturating_add(1);
                    if shard_fields > 0 {
                        m.ops.sharded_entities_resolved =
                            m.ops.sharded_entities_resolved.saturating_add(1);
                    }
                });
            }

            MetricsEvent::ResolutionFailed { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.resolution_failures = m.ops.resolution_failures.saturating_add(1);
                });
            }

            MetricsEvent::WriteStart { kind, entity_path } => {
                metrics::with_state_mut(|m| {
                    let calls = match kind {
                        WriteKind::Insert => &mut m.ops.insert_calls,
                        WriteKind::Save => &mut m.ops.save_calls,
                        WriteKind::Replace => &mut m.ops.replace_calls,
                        WriteKind::Update => &mut m.ops.update_calls,
                    };
                    *calls = calls.saturating_add(1);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.writes = entry.writes.saturating_add(1);
                });
            }

            MetricsEvent::ShardFilterAugmented {
                entity_path,
                fields_added,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.shard_filters_augmented = m.ops.shard_filters_augmented.saturating_add(1);
                    m.ops.shard_fields_added = m.ops.shard_fields_added.saturating_add(fields_added);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.shard_filters_augmented = entry.shard_filters_augmented.saturating_add(1);
                });
            }

            MetricsEvent::ShardKeyConflict { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.shard_key_conflicts = m.ops.shard_key_conflicts.saturating_add(1);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.shard_key_conflicts = entry.shard_key_conflicts.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with_borrow(Clone::clone);

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with_borrow_mut(|slot| *slot = prev);
        }
    }

    let prev = SINK_OVERRIDE.with_borrow_mut(|slot| slot.replace(sink));
    let _guard = Guard(prev);

    f()
}
