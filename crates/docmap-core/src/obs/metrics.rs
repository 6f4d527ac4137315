use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

///
/// EventState
/// Ephemeral, in-memory counters for mapping and write activity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Mapping registry
    pub entities_resolved: u64,
    pub sharded_entities_resolved: u64,
    pub resolution_failures: u64,

    // Write entrypoints
    pub insert_calls: u64,
    pub save_calls: u64,
    pub replace_calls: u64,
    pub update_calls: u64,

    // Shard-key filter augmentation
    pub shard_filters_augmented: u64,
    pub shard_fields_added: u64,
    pub shard_key_conflicts: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub writes: u64,
    pub shard_filters_augmented: u64,
    pub shard_key_conflicts: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with_borrow_mut(f)
}

pub(crate) fn report() -> EventReport {
    EVENT_STATE.with_borrow(|state| EventReport {
        ops: state.ops.clone(),
        entities: state.entities.clone(),
    })
}

pub(crate) fn reset_all() {
    EVENT_STATE.with_borrow_mut(|state| *state = EventState::default());
}
