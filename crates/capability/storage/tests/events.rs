use cuverie_storage::{EVENT_LOG_CAP, EventLogStore, InMemoryEventLogStore};
use domain::{EventCategory, EventRecord, EventSource};

fn event(i: usize) -> EventRecord {
    EventRecord {
        id: format!("event-{i}"),
        ts_ms: i as i64,
        tank_index: Some(101),
        category: EventCategory::Telemetry,
        source: EventSource::System,
        summary: format!("sample {i}"),
        details: None,
        metadata: None,
    }
}

#[tokio::test]
async fn event_log_is_capped_most_recent_first() {
    let store = InMemoryEventLogStore::new();
    for i in 0..(EVENT_LOG_CAP + 20) {
        store.append(event(i)).await.expect("append");
    }

    let events = store.list(EVENT_LOG_CAP + 20).await.expect("list");
    assert_eq!(events.len(), EVENT_LOG_CAP);
    // 新在前，最旧的 20 条已被淘汰
    assert_eq!(events.first().expect("first").id, "event-519");
    assert_eq!(events.last().expect("last").id, "event-20");
}

#[tokio::test]
async fn event_log_list_respects_limit() {
    let store = InMemoryEventLogStore::new();
    for i in 0..10 {
        store.append(event(i)).await.expect("append");
    }
    let events = store.list(3).await.expect("list");
    assert_eq!(events.len(), 3);
    assert_eq!(events.first().expect("first").id, "event-9");
}
