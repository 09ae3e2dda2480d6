use cuverie_telemetry::{new_request_ids, record_raw_message};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
}

#[test]
fn metrics_counter_increments() {
    let before = cuverie_telemetry::metrics().snapshot().raw_messages;
    record_raw_message();
    let after = cuverie_telemetry::metrics().snapshot().raw_messages;
    assert_eq!(after, before + 1);
}
