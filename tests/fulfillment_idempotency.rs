//! Idempotency of license fulfillment under concurrent redelivery.
//!
//! Stripe may deliver one event several times, in parallel. Whatever the
//! interleaving, each event ID yields exactly one license and every caller
//! gets that license back.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use ar_billing::adapters::licensing::{
    FileLicenseLedger, InMemoryLicenseLedger, LedgerFulfillmentSink,
};
use ar_billing::domain::licensing::LicenseTier;
use ar_billing::ports::{FulfillmentRequest, FulfillmentSink, LicenseLedger};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn request(event_id: &str, tier: LicenseTier) -> FulfillmentRequest {
    FulfillmentRequest {
        event_id: event_id.to_string(),
        email: "buyer@example.com".to_string(),
        tier,
    }
}

/// Fulfill every `(event, copies)` pair concurrently; return the keys per call.
async fn deliver_all(
    sink: Arc<LedgerFulfillmentSink>,
    deliveries: &[(String, usize)],
) -> Vec<(String, String)> {
    let mut tasks = Vec::new();
    for (event_id, copies) in deliveries {
        for _ in 0..*copies {
            let sink = sink.clone();
            let event_id = event_id.clone();
            tasks.push(tokio::spawn(async move {
                let fulfillment = sink
                    .fulfill(request(&event_id, LicenseTier::Standard))
                    .await
                    .unwrap();
                (event_id, fulfillment.license.key.as_str().to_string())
            }));
        }
    }

    let mut keys = Vec::new();
    for task in futures::future::join_all(tasks).await {
        keys.push(task.unwrap());
    }
    keys
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_redeliveries_issue_one_license_per_event(
        copies in prop::collection::vec(1usize..6, 1..6)
    ) {
        let deliveries: Vec<(String, usize)> = copies
            .iter()
            .enumerate()
            .map(|(i, n)| (format!("evt_{}", i), *n))
            .collect();

        let rt = runtime();
        let (keys, records) = rt.block_on(async {
            let ledger = Arc::new(InMemoryLicenseLedger::new());
            let sink = Arc::new(LedgerFulfillmentSink::new(ledger.clone()));
            let keys = deliver_all(sink, &deliveries).await;
            (keys, ledger.list().await.unwrap())
        });

        prop_assert_eq!(records.len(), deliveries.len());
        for (event_id, key) in &keys {
            let record = records
                .iter()
                .find(|r| r.is_for_event(event_id))
                .expect("record for delivered event");
            prop_assert_eq!(record.key.as_str(), key.as_str());
        }
    }
}

// =============================================================================
// File Ledger
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn file_ledger_survives_concurrent_redelivery_and_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licenses.json");

    let ledger = Arc::new(FileLicenseLedger::open(&path).await.unwrap());
    let sink = Arc::new(LedgerFulfillmentSink::new(ledger));
    let deliveries = vec![("evt_a".to_string(), 8), ("evt_b".to_string(), 3)];

    let keys = deliver_all(sink, &deliveries).await;
    let distinct: HashSet<&str> = keys.iter().map(|(_, k)| k.as_str()).collect();
    assert_eq!(distinct.len(), 2);

    // A fresh process sees the same ledger and still deduplicates
    let reopened = Arc::new(FileLicenseLedger::open(&path).await.unwrap());
    assert_eq!(reopened.list().await.unwrap().len(), 2);

    let sink = LedgerFulfillmentSink::new(reopened.clone());
    let again = sink
        .fulfill(request("evt_a", LicenseTier::Standard))
        .await
        .unwrap();
    assert!(again.duplicate);
    assert!(distinct.contains(again.license.key.as_str()));
    assert_eq!(reopened.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn ledger_file_keeps_original_document_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licenses.json");

    let ledger = Arc::new(FileLicenseLedger::open(&path).await.unwrap());
    LedgerFulfillmentSink::new(ledger)
        .fulfill(request("evt_1", LicenseTier::Lite))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &doc["licenses"][0];
    assert_eq!(entry["email"], "buyer@example.com");
    assert_eq!(entry["tier"], "Lite");
    assert!(entry["key"].as_str().unwrap().starts_with("ARLITE-"));
    assert!(entry["timestamp"].is_string());
    assert_eq!(entry["event_id"], "evt_1");
}
