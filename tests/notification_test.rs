use bikeshare_billing::application::processor::{ChargeProcessor, NOTIFICATION_SUBJECT};
use bikeshare_billing::config::ProcessorConfig;
use bikeshare_billing::error::BillingError;
use bikeshare_billing::infrastructure::authorizer::SimulatedAuthorizer;
use bikeshare_billing::infrastructure::in_memory::InMemoryChargeStore;
use common::MockNotifier;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

mod common;

type Sent = Arc<Mutex<Vec<(String, String, String)>>>;

fn recording_notifier(sent: Sent) -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_message()
        .returning(move |destination, subject, body| {
            sent.lock().unwrap().push((
                destination.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        });
    notifier
}

#[tokio::test]
async fn test_notify_sends_exactly_once() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_message()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (processor, _queue) = ChargeProcessor::new(
        Box::new(InMemoryChargeStore::new()),
        Arc::new(SimulatedAuthorizer::new()),
        Arc::new(notifier),
        ProcessorConfig::default(),
    );

    let charge = common::charge(1, 1, 0, dec!(50.0), "1234566789");
    processor.notify(&charge).await.unwrap();
}

#[tokio::test]
async fn test_notify_passes_destination_subject_and_body() {
    let sent: Sent = Arc::default();
    let (processor, _queue) = ChargeProcessor::new(
        Box::new(InMemoryChargeStore::new()),
        Arc::new(SimulatedAuthorizer::new()),
        Arc::new(recording_notifier(sent.clone())),
        ProcessorConfig::default(),
    );

    let charge = common::charge(1, 7, 0, dec!(100.0), "1234566789");
    processor.notify(&charge).await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (destination, subject, body) = &sent[0];
    assert_eq!(destination, "7");
    assert_eq!(subject, NOTIFICATION_SUBJECT);
    assert_eq!(body, &processor.compose_message(&charge));
}

#[tokio::test]
async fn test_notify_propagates_notifier_error() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_message()
        .times(1)
        .returning(|_, _, _| Err(BillingError::Notification("gateway down".to_string())));

    let (processor, _queue) = ChargeProcessor::new(
        Box::new(InMemoryChargeStore::new()),
        Arc::new(SimulatedAuthorizer::new()),
        Arc::new(notifier),
        ProcessorConfig::default(),
    );

    let charge = common::charge(1, 1, 20, dec!(5), "");
    let result = processor.notify(&charge).await;
    assert!(matches!(result, Err(BillingError::Notification(_))));
}

#[tokio::test]
async fn test_notify_overdue_only_reaches_overdue_riders() {
    let sent: Sent = Arc::default();
    let (processor, _queue) = ChargeProcessor::new(
        Box::new(InMemoryChargeStore::new()),
        Arc::new(SimulatedAuthorizer::new()),
        Arc::new(recording_notifier(sent.clone())),
        ProcessorConfig::default(),
    );

    processor
        .load_charges(vec![
            common::charge(1, 10, 13, dec!(20.0), ""),
            common::charge(2, 11, 2, dec!(20.0), ""),
            common::charge(3, 12, 48, dec!(35.5), ""),
        ])
        .await
        .unwrap();

    let count = processor.notify_overdue().await.unwrap();
    assert_eq!(count, 2);

    let destinations: Vec<String> = sent
        .lock()
        .unwrap()
        .iter()
        .map(|(destination, _, _)| destination.clone())
        .collect();
    assert_eq!(destinations, vec!["10".to_string(), "12".to_string()]);
}

#[tokio::test]
async fn test_notify_overdue_skips_failed_sends() {
    let mut notifier = MockNotifier::new();
    let mut attempt = 0;
    notifier
        .expect_send_message()
        .times(2)
        .returning(move |_, _, _| {
            attempt += 1;
            if attempt == 1 {
                Err(BillingError::Notification("mailbox full".to_string()))
            } else {
                Ok(())
            }
        });

    let (processor, _queue) = ChargeProcessor::new(
        Box::new(InMemoryChargeStore::new()),
        Arc::new(SimulatedAuthorizer::new()),
        Arc::new(notifier),
        ProcessorConfig::default(),
    );
    processor
        .load_charges(vec![
            common::charge(1, 1, 13, dec!(1), ""),
            common::charge(2, 2, 13, dec!(1), ""),
        ])
        .await
        .unwrap();

    assert_eq!(processor.notify_overdue().await.unwrap(), 1);
}
