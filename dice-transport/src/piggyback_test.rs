use super::*;
use crate::record::test_handshake_record;

fn flight() -> Vec<u8> {
    test_handshake_record(1, 0)
}

#[test]
fn test_starts_unknown_with_nothing_to_attach() {
    let mut pb = PiggybackController::new(2);
    assert_eq!(pb.state(), PiggybackState::Unknown);
    assert!(pb.is_embedding());
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
    assert_eq!(pb.ack_to_attach(BindingKind::Request), None);
}

#[test]
fn test_capture_then_attach() {
    let mut pb = PiggybackController::new(2);
    pb.capture_flight(&flight());

    let attached = pb.data_to_attach(BindingKind::Request);
    assert_eq!(attached, Some(Bytes::from(flight())));
    // Still pending until acked.
    assert!(pb.data_to_attach(BindingKind::Response).is_some());
}

#[test]
fn test_inbound_data_resolves_supported_and_is_returned() {
    let mut pb = PiggybackController::new(2);
    let payload = flight();

    let fed = pb.report_piggybacked(BindingKind::Request, Some(&payload), None);
    assert_eq!(fed, Some(BytesMut::from(&payload[..])));
    assert_eq!(pb.state(), PiggybackState::Supported);

    // The received message is acked back.
    let acks = pb.ack_to_attach(BindingKind::Response);
    assert_eq!(acks, Some(Bytes::from(record::encode_acks(&[0]))));
}

#[test]
fn test_ack_clears_pending_flight() {
    let mut pb = PiggybackController::new(2);
    pb.capture_flight(&flight()); // carries message_seq 0

    let acks = record::encode_acks(&[0]);
    let fed = pb.report_piggybacked(BindingKind::Response, None, Some(&acks));
    assert_eq!(fed, None);
    assert_eq!(pb.state(), PiggybackState::Supported);
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
    assert_eq!(pb.pending_flight(), None);
}

#[test]
fn test_partial_ack_keeps_flight_pending() {
    let mut pb = PiggybackController::new(2);
    let mut two_messages = test_handshake_record(2, 1);
    two_messages.extend_from_slice(&test_handshake_record(11, 2));
    pb.capture_flight(&two_messages);

    let acks = record::encode_acks(&[1]);
    pb.report_piggybacked(BindingKind::Response, None, Some(&acks));
    assert!(pb.data_to_attach(BindingKind::Request).is_some());

    let acks = record::encode_acks(&[1, 2]);
    pb.report_piggybacked(BindingKind::Response, None, Some(&acks));
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
}

#[test]
fn test_unanswered_responses_resolve_not_supported() {
    let mut pb = PiggybackController::new(2);
    pb.capture_flight(&flight());

    pb.report_piggybacked(BindingKind::Response, None, None);
    assert_eq!(pb.state(), PiggybackState::Unknown);

    pb.report_piggybacked(BindingKind::Response, None, None);
    assert_eq!(pb.state(), PiggybackState::NotSupported);
    assert!(!pb.is_embedding());
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);

    // Terminal even if data shows up later.
    pb.capture_flight(&flight());
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
}

#[test]
fn test_empty_responses_without_pending_flight_do_not_count() {
    let mut pb = PiggybackController::new(2);
    for _ in 0..5 {
        pb.report_piggybacked(BindingKind::Response, None, None);
    }
    assert_eq!(pb.state(), PiggybackState::Unknown);
}

#[test]
fn test_complete_while_embedding() {
    let mut pb = PiggybackController::new(2);
    pb.report_piggybacked(BindingKind::Request, Some(&flight()), None);
    assert_eq!(pb.state(), PiggybackState::Supported);
    let final_flight = test_handshake_record(20, 3);
    pb.capture_flight(&final_flight);

    pb.set_handshake_complete();
    assert_eq!(pb.state(), PiggybackState::CompletedViaPiggyback);
    assert!(!pb.is_embedding());
    // The final flight keeps riding along until the peer acks it, and acks
    // still flow so the peer's last flight stops retransmitting.
    assert_eq!(
        pb.data_to_attach(BindingKind::Request),
        Some(Bytes::from(final_flight))
    );
    assert!(pb.ack_to_attach(BindingKind::Response).is_some());

    pb.report_piggybacked(BindingKind::Response, None, Some(&record::encode_acks(&[3])));
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
}

#[test]
fn test_complete_without_embedded_exchange_stays_unresolved() {
    let mut pb = PiggybackController::new(2);
    pb.set_handshake_complete();
    assert_eq!(pb.state(), PiggybackState::Unknown);
    assert!(!pb.is_embedding());
}

#[test]
fn test_failed_stops_embedding() {
    let mut pb = PiggybackController::new(2);
    pb.capture_flight(&flight());
    pb.set_handshake_failed();
    assert!(!pb.is_embedding());
    assert_eq!(pb.data_to_attach(BindingKind::Request), None);
}
