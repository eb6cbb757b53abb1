use super::*;
use crate::transport::FrameSink;

fn frame_of(v: u8) -> Frame {
    Frame::filled(v)
}

#[test]
fn starts_dark_and_keeps_the_last_frame_when_idle() {
    let (mut sink, source) = ChannelSource::pair();
    let mut latest = LatestFrame::new(source, ReceivePolicy::DrainToLatest);
    assert!(!latest.poll().unwrap());
    assert_eq!(latest.current(), &Frame::empty());

    sink.publish(&frame_of(3)).unwrap();
    assert!(latest.poll().unwrap());
    assert!(!latest.poll().unwrap());
    assert!(!latest.poll().unwrap());
    assert_eq!(latest.current(), &frame_of(3));
}

#[test]
fn drain_policy_jumps_to_the_newest() {
    let (mut sink, source) = ChannelSource::pair();
    let mut latest = LatestFrame::new(source, ReceivePolicy::DrainToLatest);
    for v in 1..=4 {
        sink.publish(&frame_of(v)).unwrap();
    }
    assert!(latest.poll().unwrap());
    assert_eq!(latest.current(), &frame_of(4));
    assert_eq!(latest.stats().received, 4);
}

#[test]
fn one_per_poll_walks_the_backlog() {
    let (mut sink, source) = ChannelSource::pair();
    let mut latest = LatestFrame::new(source, ReceivePolicy::OnePerPoll);
    for v in 1..=3 {
        sink.publish(&frame_of(v)).unwrap();
    }
    let mut seen = Vec::new();
    while latest.poll().unwrap() {
        seen.push(latest.current().get(0, 0, 0));
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn malformed_payloads_are_counted_and_dropped() {
    let (tx, rx) = mpsc::channel();
    let mut latest = LatestFrame::new(ChannelSource::new(rx), ReceivePolicy::DrainToLatest);
    tx.send(vec![9; 512]).unwrap();
    tx.send(vec![1; 100]).unwrap();
    latest.poll().unwrap();
    assert_eq!(latest.current(), &frame_of(9));
    assert_eq!(
        latest.stats(),
        TransportStats {
            received: 1,
            malformed: 1
        }
    );
}

#[test]
fn disconnect_is_a_transport_error() {
    let (sink, source) = ChannelSource::pair();
    drop(sink);
    let mut latest = LatestFrame::new(source, ReceivePolicy::DrainToLatest);
    assert!(matches!(latest.poll(), Err(TessledError::Transport(_))));
}
