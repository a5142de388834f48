

use crate::capture::{LinkType, MockSource};
use crate::config::Config;
use crate::report::{write_report, Format};
use crate::store::StoreKind;
use crate::tcp::{Key, Registry, Segment};
use packets::{pcap_file, PacketFactory};
use std::io::Write;

fn registry_from(frames: Vec<(&str, Vec<u8>)>) -> Registry {
    let mut source = MockSource::new(LinkType::Ethernet);
    for (desc, frame) in frames {
        source.inject_frame(desc, frame);
    }
    let mut registry = Registry::new(StoreKind::Memory);
    registry.run(&mut source).unwrap();
    registry
}

fn text_report(registry: &Registry) -> String {
    let mut out = Vec::new();
    write_report(registry, Format::Text, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_handshake_then_data() {
    let registry = registry_from(vec![
        ("Client SYN", PacketFactory::syn("10.0.0.2", "10.0.0.1", 12345, 80, 1000)),
        ("Client data", PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 1001, 1, b"AB")),
    ]);

    let key = Key::new_for_test("10.0.0.2", 12345, "10.0.0.1", 80);
    let stream = registry.get(&key).unwrap();
    assert_eq!(stream.written().ranges(), &[0..2]);
    assert!(stream.diffs().is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_conflicting_retransmission_is_reported() {
    let registry = registry_from(vec![
        ("A", PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 2000, 1, b"hello")),
        ("B", PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 2000, 1, b"howdy")),
    ]);

    let key = Key::new_for_test("10.0.0.2", 12345, "10.0.0.1", 80);
    let snapshot = registry.peek_stream(&key).unwrap();
    assert_eq!(snapshot.diffs, 1);
    assert_eq!(snapshot.covered, 5);

    assert_eq!(
        text_report(&registry),
        "Stream 0a000002:12345->0a000001:80 has diffs:\nhello\nvs\nhowdy\n"
    );
}

#[test]
fn test_directions_are_independent_streams() {
    let registry = registry_from(vec![
        ("C→S SYN", PacketFactory::syn("10.0.0.2", "10.0.0.1", 12345, 80, 1000)),
        ("S→C SYN", PacketFactory::syn("10.0.0.1", "10.0.0.2", 80, 12345, 9000)),
        ("C→S data", PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 1001, 9001, b"ping")),
        ("S→C data", PacketFactory::data("10.0.0.1", "10.0.0.2", 80, 12345, 9001, 1005, b"pong")),
    ]);

    let forward = Key::new_for_test("10.0.0.2", 12345, "10.0.0.1", 80);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(&forward).unwrap().id(), 1);
    assert_eq!(registry.get(&forward.reverse()).unwrap().id(), 2);
    for stream in registry.streams() {
        assert_eq!(stream.written().ranges(), &[0..4]);
        assert!(stream.diffs().is_empty());
    }
}

#[test]
fn test_pure_acks_create_stream_but_no_ranges() {
    let registry = registry_from(vec![
        ("ACK", PacketFactory::ack("10.0.0.2", "10.0.0.1", 12345, 80, 5000, 1)),
        ("ACK", PacketFactory::ack("10.0.0.2", "10.0.0.1", 12345, 80, 5000, 2)),
        ("DNS", PacketFactory::udp("10.0.0.2", "10.0.0.9", 5353, 53, b"query")),
    ]);

    let key = Key::new_for_test("10.0.0.2", 12345, "10.0.0.1", 80);
    let snapshot = registry.peek_stream(&key).unwrap();
    assert_eq!(snapshot.segments, 2);
    assert_eq!(snapshot.ranges, 0);
    assert_eq!(snapshot.diffs, 0);
    assert_eq!(registry.len(), 1);
    assert_eq!(text_report(&registry), "");
}

#[test]
fn test_dispatch_creates_streams_lazily() {
    let mut registry = Registry::new(StoreKind::Memory);
    assert!(registry.is_empty());

    let a = Key::new_for_test("10.0.0.2", 1, "10.0.0.1", 80);
    let b = Key::new_for_test("10.0.0.3", 1, "10.0.0.1", 80);
    registry.dispatch(b, &Segment::data(70, b"x")).unwrap();
    registry.dispatch(a, &Segment::data(10, b"y")).unwrap();
    registry.dispatch(b, &Segment::data(71, b"z")).unwrap();

    let ids: Vec<(u64, Key)> = registry.streams().iter().map(|s| (s.id(), *s.key())).collect();
    assert_eq!(ids, vec![(1, b), (2, a)]);
    assert_eq!(registry.get_mut(&b).unwrap().read(0, 2).unwrap(), b"xz");
}

#[test]
fn test_report_lists_only_streams_with_diffs_in_order() {
    let mut registry = Registry::new(StoreKind::Memory);
    let quiet = Key::new_for_test("10.0.0.5", 1000, "10.0.0.1", 80);
    let first = Key::new_for_test("10.0.0.2", 2000, "10.0.0.1", 80);
    let second = Key::new_for_test("10.0.0.3", 3000, "10.0.0.1", 80);

    registry.dispatch(quiet, &Segment::data(1, b"same")).unwrap();
    registry.dispatch(first, &Segment::data(1, b"aaaa")).unwrap();
    registry.dispatch(second, &Segment::data(1, b"cc")).unwrap();
    registry.dispatch(quiet, &Segment::data(1, b"same")).unwrap();
    registry.dispatch(second, &Segment::data(1, b"dd")).unwrap();
    registry.dispatch(first, &Segment::data(1, b"bbbb")).unwrap();
    registry.dispatch(first, &Segment::data(3, b"ZZ")).unwrap();

    assert_eq!(
        text_report(&registry),
        "Stream 0a000002:2000->0a000001:80 has diffs:\n\
         aaaa\nvs\nbbbb\n\
         bb\nvs\nZZ\n\
         Stream 0a000003:3000->0a000001:80 has diffs:\n\
         cc\nvs\ndd\n"
    );

    let mut out = Vec::new();
    write_report(&registry, Format::Json, &mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let streams = json["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["stream"], "0a000002:2000->0a000001:80");
    assert_eq!(streams[0]["diffs"][1]["offset"], 2);
    assert_eq!(streams[0]["diffs"][1]["previous"], "6262");
    assert_eq!(streams[0]["diffs"][1]["current"], "5a5a");
    assert_eq!(streams[1]["diffs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_key_renders_hex_octets() {
    let key = Key::new_for_test("192.168.0.1", 443, "fe80::1", 51000);
    assert_eq!(
        key.to_string(),
        "c0a80001:443->fe800000000000000000000000000001:51000"
    );
}

#[test]
fn test_run_over_capture_file() {
    let frames = vec![
        PacketFactory::syn("10.0.0.2", "10.0.0.1", 12345, 80, 1000),
        PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 1001, 1, b"hello"),
        PacketFactory::ack("10.0.0.1", "10.0.0.2", 80, 12345, 1, 1006),
        PacketFactory::data("10.0.0.2", "10.0.0.1", 12345, 80, 1001, 1, b"howdy"),
    ];
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&pcap_file(1, &frames)).unwrap();
    file.flush().unwrap();

    for store in [StoreKind::Memory, StoreKind::File] {
        let config = Config {
            file: file.path().to_path_buf(),
            store,
            format: Format::Text,
        };
        let mut out = Vec::new();
        let stats = crate::run(&config, &mut out).unwrap();

        assert_eq!(stats.frames, 4);
        assert_eq!(stats.segments, 4);
        assert_eq!(stats.streams, 2);
        assert_eq!(stats.streams_with_diffs, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Stream 0a000002:12345->0a000001:80 has diffs:\nhello\nvs\nhowdy\n"
        );
    }
}

#[test]
fn test_run_fails_without_output_on_missing_file() {
    let config = Config {
        file: "/nonexistent/capture.pcap".into(),
        store: StoreKind::Memory,
        format: Format::Text,
    };
    let mut out = Vec::new();
    assert!(matches!(
        crate::run(&config, &mut out),
        Err(crate::Error::Io(_))
    ));
    assert!(out.is_empty());
}
