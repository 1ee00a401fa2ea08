//! End-to-end use through the facade.

use reel::prelude::*;
use reel_test_utils::{mock_packet_types, sample_stream};

#[test]
fn record_page_out_and_edit_window() {
    let registry = PacketProtocol::from_table_entries(mock_packet_types()).unwrap();
    let part = ReplayPart::from_packets(sample_stream(40, 250));
    assert_eq!(part.length(), 39 * 250);

    let mut cache = WriteableCache::new(Vec::new());
    let refs = page_out(&part, &registry, &mut cache).unwrap();
    let bytes = cache.into_inner();
    assert_eq!(refs.len(), 40);

    // Drop a five-second window, then restore it from the cache.
    let window = part.view_range(2_000, 7_000).unwrap();
    let before = window.packets();
    window.remove(2_000, 7_000).unwrap();
    assert_eq!(part.size(), 40 - before.len());

    page_in(&window, &refs, &registry, &bytes).unwrap();
    assert_eq!(window.packets(), before);
    assert_eq!(part.size(), 40);
}

#[test]
fn cursor_edits_through_facade() {
    let part = ReplayPart::from_packets(sample_stream(4, 10));
    let mut cursor: Cursor<_> = part.cursor();
    cursor.skip_to(20);
    let at_20 = cursor.next().unwrap();
    assert_eq!(at_20.time(), 20);
    cursor.remove().unwrap();
    assert_eq!(part.size(), 3);
}
