use slicekit_core::codec::{decode_table, encode_table};
use slicekit_core::error::SliceKitError;
use slicekit_core::model::{Point, Rect, Slice};
use slicekit_core::table::SliceTable;

fn table_of(records: Vec<(&str, Slice)>) -> SliceTable {
    SliceTable::from_records(records.into_iter().map(|(n, s)| (n.to_string(), s)))
}

/// Byte-exact layout for a fully-populated record.
#[test]
fn test_golden_bytes() {
    let slice = Slice::new(Rect::new(0, 0, 10, 8))
        .with_center(Rect::new(2, 2, 3, 3))
        .with_pivot(Point::new(-1, 1));
    let table = table_of(vec![("icon", slice)]);

    let bytes = encode_table(&table).unwrap();
    assert_eq!(
        bytes,
        vec![
            1,    // count
            4,    // key length
            b'i', b'c', b'o', b'n',
            0,    // bounds.x
            0,    // bounds.y
            0x0A, 0xC1, // w=10 | h=8<<5 | pivot 0x4000 | center 0x8000, LE
            0xFA, // center 2 | 2<<2 | 3<<4 | 3<<6
            0x89, // pivot |x|=1 | |y|=1<<3 | x-negative 0x80
        ]
    );
}

#[test]
fn test_round_trip_in_range() {
    let slice = Slice::new(Rect::new(200, 255, 31, 63))
        .with_center(Rect::new(1, 2, 3, 1))
        .with_pivot(Point::new(-7, 7));
    let table = table_of(vec![("panel", slice)]);

    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    let got = decoded.get("panel").unwrap();
    assert_eq!(got.bounds, Rect::new(200, 255, 31, 63));
    assert_eq!(got.center, Rect::new(1, 2, 3, 1));
    assert_eq!(got.pivot, Point::new(-7, 7));
    assert!(got.is_nine_patch());
}

/// Plain records carry neither optional byte.
#[test]
fn test_simple_record_has_no_optional_bytes() {
    let table = table_of(vec![("dot", Slice::new(Rect::new(5, 6, 7, 8)))]);
    let bytes = encode_table(&table).unwrap();
    // count + key length + 3 key bytes + x + y + packed u16
    assert_eq!(bytes.len(), 1 + 1 + 3 + 2 + 2);

    let decoded = decode_table(&bytes).unwrap();
    let got = decoded.get("dot").unwrap();
    assert_eq!(got.center, Rect::ZERO);
    assert_eq!(got.pivot, Point::ZERO);
    assert!(!got.is_nine_patch());
}

/// Out-of-range fields alias via masking instead of erroring.
#[test]
fn test_width_masks_to_five_bits() {
    let table = table_of(vec![("wide", Slice::new(Rect::new(0, 0, 40, 8)))]);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    assert_eq!(decoded.get("wide").unwrap().bounds.w, 40 & 0x1F);
    assert_eq!(decoded.get("wide").unwrap().bounds.w, 8);
}

#[test]
fn test_height_masks_to_six_bits() {
    let table = table_of(vec![("tall", Slice::new(Rect::new(0, 0, 8, 100)))]);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    assert_eq!(decoded.get("tall").unwrap().bounds.h, 100 & 0x3F);
}

#[test]
fn test_pivot_magnitude_aliases_at_seven() {
    let table = table_of(vec![(
        "far",
        Slice::new(Rect::new(0, 0, 4, 4)).with_pivot(Point::new(15, -9)),
    )]);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    // 15 & 7 == 7; 9 & 7 == 1, sign preserved
    assert_eq!(decoded.get("far").unwrap().pivot, Point::new(7, -1));
}

#[test]
fn test_center_components_mask_to_two_bits() {
    let table = table_of(vec![(
        "inset",
        Slice::new(Rect::new(0, 0, 10, 10)).with_center(Rect::new(5, 1, 6, 3)),
    )]);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    assert_eq!(decoded.get("inset").unwrap().center, Rect::new(1, 1, 2, 3));
}

/// Source-sheet-only metadata is dropped by the compact format.
#[test]
fn test_scale_and_space_not_carried() {
    let mut slice = Slice::new(Rect::new(0, 0, 4, 4));
    slice.scale = 2;
    slice.has_space = true;
    let table = table_of(vec![("hd", slice)]);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    assert_eq!(decoded.get("hd").unwrap().scale, 1);
    assert!(!decoded.get("hd").unwrap().has_space);
}

#[test]
fn test_capacity_at_255_entries() {
    let records: Vec<(String, Slice)> = (0..255)
        .map(|i| (format!("slice_{i}"), Slice::new(Rect::new(0, 0, 1, 1))))
        .collect();
    let table = SliceTable::from_records(records);
    assert_eq!(table.len(), 255);

    let bytes = encode_table(&table).unwrap();
    let decoded = decode_table(&bytes).unwrap();
    assert_eq!(decoded.len(), 255);
}

#[test]
fn test_capacity_exceeded_at_256_entries() {
    let records: Vec<(String, Slice)> = (0..256)
        .map(|i| (format!("slice_{i}"), Slice::new(Rect::new(0, 0, 1, 1))))
        .collect();
    let table = SliceTable::from_records(records);

    match encode_table(&table) {
        Err(SliceKitError::CapacityExceeded { count }) => assert_eq!(count, 256),
        other => panic!("Expected CapacityExceeded, got {other:?}"),
    }
}

#[test]
fn test_key_too_long() {
    let long = "k".repeat(256);
    let table = SliceTable::from_records(vec![(long, Slice::new(Rect::new(0, 0, 1, 1)))]);

    match encode_table(&table) {
        Err(SliceKitError::KeyTooLong { len, .. }) => assert_eq!(len, 256),
        other => panic!("Expected KeyTooLong, got {other:?}"),
    }
}

#[test]
fn test_multibyte_key_length_counts_bytes() {
    // 86 four-byte scalars: 344 bytes, over the limit despite 86 chars.
    let long = "\u{1F600}".repeat(86);
    let table = SliceTable::from_records(vec![(long, Slice::new(Rect::new(0, 0, 1, 1)))]);
    match encode_table(&table) {
        Err(SliceKitError::KeyTooLong { len, .. }) => assert_eq!(len, 344),
        other => panic!("Expected KeyTooLong, got {other:?}"),
    }
}

#[test]
fn test_truncated_empty_input() {
    match decode_table(&[]) {
        Err(SliceKitError::TruncatedInput { needed, remaining }) => {
            assert_eq!(needed, 1);
            assert_eq!(remaining, 0);
        }
        other => panic!("Expected TruncatedInput, got {other:?}"),
    }
}

#[test]
fn test_truncated_mid_key() {
    // One record whose key claims 4 bytes but only 1 follows.
    match decode_table(&[1, 4, b'i']) {
        Err(SliceKitError::TruncatedInput { needed, remaining }) => {
            assert_eq!(needed, 3);
            assert_eq!(remaining, 1);
        }
        other => panic!("Expected TruncatedInput, got {other:?}"),
    }
}

#[test]
fn test_truncated_missing_center_byte() {
    // Valid through the packed field, center flag set, no center byte.
    let bytes = vec![1, 1, b'a', 0, 0, 0x0A, 0x80];
    match decode_table(&bytes) {
        Err(SliceKitError::TruncatedInput { .. }) => {}
        other => panic!("Expected TruncatedInput, got {other:?}"),
    }
}

/// Key bytes are decoded lossily; bad UTF-8 never fails a load.
#[test]
fn test_invalid_utf8_key_is_lossy() {
    let bytes = vec![1, 1, 0xFF, 0, 0, 0x0A, 0x00];
    let decoded = decode_table(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(decoded.contains("\u{FFFD}"));
}

#[test]
fn test_empty_table_round_trip() {
    let table = SliceTable::default();
    let bytes = encode_table(&table).unwrap();
    assert_eq!(bytes, vec![0]);
    assert!(decode_table(&bytes).unwrap().is_empty());
}

#[test]
fn test_round_trip_many_records() {
    let records: Vec<(String, Slice)> = (0..200u8)
        .map(|i| {
            let slice = Slice::new(Rect::new(i as i32, (i / 2) as i32, (i % 32) as i32, 8))
                .with_center(Rect::new(1, 1, (i % 3) as i32 + 1, 2))
                .with_pivot(Point::new((i % 8) as i32 - 4, 3));
            (format!("s{i}"), slice)
        })
        .collect();
    let table = SliceTable::from_records(records);
    let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
    assert_eq!(decoded, table);
}
