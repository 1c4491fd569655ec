//! Property-based tests for the IPC frame codec (spec §4.3).

use host_ipc::{FrameReader, FrameWriter};
use proptest::prelude::*;

proptest! {
    /// Any mix of string/int/long/double/bool items survives a
    /// write-then-parse roundtrip in the order they were added.
    #[test]
    fn frame_roundtrips_arbitrary_items(
        strings in prop::collection::vec("[a-zA-Z0-9 ]{0,16}", 0..4),
        ints in prop::collection::vec(any::<i32>(), 0..4),
        longs in prop::collection::vec(any::<i64>(), 0..4),
        flag in any::<bool>(),
    ) {
        let mut writer = FrameWriter::new();
        for s in &strings {
            writer.add_string(s.clone());
        }
        for i in &ints {
            writer.add_int(*i);
        }
        for l in &longs {
            writer.add_long(*l);
        }
        writer.add_bool(flag);

        let bytes = writer.finish();
        let reader = FrameReader::parse(&bytes).unwrap();

        prop_assert_eq!(reader.get_count(), strings.len() + ints.len() + longs.len() + 1);

        let mut position = 0;
        for s in &strings {
            prop_assert_eq!(reader.get_string(position).unwrap(), s.as_str());
            position += 1;
        }
        for i in &ints {
            prop_assert_eq!(reader.get_int(position).unwrap(), *i);
            position += 1;
        }
        for l in &longs {
            prop_assert_eq!(reader.get_long(position).unwrap(), *l);
            position += 1;
        }
        prop_assert_eq!(reader.get_bool(position).unwrap(), flag);
    }

    /// A frame truncated at any byte offset before its declared end is
    /// always rejected, never parsed into a bogus partial item.
    #[test]
    fn truncated_frame_never_parses(value in any::<i64>(), cut in 1usize..11) {
        let mut writer = FrameWriter::new();
        writer.add_long(value);
        let bytes = writer.finish();
        let truncated = &bytes[..bytes.len().saturating_sub(cut).max(1)];
        prop_assert!(FrameReader::parse(truncated).is_err());
    }
}
