//! Property-based tests for report stream resynchronization.
//!
//! Run with: cargo test --test proptest_resync

use ld2450::frame::FrameBuffer;
use ld2450::protocol::report::{REPORT_HEADER, Report, SLOTS, Target};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A target whose fields survive the wire's 1 mm / 1 cm/s quantization.
fn arb_target() -> impl Strategy<Value = Target> {
    (-32767i32..=32767, -32767i32..=32767, -32767i32..=32767, 0u16..=u16::MAX).prop_map(
        |(x, y, speed, res)| Target {
            x: f64::from(x) / 10.0,
            y: f64::from(y) / 10.0,
            speed: f64::from(speed),
            resolution: f64::from(res) / 10.0,
        },
    )
}

fn arb_report() -> impl Strategy<Value = Report> {
    prop::array::uniform3(arb_target()).prop_map(|targets: [Target; SLOTS]| Report { targets })
}

/// Line noise weighted toward header and tail bytes, so partial markers
/// (`AA`, `AA FF`, `AA FF 03`, stray `55 CC`) show up often. Only a complete
/// header is ruled out.
fn arb_noise() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop_oneof![
        Just(0xAAu8),
        Just(0xFF),
        Just(0x03),
        Just(0x00),
        Just(0x55),
        Just(0xCC),
        any::<u8>(),
    ];
    prop::collection::vec(byte, 0..40).prop_filter("no full header", |b| !contains_header(b))
}

fn contains_header(bytes: &[u8]) -> bool {
    bytes.windows(REPORT_HEADER.len()).any(|w| w == REPORT_HEADER)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Noise between frames is skipped and every frame surfaces in order.
    #[test]
    fn interleaved_noise_yields_every_report(
        frames in prop::collection::vec((arb_noise(), arb_report()), 0..8)
    ) {
        let mut buf = FrameBuffer::new();
        for (noise, report) in &frames {
            buf.extend(noise);
            buf.extend(&report.encode());
        }

        let decoded: Vec<Report> = std::iter::from_fn(|| buf.decode_report()).collect();
        let expected: Vec<Report> = frames.iter().map(|(_, r)| *r).collect();
        prop_assert_eq!(decoded, expected);
        prop_assert!(buf.is_empty());
    }

    /// A partial header right before a real frame does not hide it.
    #[test]
    fn partial_header_before_frame_is_skipped(
        cut in 1usize..4,
        report in arb_report(),
    ) {
        let mut buf = FrameBuffer::new();
        buf.extend(&REPORT_HEADER[..cut]);
        buf.extend(&report.encode());

        prop_assert_eq!(buf.decode_report(), Some(report));
        prop_assert!(buf.is_empty());
    }

    /// Bytes without a report header are neither decoded nor consumed.
    #[test]
    fn garbage_is_left_untouched(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        prop_assume!(!contains_header(&bytes));
        let mut buf = FrameBuffer::new();
        buf.extend(&bytes);

        prop_assert!(buf.decode_report().is_none());
        prop_assert_eq!(buf.as_slice(), bytes.as_slice());
    }

    /// A frame cut short at the end of the buffer is given up; frames
    /// before it still decode.
    #[test]
    fn truncated_last_frame_is_dropped(
        reports in prop::collection::vec(arb_report(), 1..5),
        cut in 4usize..30,
    ) {
        let mut buf = FrameBuffer::new();
        for report in &reports {
            buf.extend(&report.encode());
        }
        let last = Report::default().encode();
        buf.extend(&last[..cut]);

        let decoded: Vec<Report> = std::iter::from_fn(|| buf.decode_report()).collect();
        prop_assert_eq!(decoded, reports);
        prop_assert!(!contains_header(buf.as_slice()));
    }

    /// Bytes without a command tail are never taken as a response.
    #[test]
    fn partial_response_waits_for_tail(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(!bytes.windows(4).any(|w| w == [0x04, 0x03, 0x02, 0x01]));
        let mut buf = FrameBuffer::new();
        buf.extend(&bytes);

        prop_assert!(buf.decode_command_response().is_none());
        prop_assert_eq!(buf.len(), bytes.len());
    }
}
