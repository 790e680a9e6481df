//! Fuzz the incremental scanner: arbitrary bytes must never panic, spans
//! must stay inside the buffer, errors must latch, and snapshots must
//! resume identically.
#![no_main]

use libfuzzer_sys::fuzz_target;
use spanjson::{Stream, TokenKind};

fuzz_target!(|data: &[u8]| {
    let mut stream: Stream = Stream::new();
    let mut snapshot = stream;
    let mut steps = 0usize;

    loop {
        // Snapshot at an arbitrary cadence and check it replays the same.
        if steps % 7 == 3 {
            snapshot = stream;
        }

        match stream.step(data) {
            Ok(tok) => {
                if tok.kind == TokenKind::Eof {
                    break;
                }
                assert!((tok.span.offset as usize) < data.len());
                assert!((tok.span.end() as usize) <= data.len());
            }
            Err(err) => {
                // Latched: the same error again, with no cursor movement.
                let cursor = stream.cursor();
                let again = stream.step(data).unwrap_err();
                assert_eq!(err, again);
                assert_eq!(stream.cursor(), cursor);
                break;
            }
        }

        steps += 1;
        assert!(steps <= data.len() + 2, "scanner failed to make progress");
    }

    // Replaying from the snapshot must not diverge (no panic, same kinds of
    // outcomes); exact equality is covered by unit tests.
    let mut replay = snapshot;
    for _ in 0..4 {
        if replay.step(data).is_err() {
            break;
        }
    }
});
