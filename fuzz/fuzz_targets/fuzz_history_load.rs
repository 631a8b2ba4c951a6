#![no_main]

use libfuzzer_sys::fuzz_target;
use sitewise_history::{Annotation, HistoryManager, RawItem};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 8192 {
        return;
    }

    // A rejected load must leave the document untouched.
    let mut raw = HistoryManager::<RawItem>::default();
    raw.add(RawItem::new("seed")).unwrap();
    let before = raw.serialize().unwrap();
    match raw.load(text) {
        Ok(()) => {
            // Accepted documents must re-encode and reload identically.
            let encoded = raw.serialize().unwrap();
            let mut again = HistoryManager::<RawItem>::default();
            again.load(&encoded).unwrap();
            assert_eq!(again.current(), raw.current());
            assert_eq!(raw.undo_depth(), 0);
        }
        Err(_) => assert_eq!(raw.serialize().unwrap(), before),
    }

    let mut typed = HistoryManager::<Annotation>::default();
    if typed.load(text).is_ok() {
        // Typed geometry must survive a re-encode bit for bit.
        let encoded = typed.serialize().unwrap();
        let mut again = HistoryManager::<Annotation>::default();
        again.load(&encoded).unwrap();
        assert_eq!(again.current(), typed.current());
        assert_eq!(again.serialize().unwrap(), encoded);
    }
});
