#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sitewise_history::{HistoryConfig, HistoryManager, RawItem};

#[derive(Debug, Arbitrary)]
enum Op {
    Add(u8, i32),
    Update(u8, i32),
    Remove(u8),
    Front(u8),
    Back(u8),
    Clear,
    StartBatch,
    EndBatch,
    CancelBatch,
    Undo,
    Redo,
}

fn key(id: u8) -> String {
    format!("k{}", id % 16)
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (depth, ops) = input;
    let max_depth = usize::from(depth.max(1));
    let mut h = HistoryManager::new(HistoryConfig::new(max_depth));

    for op in ops.iter().take(512) {
        let before = h.serialize().unwrap();
        let failed = match *op {
            Op::Add(id, x) => h.add(RawItem::new(key(id)).with("x", x)).is_err(),
            Op::Update(id, x) => h.update(&key(id), |i| i.with("x", x)).is_err(),
            Op::Remove(id) => h.remove(&key(id)).is_err(),
            Op::Front(id) => h.bring_to_front(&key(id)).is_err(),
            Op::Back(id) => h.send_to_back(&key(id)).is_err(),
            Op::Clear => {
                h.clear();
                false
            }
            Op::StartBatch => {
                h.start_batch();
                false
            }
            Op::EndBatch => {
                h.end_batch();
                false
            }
            Op::CancelBatch => {
                h.cancel_batch();
                false
            }
            Op::Undo => h.undo().is_err(),
            Op::Redo => h.redo().is_err(),
        };

        // Post-conditions that must always hold:
        if failed {
            assert_eq!(h.serialize().unwrap(), before, "failed op changed state");
        }
        assert!(h.undo_depth() <= max_depth, "depth limit exceeded");
        assert!(h.current().first_duplicate_id().is_none(), "duplicate id");
    }
});
