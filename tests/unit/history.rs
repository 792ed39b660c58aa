use super::*;

#[test]
fn undo_redo_walks_both_ways() {
    let mut h = EditHistory::new(10);
    h.push("crop primary", 0, 1);
    h.push("crop dependent", 1, 2);
    assert_eq!(h.undo_description(), Some("crop dependent"));

    assert_eq!(h.undo(), Some(("crop dependent".to_string(), 1)));
    assert_eq!(h.undo(), Some(("crop primary".to_string(), 0)));
    assert_eq!(h.undo(), None);
    assert!(h.can_redo());

    assert_eq!(h.redo(), Some(("crop primary".to_string(), 1)));
    assert!(h.can_undo());
}

#[test]
fn new_change_clears_redo() {
    let mut h = EditHistory::new(10);
    h.push("a", 0, 1);
    h.undo();
    h.push("b", 0, 5);
    assert!(!h.can_redo());
    assert_eq!(h.redo(), None);
}

#[test]
fn depth_is_bounded() {
    let mut h = EditHistory::new(2);
    for i in 0..5 {
        h.push(format!("step {i}"), i, i + 1);
    }
    assert_eq!(h.undo().map(|(_, s)| s), Some(4));
    assert_eq!(h.undo().map(|(_, s)| s), Some(3));
    assert_eq!(h.undo(), None);

    let mut off = EditHistory::new(0);
    off.push("ignored", 0, 1);
    assert!(!off.can_undo());
    off.clear();
}
