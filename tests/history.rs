use texture_painter::{Color, HistoryStack, PixelBuffer, Snapshot};

fn snapshot(n: u8) -> Snapshot {
    let mut buffer = PixelBuffer::blank(24, 24).unwrap();
    buffer.set(0, 0, Color::rgba(n, 0, 0, 255)).unwrap();
    buffer.snapshot()
}

#[test]
fn test_bound_evicts_oldest_entries() {
    let mut history = HistoryStack::new(30);
    for n in 0..40 {
        assert!(history.push(snapshot(n)));
    }
    assert_eq!(history.len(), 30);
    assert_eq!(history.current().unwrap().as_bytes(), snapshot(39).as_bytes());

    let mut undos = 0;
    while history.can_undo() {
        assert!(history.undo().is_some());
        undos += 1;
    }
    assert_eq!(undos, 29);
    assert!(history.undo().is_none());
    assert_eq!(history.current().unwrap().as_bytes(), snapshot(10).as_bytes());
}

#[test]
fn test_undo_then_redo_restores_exact_bytes() {
    let mut history = HistoryStack::default();
    history.reset(snapshot(1));
    history.push(snapshot(2));

    let undone = history.undo().unwrap();
    assert_eq!(undone.as_bytes(), snapshot(1).as_bytes());
    let redone = history.redo().unwrap();
    assert_eq!(redone.as_bytes(), snapshot(2).as_bytes());
    assert!(history.redo().is_none());
}

#[test]
fn test_push_after_undo_discards_redo_branch() {
    let mut history = HistoryStack::default();
    history.reset(snapshot(1));
    history.push(snapshot(2));
    history.push(snapshot(3));
    history.undo();
    history.undo();
    assert!(history.can_redo());

    history.push(snapshot(4));
    assert!(!history.can_redo());
    assert!(history.redo().is_none());
    assert_eq!(history.len(), 2);
    assert_eq!(history.undo().unwrap().as_bytes(), snapshot(1).as_bytes());
}

#[test]
fn test_identical_push_is_ignored() {
    let mut history = HistoryStack::default();
    history.reset(snapshot(1));
    assert!(!history.push(snapshot(1)));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_reset_leaves_nothing_to_undo() {
    let mut history = HistoryStack::default();
    history.reset(snapshot(1));
    history.push(snapshot(2));
    history.reset(snapshot(5));

    let state = history.state();
    assert_eq!((state.index, state.len), (0, 1));
    assert!(!state.can_undo);
    assert!(!state.can_redo);
}
