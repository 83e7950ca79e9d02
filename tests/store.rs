use std::fs;

use texture_painter::store::{load_texture, saved_faces, save_texture, texture_key};
use texture_painter::{
    Color, EditorConfig, EditorSession, FaceId, FileStore, GridPos, HistoryControl, InputEvent,
    KeyValueStore, MemoryStore, PixelBuffer, PixelSource,
};
use uuid::Uuid;

#[test]
fn test_session_saves_and_reopens() {
    let store = MemoryStore::new();
    let texture = Uuid::new_v4();

    let mut session =
        EditorSession::open(EditorConfig::default(), FaceId::West, &PixelSource::Blank).unwrap();
    session.handle_input(InputEvent::PointerDown(GridPos::new(7, 8)));
    session.handle_input(InputEvent::PointerUp(GridPos::new(7, 8)));
    session.save(&store, texture).unwrap();

    let reopened =
        EditorSession::open_saved(EditorConfig::default(), &store, texture, FaceId::West).unwrap();
    assert_eq!(reopened.current().get(7, 8).unwrap(), Color::BLACK);
    assert!(!reopened.history_state().can_undo);
    assert_eq!(saved_faces(&store, texture).unwrap(), vec![FaceId::West]);
}

#[test]
fn test_corrupt_record_opens_blank() {
    let store = MemoryStore::new();
    let texture = Uuid::new_v4();
    store.set(&texture_key(texture, FaceId::Up), b"{ not json").unwrap();

    assert!(load_texture(&store, texture, FaceId::Up).is_err());
    let session =
        EditorSession::open_saved(EditorConfig::default(), &store, texture, FaceId::Up).unwrap();
    assert!(session.current().as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_file_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("texture_painter_{}", Uuid::new_v4()));
    let store = FileStore::new(&dir);
    let texture = Uuid::new_v4();

    assert!(store.list_prefix("texture/").unwrap().is_empty());
    assert!(load_texture(&store, texture, FaceId::South).unwrap().is_none());

    let buffer = PixelBuffer::filled(24, 24, Color::rgba(1, 2, 3, 4)).unwrap();
    save_texture(&store, texture, FaceId::South, &buffer).unwrap();
    save_texture(&store, texture, FaceId::East, &buffer).unwrap();

    let record = load_texture(&store, texture, FaceId::South).unwrap().unwrap();
    assert_eq!(record.to_buffer().unwrap(), buffer);
    assert_eq!(
        saved_faces(&store, texture).unwrap(),
        vec![FaceId::East, FaceId::South]
    );

    fs::remove_dir_all(&dir).unwrap();
}
