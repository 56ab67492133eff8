use std::fs;

use picture_puzzle::core::{BestTimeKey, BestTimeStore, GameSession, SessionConfig};
use picture_puzzle::store::{JsonFileStore, StoreConfig};
use picture_puzzle::types::{GameType, PointerPhase, Size};

fn file_config(path: std::path::PathBuf) -> StoreConfig {
    StoreConfig {
        path: Some(path),
        disabled: false,
    }
}

fn solve_jigsaw(session: &mut GameSession) {
    loop {
        let next = {
            let board = session.board().and_then(|b| b.as_jigsaw()).unwrap();
            board
                .stacking()
                .iter()
                .rev()
                .copied()
                .find(|&id| !board.piece(id).unwrap().placed)
                .map(|id| {
                    (
                        board.piece(id).unwrap().position.offset(1.0, 1.0),
                        board.geometry().home_of(id).offset(1.0, 1.0),
                    )
                })
        };
        let Some((grab, home)) = next else {
            break;
        };
        assert!(session.pointer(PointerPhase::Down, grab));
        assert!(session.pointer(PointerPhase::Up, home));
    }
}

fn session_with(config: &StoreConfig, seed: u64) -> GameSession {
    let mut s = GameSession::new(
        SessionConfig::new(GameType::Jigsaw, 2).with_seed(seed),
        Size::new(2000.0, 1000.0),
    )
    .unwrap()
    .with_best_times(config.open_cache());
    s.image_ready(Size::new(1.0, 1.0));
    s
}

#[test]
fn best_time_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path().join("best.json"));

    let mut first = session_with(&config, 1);
    assert_eq!(first.best_time(), None);
    first.start();
    first.tick(7000);
    solve_jigsaw(&mut first);
    assert_eq!(first.best_time(), Some(7));

    // A fresh process sees the record through the file.
    let mut second = session_with(&config, 2);
    assert_eq!(second.best_time(), Some(7));
    second.start();
    second.tick(3000);
    solve_jigsaw(&mut second);
    assert_eq!(second.best_time(), Some(3));

    let store = JsonFileStore::open(dir.path().join("best.json")).unwrap();
    assert_eq!(
        store.load(&BestTimeKey::new(GameType::Jigsaw, 2)).unwrap(),
        Some(3)
    );
    assert_eq!(store.load(&BestTimeKey::new(GameType::Slide, 2)).unwrap(), None);
}

#[test]
fn corrupt_store_never_blocks_play() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");
    fs::write(&path, "{\"bestTime_jigsaw_2\": ").unwrap();

    let mut s = session_with(&file_config(path.clone()), 5);
    assert_eq!(s.best_time(), None);
    s.start();
    s.tick(2000);
    solve_jigsaw(&mut s);
    assert!(s.board().unwrap().is_solved());
    assert_eq!(s.best_time(), None);

    // The broken file is left alone.
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"bestTime_jigsaw_2\": ");
}

#[test]
fn disabled_store_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");
    let config = StoreConfig {
        path: Some(path.clone()),
        disabled: true,
    };

    let mut s = session_with(&config, 9);
    s.start();
    s.tick(1000);
    solve_jigsaw(&mut s);
    assert_eq!(s.best_time(), None);
    assert!(!path.exists());
}

#[test]
fn records_are_kept_per_game_type_and_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.save(&BestTimeKey::new(GameType::Slide, 3), 40).unwrap();
    store.save(&BestTimeKey::new(GameType::Slide, 4), 90).unwrap();
    store.save(&BestTimeKey::new(GameType::Jigsaw, 3), 25).unwrap();

    let cache = file_config(path).open_cache();
    assert_eq!(cache.read(GameType::Slide, 3), Some(40));
    assert_eq!(cache.read(GameType::Slide, 4), Some(90));
    assert_eq!(cache.read(GameType::Jigsaw, 3), Some(25));
    assert_eq!(cache.read(GameType::Jigsaw, 4), None);
}
