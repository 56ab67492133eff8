use std::collections::{HashSet, VecDeque};

use picture_puzzle::core::{count_inversions, is_solvable_arrangement, PuzzleRng, SlideBoard};
use picture_puzzle::types::Direction;

/// Every arrangement reachable from solved by legal moves.
fn reachable(n: u8) -> HashSet<Vec<u16>> {
    let start = SlideBoard::solved(n);
    let mut seen = HashSet::from([start.tiles().to_vec()]);
    let mut queue = VecDeque::from([start]);
    while let Some(board) = queue.pop_front() {
        for position in board.movable_positions() {
            let mut next = board.clone();
            assert!(next.try_move(position));
            if seen.insert(next.tiles().to_vec()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn permutations(items: &[u16]) -> Vec<Vec<u16>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn parity_rule_matches_reachability_on_2x2() {
    let reach = reachable(2);
    assert_eq!(reach.len(), 12);
    for perm in permutations(&[1, 2, 3, 4]) {
        assert_eq!(
            is_solvable_arrangement(&perm, 2),
            reach.contains(&perm),
            "parity disagrees for {perm:?}"
        );
    }
}

#[test]
fn parity_rule_matches_reachability_on_3x3_sample() {
    let reach = reachable(3);
    // Half of the 9! arrangements.
    assert_eq!(reach.len(), 181_440);

    let mut rng = PuzzleRng::seeded(5);
    let mut tiles: Vec<u16> = (1..=9).collect();
    for _ in 0..500 {
        rng.shuffle(&mut tiles);
        assert_eq!(is_solvable_arrangement(&tiles, 3), reach.contains(&tiles));
    }
}

#[test]
fn inversion_examples() {
    assert_eq!(count_inversions(&[1, 2, 3, 4], 4), 0);
    assert_eq!(count_inversions(&[2, 1, 3, 4], 4), 1);
    assert_eq!(count_inversions(&[4, 3, 2, 1], 4), 3);
    assert_eq!(count_inversions(&[8, 7, 6, 5, 4, 3, 2, 1, 9], 9), 28);
}

#[test]
fn shuffles_are_solvable_and_unsolved_for_every_size() {
    for n in 3..=10u8 {
        for seed in 0..25u64 {
            let mut rng = PuzzleRng::seeded(seed * 31 + n as u64);
            let mut board = SlideBoard::solved(n);
            let attempts = board.shuffle(&mut rng);
            assert!(attempts >= 1);
            assert!(board.is_solvable(), "n={n} seed={seed}");
            assert!(!board.is_solved(), "n={n} seed={seed}");

            let mut sorted = board.tiles().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (1..=(n as u16 * n as u16)).collect::<Vec<_>>());
        }
    }
}

#[test]
fn only_neighbours_of_the_blank_move() {
    let mut board = SlideBoard::solved(3);
    // Blank at 8: neighbours 5 and 7.
    let mut movable = board.movable_positions().to_vec();
    movable.sort_unstable();
    assert_eq!(movable, vec![5, 7]);

    assert!(!board.try_move(0));
    assert!(!board.try_move(4));
    assert!(!board.try_move(8));
    assert!(!board.try_move(42));
    assert_eq!(board, SlideBoard::solved(3));

    assert!(board.try_move(5));
    assert_eq!(board.blank_index(), 5);
    assert_eq!(board.tile_at(8), Some(6));
}

#[test]
fn wrapping_neighbours_are_not_adjacent() {
    // Blank at index 3 (row 1, col 0); index 2 is row 0, col 2.
    let board = SlideBoard::from_tiles(3, &[1, 2, 3, 9, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(board.blank_index(), 3);
    assert!(!board.is_adjacent_to_blank(2));
    assert!(board.is_adjacent_to_blank(0));
    assert!(board.is_adjacent_to_blank(4));
    assert!(board.is_adjacent_to_blank(6));
}

#[test]
fn directional_moves_round_trip() {
    let mut board = SlideBoard::solved(4);
    assert_eq!(board.try_move_direction(Direction::Up), None);
    assert_eq!(board.try_move_direction(Direction::Right), Some(14));
    assert_eq!(board.try_move_direction(Direction::Down), Some(10));
    assert_eq!(board.try_move_direction(Direction::Up), Some(14));
    assert_eq!(board.try_move_direction(Direction::Left), Some(15));
    assert!(board.is_solved());
}

#[test]
fn from_tiles_rejects_non_permutations() {
    assert!(SlideBoard::from_tiles(2, &[1, 2, 3]).is_none());
    assert!(SlideBoard::from_tiles(2, &[1, 1, 3, 4]).is_none());
    assert!(SlideBoard::from_tiles(2, &[0, 1, 2, 3]).is_none());
    assert!(SlideBoard::from_tiles(2, &[4, 1, 2, 3]).is_some());
}
