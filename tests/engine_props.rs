use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;
use sweeper::field::{cell::CellContent, mine_count_for, surrounding_positions};
use sweeper::{initialize_game, update_game_with_rng, Action, GameState, GameStatus};

fn started_game(size: u8, first: (u8, u8), seed: u64) -> GameState {
    let state = initialize_game(size).unwrap();
    update_game_with_rng(&state, Action::OpenCell(first), &mut StdRng::seed_from_u64(seed)).unwrap()
}

/// Board size and a position within it.
fn size_and_position() -> impl Strategy<Value = (u8, (u8, u8))> {
    (1u8..=24).prop_flat_map(|size| (Just(size), (0..size, 0..size)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn initialized_board_is_closed(size in 1u8..=40) {
        let state = initialize_game(size).unwrap();

        prop_assert_eq!(state.status(), GameStatus::Unstarted);
        prop_assert!(state.mine_positions().is_empty());
        prop_assert_eq!(state.board().get_size(), (size, size, size as u16 * size as u16));
        prop_assert_eq!(state.board().count(CellContent::Unopened), size as usize * size as usize);
    }

    #[test]
    fn first_open_is_always_safe((size, first) in size_and_position(), seed in any::<u64>()) {
        let state = started_game(size, first, seed);

        prop_assert_ne!(state.status(), GameStatus::Lose);
        prop_assert!(!state.mine_positions().contains(&first));
        prop_assert!(matches!(state.board()[first], CellContent::Revealed(_)));
    }

    #[test]
    fn placed_mines_are_distinct_and_in_bounds((size, first) in size_and_position(), seed in any::<u64>()) {
        let state = started_game(size, first, seed);
        let mines = state.mine_positions();
        let distinct: HashSet<_> = mines.iter().collect();

        prop_assert_eq!(mines.len(), mine_count_for((size, size)) as usize);
        prop_assert_eq!(distinct.len(), mines.len());
        prop_assert!(mines.iter().all(|&(row, column)| row < size && column < size));
    }

    #[test]
    fn revealed_numbers_match_the_mines((size, first) in size_and_position(), seed in any::<u64>()) {
        let state = started_game(size, first, seed);
        let mines: HashSet<_> = state.mine_positions().iter().copied().collect();

        for (position, cell) in state.board().iter() {
            if let CellContent::Revealed(amount) = cell {
                let expected = surrounding_positions((size, size), position)
                    .into_iter()
                    .filter(|pos| mines.contains(pos))
                    .count();
                prop_assert_eq!(amount as usize, expected);
                prop_assert!(!mines.contains(&position));
            }
        }
    }

    #[test]
    fn flagging_twice_restores_the_board(
        (size, first) in size_and_position(),
        seed in any::<u64>(),
        target in (0u8..24, 0u8..24),
    ) {
        let state = started_game(size, first, seed);
        prop_assume!(state.status() == GameStatus::Ongoing);
        let target = (target.0 % size, target.1 % size);
        let mut rng = StdRng::seed_from_u64(seed);

        let once = update_game_with_rng(&state, Action::PlaceFlag(target), &mut rng).unwrap();
        // flagging the last mine may finish the game, after which flags are frozen
        prop_assume!(once.status() == GameStatus::Ongoing);
        let twice = update_game_with_rng(&once, Action::PlaceFlag(target), &mut rng).unwrap();

        prop_assert_eq!(twice.board(), state.board());
    }

    #[test]
    fn surrounding_positions_are_unique_neighbours((size, position) in size_and_position()) {
        let neighbours = surrounding_positions((size, size), position);
        let distinct: HashSet<_> = neighbours.iter().collect();

        prop_assert!(neighbours.len() <= 8);
        prop_assert_eq!(distinct.len(), neighbours.len());
        prop_assert!(!neighbours.contains(&position));
        let adjacent = neighbours.iter().all(|&(row, column)| {
            row < size && column < size && row.abs_diff(position.0) <= 1 && column.abs_diff(position.1) <= 1
        });
        prop_assert!(adjacent, "{:?} has a non-adjacent neighbour in {:?}", position, neighbours);
    }
}

#[test]
fn playing_every_safe_cell_and_flagging_every_mine_wins() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut state = started_game(9, (4, 4), 2024);
    let mines = state.mine_positions().to_vec();

    for &mine in &mines {
        state = update_game_with_rng(&state, Action::PlaceFlag(mine), &mut rng).unwrap();
    }

    let safe: Vec<_> = state
        .board()
        .iter()
        .map(|(position, _)| position)
        .filter(|position| !mines.contains(position))
        .collect();

    for position in safe {
        if state.board()[position].is_unopened() {
            state = update_game_with_rng(&state, Action::OpenCell(position), &mut rng).unwrap();
        }
    }

    assert_eq!(state.status(), GameStatus::Win);
    assert_eq!(state.flag_count(), mines.len());
}
