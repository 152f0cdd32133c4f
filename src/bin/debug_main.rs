use clap::Parser;
use color_eyre::Result;
use std::io::BufRead;
use sweeper::{initialize_game, update_game, Action, GameState};

#[derive(Parser, Debug)]
#[command(about = "Plays the game line by line on the standard input")]
struct Args {
    #[arg(short, long, default_value_t = 9, value_parser = clap::value_parser!(u8).range(1..))]
    size: u8,
}

/// A parsed input line.
#[derive(Debug, PartialEq)]
enum Command {
    Act(Action),
    NewGame,
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    let mut words = input.split_whitespace();
    let command = words.next()?;

    match command {
        "n" => return Some(Command::NewGame),
        "q" => return Some(Command::Quit),
        _ => {}
    }

    // every fragment has to be a coordinate and there have to be exactly two of them
    let coordinates = words
        .next()?
        .split(',')
        .map(|s| s.trim().parse().ok())
        .collect::<Option<Vec<u8>>>()?;

    let cell_position = match coordinates[..] {
        [row, column] => (row, column),
        _ => return None,
    };

    match command {
        "o" => Some(Command::Act(Action::OpenCell(cell_position))),
        "f" => Some(Command::Act(Action::PlaceFlag(cell_position))),
        _ => None,
    }
}

fn print_state(state: &GameState) {
    println!("{}", state.board());
    println!("{} (flags: {}, mines: {})", state.status().message(), state.flag_count(), state.mine_count());
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut state = initialize_game(args.size)?;
    print_state(&state);
    println!("Enter an action and the target cell's coordinates (e.g. `f 3,5` to flag the 6th cell on the 4th line), `n` for a new game or `q` to quit:");

    for line in std::io::stdin().lock().lines() {
        match parse_command(&line?) {
            Some(Command::Act(action)) => match update_game(&state, action) {
                Ok(next) => state = next,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
            Some(Command::NewGame) => state = initialize_game(args.size)?,
            Some(Command::Quit) => break,
            None => {
                println!("Incorrect input! Please, try again.");
                continue;
            }
        }

        print_state(&state);
    }

    Ok(())
}
