mod config;
mod error;
mod food;
mod game;
mod snake;
mod store;
mod term;

use std::io::{self, BufRead, Write};
use std::process::exit;

use config::{GameConfig, StoreConfig};
use game::{Outcome, SaveStatus, SnakeGame};
use store::{PgStore, Progress, ProgressStore};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut store = match PgStore::connect(&StoreConfig::default()) {
        Ok(store) => store,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    if let Err(e) = store.ensure_schema() {
        println!("Could not create tables: {}", e);
    }

    let username = match prompt_username() {
        Ok(name) => name,
        Err(e) => {
            println!("Could not read username: {}", e);
            return;
        }
    };

    // Store failures past this point cost the session its save, not the game.
    let user = match store.get_or_create_user(&username) {
        Ok(id) => Some(id),
        Err(e) => {
            println!("Could not look up user {:?}: {}", username, e);
            None
        }
    };

    let progress = match user.map(|id| store.latest_progress(id)) {
        Some(Ok(progress)) => progress,
        Some(Err(e)) => {
            println!("Could not load progress: {}", e);
            Progress::default()
        }
        None => Progress::default(),
    };

    let res = SnakeGame::new(GameConfig::default(), &mut store, user, username, progress)
        .and_then(|game| game.run());

    match res {
        Ok(over) => {
            let how = match over.outcome {
                Outcome::Quit => "Quit",
                Outcome::Collided => "Game over",
            };
            println!("{}. Score: {} Level: {}", how, over.progress.score, over.progress.level);

            if let SaveStatus::Failed(e) = over.saved {
                log::error!("saving progress failed: {}", e);
                println!("Could not save progress: {}", e);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}

fn prompt_username() -> io::Result<String> {
    print!("Enter username: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
