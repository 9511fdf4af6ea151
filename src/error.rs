use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not connect to the database: {0}")]
    Connect(#[source] postgres::Error),
    #[error("database query failed: {0}")]
    Query(#[from] postgres::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("terminal is {width}x{height}, the board needs at least {need_width}x{need_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        need_width: u16,
        need_height: u16,
    },
}
