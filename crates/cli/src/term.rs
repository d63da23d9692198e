#![forbid(unsafe_code)]
//! Display width detection.

use std::{env, io, os::fd::AsFd};
use terminal_size::{Width, terminal_size_of};

/// Columns available for output.
///
/// `COLUMNS` wins when it holds a positive number, otherwise the window size
/// of the first terminal among stdout, stderr and stdin is used.
pub fn terminal_width() -> Option<usize> {
    env::var("COLUMNS")
        .ok()
        .and_then(|value| parse_columns(&value))
        .or_else(|| window_columns(io::stdout()))
        .or_else(|| window_columns(io::stderr()))
        .or_else(|| window_columns(io::stdin()))
}

fn parse_columns(value: &str) -> Option<usize> {
    value.trim().parse().ok().filter(|&cols| cols > 0)
}

fn window_columns(fd: impl AsFd) -> Option<usize> {
    let (Width(cols), _) = terminal_size_of(fd)?;
    (cols > 0).then_some(usize::from(cols))
}
