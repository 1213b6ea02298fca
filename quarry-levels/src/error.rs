/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Error types

use thiserror::Error;

/// An error encountered while parsing map text.
/// All of these are fatal: the file is rejected rather than partially loaded.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Block opened on line {line} is never closed")]
    UnbalancedBraces { line: usize },

    #[error("Quote opened on line {line} is never closed")]
    UnterminatedQuote { line: usize },

    #[error("Unexpected `{found}` on line {line}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: &'static str,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Invalid number `{value}` on line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("Key `{key}` on line {line} has no value")]
    DanglingKey { line: usize, key: String },

    #[error("Couldn't read map file")]
    Io(#[from] std::io::Error),
}

/// Standard result type.
pub type Result<T> = std::result::Result<T, ParseError>;

/// An error encountered while collapsing instances.
#[derive(Error, Debug)]
pub enum CollapseError {
    #[error("Instance cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("Instance map `{file}` not found")]
    MissingMap { file: String },

    #[error("Couldn't parse instance map `{file}`")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error("Couldn't read instance map `{file}`")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}
