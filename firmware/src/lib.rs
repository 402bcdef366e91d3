#![no_std]

pub mod board;
pub mod ipc;
pub mod tasks;

pub use board::Board;
