//! I/O utilities for exporting timelines and daily logs.

pub mod export;
