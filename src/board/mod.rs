mod debounce;
mod generator;
mod grid;
mod pulse;
mod scene;
mod trace;

pub use debounce::ResizeDebounce;
pub use scene::{Board, BoardConfig};
pub use trace::Trace;
#[cfg(test)]
pub use trace::GridPos;
