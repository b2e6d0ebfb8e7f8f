pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board")]
pub struct PieceCollisionError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum MoveError {
    #[display("piece colliding when moving")]
    Collision(PieceCollisionError),
    #[display("piece locked after a blocked descent ({cleared_lines} lines cleared)")]
    Locked { cleared_lines: usize },
    #[display("no active piece")]
    NoActivePiece,
    #[display("game is over")]
    GameOver,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum RotateError {
    #[display("piece colliding when rotating")]
    Collision(PieceCollisionError),
    #[display("no active piece")]
    NoActivePiece,
    #[display("game is over")]
    GameOver,
}
