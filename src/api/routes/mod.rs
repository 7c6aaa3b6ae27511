pub mod players;
pub mod rankings;
pub mod tournaments;
