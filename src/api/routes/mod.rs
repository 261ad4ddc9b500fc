pub mod health;
pub mod leaderboard;
pub mod matches;
pub mod proxy;
pub mod stats;
