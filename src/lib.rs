//! Skill leaderboard pipeline for a recurring game group.
//!
//! One invocation turns a static CSV match log into a full ranking file and
//! an attendance-gated top-10 leaderboard, rating players with a Bayesian
//! skill model (the `skillratings` TrueSkill implementation, consumed as an
//! opaque oracle behind `rating_engine`).

pub mod attendance;
pub mod match_log;
pub mod pipeline;
pub mod profile;
pub mod ranking;
pub mod rating_engine;
pub mod report;
