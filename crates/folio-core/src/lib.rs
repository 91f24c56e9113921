pub mod animation;
pub mod book;
pub mod config;
pub mod geometry;
pub mod pages;
pub mod renderer;
pub mod turn;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{SettleAnimation, SettleStatus, DEFAULT_SETTLE_DURATION};
pub use book::{Book, BookModel, LeafSize, TurnOutcome};
pub use config::{BookConfig, LeafConfig, StyleConfig};
pub use geometry::{ClipPose, FoldLine, Vec2};
pub use pages::{clamp_index, PageLayout, PageTracker};
pub use renderer::{page_tint, PageRenderer, PageUniforms};
pub use turn::{BookHost, Direction, TurnController, TurnError, TurnPhase};
