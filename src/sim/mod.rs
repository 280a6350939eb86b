//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same sequence
//! of inputs and timesteps, a run always plays out the same way:
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entities)
//! - No platform dependencies; drawing goes through the `Canvas` seam

pub mod actor;
pub mod animation;
pub mod autopilot;
pub mod entity;
pub mod ground;
pub mod input;
pub mod obstacle;
pub mod overlay;
pub mod rect;
pub mod score;
pub mod sky;
pub mod state;
pub mod trex;

pub use actor::{Actor, ActorKind, Resident};
pub use animation::{AnimationFrame, SpriteAnimation};
pub use autopilot::Autopilot;
pub use entity::{EntityId, EntityManager, GameEntity, Scene};
pub use ground::{GroundManager, GroundTile};
pub use input::{FrameInput, InputController};
pub use obstacle::{GroupSize, Obstacle, ObstacleManager};
pub use overlay::GameOverOverlay;
pub use rect::Rect;
pub use score::ScoreBoard;
pub use sky::{CyclePhase, DayNightCycle, SkyManager, SkyObject, SkyObjectKind};
pub use state::{GameEvent, GamePhase, World};
pub use trex::{Trex, TrexSignal, TrexState};
