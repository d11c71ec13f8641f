//! Locomotion and collision core for the heritage-site walkthrough.
//!
//! Rendering and input live outside this crate: callers hand in a movement
//! intent and a look delta, and get back where the camera should be.

pub mod error;
pub mod floors;
pub mod geometry;
pub mod ground;
pub mod movement;
pub mod obstacles;
pub mod physics;
pub mod player;
pub mod ramp;
pub mod scene;
pub mod session;
pub mod site;
pub mod terrain;
pub mod timestep;

pub use error::SceneError;
pub use geometry::{Aabb, Footprint, GeometryError};
pub use player::{ControllerConfig, MoveInput, PlayerPose};
pub use session::Locomotion;
