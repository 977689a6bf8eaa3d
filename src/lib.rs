//! Fireworks that celebrate a perfect score.
//!
//! A host feeds score messages into an [`AnimationState`] and calls
//! [`AnimationState::tick`] once per frame while it reports that it is
//! looping. Each tick yields a [`Frame`] of coloured dots for a
//! presentation layer such as [`render::TerminalRenderer`].

pub mod color;
pub mod config;
pub mod emitter;
pub mod error;
pub mod frame;
pub mod particle;
pub mod presentation;
pub mod render;
pub mod scheduler;
pub mod score;
pub mod simulation;
pub mod state;
pub mod trigger;

pub use config::Config;
pub use error::{Error, Result};
pub use frame::{Background, Drawable, Frame};
pub use scheduler::LoopState;
pub use score::{ScoreEvent, ScoreState, parse_message};
pub use state::AnimationState;
pub use trigger::TriggerPolicy;
