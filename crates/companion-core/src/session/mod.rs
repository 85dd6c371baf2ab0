//! Session domain module.
//!
//! This module contains the widget's view/navigation state and the pure
//! reducer that drives it.
//!
//! # Module Structure
//!
//! - `view`: panel and launcher icon kinds (`View`, `Icon`)
//! - `state`: `SessionState` and the chat-open flow (`ChatOpenFlow`)
//! - `event`: `SessionEvent` inputs, `SessionEffect` outputs, `Transition`
//! - `reducer`: `reduce(state, event, policy) -> Transition`
//!
//! # Usage
//!
//! ```ignore
//! use companion_core::session::{SessionEvent, SessionState, View, reduce};
//! use companion_core::chat::PrimaryCoursePolicy;
//!
//! let state = SessionState::new();
//! let event = SessionEvent::OpenPanel { view: View::Discovery };
//! let next = reduce(&state, event, PrimaryCoursePolicy::default())?;
//! ```

mod event;
mod reducer;
mod state;
mod view;


pub use event::{ChatChoice, SessionEffect, SessionEvent, Transition};
pub use reducer::reduce;
pub use state::{ChatOpenFlow, SessionState};
pub use view::{Icon, View};
