//! Pointer input: event types, gesture recognition, and the per-device
//! handlers that turn gestures into selection changes.

mod callbacks;
mod events;
mod mouse;
mod recognizer;
mod router;
mod touch;

pub use callbacks::{InputCallbacks, NoopCallbacks, SignalCallbacks};
pub use events::{KeyboardModifiers, PointerAction, PointerButtons, PointerEvent, ToolType};
pub use mouse::MouseInputHandler;
pub use recognizer::{GestureRecognizer, GestureState, RecognizedGesture};
pub use router::InputEventRouter;
pub use touch::TouchInputHandler;
