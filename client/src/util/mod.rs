//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, clock,
//! document attributes) from the stores so those stay testable natively.

pub mod clock;
pub mod observer;
pub mod storage;
pub mod theme;
