//! Generic Reactive Cell Library
//!
//! A small, dependency-free primitive for holding a current value and
//! notifying subscribers when it is replaced.
//!
//! # Features
//!
//! - **Single current value**: No history, no buffering - a cell holds
//!   exactly one value at a time
//! - **Ordered notification**: Subscribers run synchronously, in
//!   registration order, on every `set`
//! - **Shared handles**: Cloning a `Cell` clones a handle to the same
//!   underlying value, so producers and consumers can live on different
//!   tasks or threads
//! - **Re-entrancy safe**: A subscriber may read the cell, subscribe, or
//!   unsubscribe from inside its own callback
//!
//! # Quick Start
//!
//! ```rust
//! use cell_store::Cell;
//!
//! let cell = Cell::new(0u32);
//!
//! // Subscribe to changes
//! let id = cell.subscribe(|v| println!("now {v}"));
//!
//! // Replace the value (notifies the subscriber synchronously)
//! cell.set(42);
//! assert_eq!(cell.get(), 42);
//!
//! // Stop listening
//! cell.unsubscribe(id);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Cell<T> (cheap clone)
//!     │
//!     └── Inner<T>
//!             ├── value: Mutex<T>
//!             └── subscribers: Mutex<Vec<(SubscriptionId, Arc<dyn Fn(&T)>)>>
//! ```

mod cell;

pub use cell::{Cell, SubscriptionId};
