//! Thread wrappers.

mod navigation_thread;

pub use navigation_thread::{
    CommandResult, NavCommand, NavResponse, NavigationHandle, NavigationThread,
};
