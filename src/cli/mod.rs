/// Command-line front end
///
/// The tracker's CLI is an interactive menu rather than a set of flags.

pub mod menu;

pub use menu::{Menu, MenuChoice};
