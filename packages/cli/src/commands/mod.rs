pub mod check;
pub mod init;
pub mod place;
pub mod reflow;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use place::{place, PlaceArgs};
pub use reflow::{reflow, ReflowArgs};
