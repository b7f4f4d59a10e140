//! Trait definitions for Help Scout operations.
//!
//! Each entity type implements the traits it supports. The traits supply the
//! request logic; implementations only say where the resource lives and how
//! its query maps to parameters.

mod create;
mod get;
mod list;
mod resource;
mod update;

pub use create::Create;
pub use get::Get;
pub use list::List;
pub use resource::Resource;
pub use update::Update;
