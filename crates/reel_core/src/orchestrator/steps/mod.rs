//! Pipeline step implementations.
//!
//! Each step handles one phase of building a story.

mod assemble;
mod photos;
mod prepare;
mod timeline;
mod videos;

pub use assemble::AssembleStep;
pub use photos::PhotosStep;
pub use prepare::PrepareStep;
pub use timeline::TimelineStep;
pub use videos::VideosStep;
