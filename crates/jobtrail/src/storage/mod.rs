pub mod artifacts;

pub use artifacts::{ArtifactWriter, JsonArtifactWriter, WrittenArtifacts};
