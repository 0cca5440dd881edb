//! Result artifacts.
//!
//! Each run of an algorithm produces two whitespace-delimited text files
//! inside `<base>/<algorithm>/<problem>/`:
//!
//! - `FUN.<run>.ps`: objective values, one solution per line
//! - `VAR.<run>.ps`: decision variables, same layout
//!
//! Reference fronts (`<problem>.pf`) share the row format and are read
//! with [`read_front`].

mod artifact;
mod writer;

pub use artifact::{owner_of, ArtifactKey, ArtifactKind};
pub use writer::{read_front, write_objectives, write_variables, ResultWriter};
