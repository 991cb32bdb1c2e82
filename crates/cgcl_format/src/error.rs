use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, FormatError>;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] Box<bincode::ErrorKind>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The index buffer does not describe a whole number of triangles.
    #[error("Index buffer length {0} is not a multiple of three")]
    PartialTriangle(usize),
    /// A triangle refers to a vertex the buffer does not hold.
    #[error("Index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfBounds {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
}
