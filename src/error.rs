use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid connection index")]
    InvalidConnectionIndex,
    #[error("Invalid network data: {0}")]
    InvalidData(String),
}
