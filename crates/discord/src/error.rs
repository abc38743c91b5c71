#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Serenity(#[from] serenity::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
