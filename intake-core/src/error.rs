use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Download error: {0}")]
    Download(String),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
