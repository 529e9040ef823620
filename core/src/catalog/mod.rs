pub mod entry;
pub mod index;
pub mod lookup;

pub use entry::CatalogEntry;
pub use index::ImageCatalog;

/// Errors raised while building the spectrogram catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("image directory {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("no spectrogram images in {0}")]
    Empty(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
