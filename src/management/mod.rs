mod artwork;
mod catalog;
mod token;

pub use artwork::ArtworkDirectory;
pub use artwork::IMAGE_EXTENSIONS;
pub use catalog::Catalog;
pub use token::TokenStore;
pub use token::TokenStoreError;
