mod backup;
mod token;

pub use backup::LikedSnapshot;
pub use token::FileTokenStore;
pub use token::MemoryTokenStore;
pub use token::TokenStore;
