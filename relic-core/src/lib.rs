#[macro_use]
mod error;
pub use error::{AnyError, AnyResult};

pub mod cache;
pub mod context;
pub mod http;
pub mod path;
pub mod trie;

pub use context::{Context, ConnectContext, NewContext, ResponseContext};
pub use path::NormalizedPath;
pub use trie::{LookupResult, PathTrie, Transform, TrieError};
