//! Content-addressed asset paths.
//!
//! ```text
//! "public/js/main.js" ──normalize──▶ "js/main.js"
//!                          │
//!                  blake3(bytes) ──▶ token "3f9a0c2e71b4d5e8"
//!                          │
//!                          ▼
//!          "/public/js/3f9a0c2e71b4d5e8-main.js"
//! ```
//!
//! Only the bytes feed the token; the directory is kept in the serving
//! path, so identical files in different folders share a token but never
//! a URL.

mod hash;
mod index;
mod path;

pub use hash::{TOKEN_LEN, Token, hash};
pub use index::{Entry, FingerprintIndex};
pub use path::{normalize, normalize_prefix, parse_fingerprinted, serving_path};
