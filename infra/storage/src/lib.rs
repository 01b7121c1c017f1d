//! Sandboxed file storage for uploaded media.
//!
//! Every path handed to [`Storage`] is resolved against a canonical root and
//! rejected if it would escape it. Writes go to a unique temporary file that is
//! synced and renamed into place, so readers never observe a partial upload.
//! Orphaned temporaries from a crash are purged when the storage connects.
//!
//! Uploads are grouped in [`Folder`]s (`vehicles`, `brands`, ...), one
//! directory per folder directly under the root.
//!
//! ```rust
//! use autoani_storage::{Storage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let storage = Storage::builder().root(tmp.path().join("uploads")).connect().await?;
//!
//!     let vehicles = storage.folder("vehicles")?;
//!     vehicles.write("x5-front.jpg", b"jpeg bytes").await?;
//!     assert_eq!(vehicles.read("x5-front.jpg").await?, b"jpeg bytes");
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod folder;
mod maintenance;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
pub use folder::{Folder, FolderName};
