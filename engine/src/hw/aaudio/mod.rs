pub mod api;
pub mod capability;
pub mod chmap;
pub mod driver;
pub mod ffi;
pub mod format;
pub mod ioproc;
pub mod library;
pub mod negotiate;
pub mod sync;

pub use self::api::AAudioApi;
pub use self::driver::{HwDriver, StreamState};
pub use self::library::AAudioLibrary;
pub use crate::hw::options::AAudioOptions;
