pub mod atomic;
pub mod package_file;

pub use atomic::AtomicFile;
pub use package_file::PackageFile;
