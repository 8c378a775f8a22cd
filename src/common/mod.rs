//! Filesystem primitives shared by the pipeline stages.

pub mod copy;
pub mod files;
pub mod paths;
pub mod symlink;
pub mod temp;

pub use copy::{copy_dir_contents, copy_file};
pub use files::write_lines;
pub use paths::{ensure_dir_exists, ensure_parent_exists, relative_unix_path};
pub use symlink::symlink_file;
pub use temp::make_clean_dir;
