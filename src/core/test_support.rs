use std::path::PathBuf;

use uuid::Uuid;

/// Fresh path under the system temp dir; not created.
pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("server-launcher-{label}-{}", Uuid::new_v4()))
}
