pub mod gitignore;
pub mod paths;

/// Current local time in the format used for initialization lines and lineage notes.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
