use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Line-oriented, append-only file access.
pub trait LineStorage {
    /// Appends `line` plus a newline to `file`, creating it if needed.
    /// The write is flushed before returning.
    fn append_line(&self, file: &str, line: &str) -> Result<()>;

    /// Returns every line of `file`, or `None` when the file does not exist.
    fn read_lines(&self, file: &str) -> Result<Option<Vec<String>>>;
}

/// What `load_data` does with a line whose fields fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedLinePolicy {
    #[default]
    SkipLine,
    AbortFile,
}

pub trait ConfigProvider {
    fn vehicle_file(&self) -> &str;
    fn customer_file(&self) -> &str;
    fn record_file(&self) -> &str;
    fn malformed_policy(&self) -> MalformedLinePolicy;
}
