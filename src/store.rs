use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{RejectionRecord, ReplyRecord};

const LAST_ID_FILE: &str = "last_seen_id.txt";
const BLOCKED_FILE: &str = "blocked_users.txt";
const REPLIES_LOG: &str = "replies_log.csv";
const REJECTED_LOG: &str = "rejected_log.csv";

/// Persistent state the pipeline reads and writes between runs: the
/// last-seen mention watermark, the blocked-user set, and the audit logs.
pub trait StateStore {
    fn last_seen_id(&self) -> Option<String>;
    fn set_last_seen_id(&mut self, id: &str) -> Result<()>;
    fn is_blocked(&self, user: &str) -> bool;
    fn block_user(&mut self, user: &str) -> Result<()>;
    fn log_reply(&mut self, record: &ReplyRecord) -> Result<()>;
    fn log_rejection(&mut self, record: &RejectionRecord) -> Result<()>;
}

/// Flat-file store rooted at a data directory. The watermark file is
/// overwritten whole; the blocked-user file and the CSV logs are append-only.
pub struct FileStore {
    dir: PathBuf,
    last_seen_id: Option<String>,
    blocked: HashSet<String>,
}

impl FileStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create data dir {:?}", dir))?;

        let last_id_path = dir.join(LAST_ID_FILE);
        let last_seen_id = if last_id_path.exists() {
            let raw = fs::read_to_string(&last_id_path)
                .with_context(|| format!("failed to read {:?}", last_id_path))?;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        } else {
            None
        };

        let blocked_path = dir.join(BLOCKED_FILE);
        let blocked = if blocked_path.exists() {
            fs::read_to_string(&blocked_path)
                .with_context(|| format!("failed to read {:?}", blocked_path))?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };

        Ok(FileStore {
            dir: dir.to_path_buf(),
            last_seen_id,
            blocked,
        })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    // Writes the header row only when the file is created.
    fn append_csv<T: Serialize>(&self, name: &str, record: &T) -> Result<()> {
        let path = self.path(name);
        let write_header = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log {:?}", path))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn last_seen_id(&self) -> Option<String> {
        self.last_seen_id.clone()
    }

    fn set_last_seen_id(&mut self, id: &str) -> Result<()> {
        fs::write(self.path(LAST_ID_FILE), id)
            .context("failed to save last seen id")?;
        self.last_seen_id = Some(id.to_string());
        Ok(())
    }

    fn is_blocked(&self, user: &str) -> bool {
        self.blocked.contains(user)
    }

    fn block_user(&mut self, user: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(BLOCKED_FILE))
            .context("failed to open blocked users file")?;
        writeln!(file, "{}", user)?;
        self.blocked.insert(user.to_string());
        Ok(())
    }

    fn log_reply(&mut self, record: &ReplyRecord) -> Result<()> {
        self.append_csv(REPLIES_LOG, record)
    }

    fn log_rejection(&mut self, record: &RejectionRecord) -> Result<()> {
        self.append_csv(REJECTED_LOG, record)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory stand-in for `FileStore`, used by the pipeline tests.
    #[derive(Default)]
    pub struct MemStore {
        pub last_seen_id: Option<String>,
        pub blocked: HashSet<String>,
        pub replies: Vec<ReplyRecord>,
        pub rejections: Vec<RejectionRecord>,
    }

    impl StateStore for MemStore {
        fn last_seen_id(&self) -> Option<String> {
            self.last_seen_id.clone()
        }

        fn set_last_seen_id(&mut self, id: &str) -> Result<()> {
            self.last_seen_id = Some(id.to_string());
            Ok(())
        }

        fn is_blocked(&self, user: &str) -> bool {
            self.blocked.contains(user)
        }

        fn block_user(&mut self, user: &str) -> Result<()> {
            self.blocked.insert(user.to_string());
            Ok(())
        }

        fn log_reply(&mut self, record: &ReplyRecord) -> Result<()> {
            self.replies.push(record.clone());
            Ok(())
        }

        fn log_rejection(&mut self, record: &RejectionRecord) -> Result<()> {
            self.rejections.push(record.clone());
            Ok(())
        }
    }
}
