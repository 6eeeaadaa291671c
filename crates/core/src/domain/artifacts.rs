// Per-node file layout under data_dir
//
//   <data_dir>/<server_name>.pid
//   <data_dir>/stdout.txt
//   <data_dir>/stderr.<launch_time>.txt
//   <data_dir>/stderr.txt -> stderr.<launch_time>.txt
//   <data_dir>/start.cmd

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const STDOUT_FILE: &str = "stdout.txt";
pub const STDERR_LINK: &str = "stderr.txt";
pub const START_CMD_FILE: &str = "start.cmd";

/// Paths of every file the supervisor owns for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArtifacts {
    data_dir: PathBuf,
    server_name: String,
}

impl NodeArtifacts {
    pub fn new(data_dir: impl Into<PathBuf>, server_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            server_name: server_name.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn pid_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.pid", self.server_name))
    }

    pub fn stdout_file(&self) -> PathBuf {
        self.data_dir.join(STDOUT_FILE)
    }

    pub fn stderr_link(&self) -> PathBuf {
        self.data_dir.join(STDERR_LINK)
    }

    pub fn start_cmd(&self) -> PathBuf {
        self.data_dir.join(START_CMD_FILE)
    }

    /// File name (not path) of the stderr file for one launch
    ///
    /// `attempt` > 0 disambiguates launches that share a timestamp.
    pub fn stderr_file_name(launch_stamp: &str, attempt: u32) -> String {
        if attempt == 0 {
            format!("stderr.{launch_stamp}.txt")
        } else {
            format!("stderr.{launch_stamp}_{attempt}.txt")
        }
    }

    pub fn stderr_file(&self, launch_stamp: &str, attempt: u32) -> PathBuf {
        self.data_dir.join(Self::stderr_file_name(launch_stamp, attempt))
    }
}

/// Local-time stamp used in stderr file names, millisecond resolution
pub fn launch_stamp(now_millis: i64) -> String {
    let utc = DateTime::from_timestamp_millis(now_millis).unwrap_or_default();
    utc.with_timezone(&Local)
        .format("%Y_%m_%d_%H_%M_%S_%3f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let artifacts = NodeArtifacts::new("/data/node_00", "nodeos");

        assert_eq!(artifacts.pid_file(), PathBuf::from("/data/node_00/nodeos.pid"));
        assert_eq!(artifacts.stdout_file(), PathBuf::from("/data/node_00/stdout.txt"));
        assert_eq!(artifacts.stderr_link(), PathBuf::from("/data/node_00/stderr.txt"));
        assert_eq!(artifacts.start_cmd(), PathBuf::from("/data/node_00/start.cmd"));
        assert_eq!(
            artifacts.stderr_file("2024_01_02_03_04_05_006", 0),
            PathBuf::from("/data/node_00/stderr.2024_01_02_03_04_05_006.txt")
        );
        assert_eq!(NodeArtifacts::stderr_file_name("stamp", 2), "stderr.stamp_2.txt");
    }

    #[test]
    fn test_launch_stamp_shape() {
        let stamp = launch_stamp(1_700_000_000_123);

        // YYYY_MM_DD_HH_MM_SS_mmm
        assert_eq!(stamp.len(), 23);
        assert!(stamp.ends_with("_123"));
        assert_eq!(stamp.matches('_').count(), 6);
    }
}
