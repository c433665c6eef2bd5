use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::{DefaultOnNull, serde_as};
use thiserror::Error;

/// Build describes all aspects of a kernel build.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    #[serde(rename = "Manager")]
    #[serde_as(as = "DefaultOnNull")]
    pub manager: String,
    #[serde(rename = "ID")]
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde(rename = "SyzkallerCommit")]
    #[serde_as(as = "DefaultOnNull")]
    pub syzkaller_commit: String,
    #[serde(rename = "CompilerID")]
    #[serde_as(as = "DefaultOnNull")]
    pub compiler_id: String,
    #[serde(rename = "KernelRepo")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_repo: String,
    #[serde(rename = "KernelBranch")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_branch: String,
    #[serde(rename = "KernelCommit")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_commit: String,
    #[serde(rename = "KernelConfig")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub kernel_config: Vec<u8>,
}

/// Crash describes a single kernel crash, potentially with a repro.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crash {
    /// Refers to [`Build::id`].
    #[serde(rename = "BuildID")]
    #[serde_as(as = "DefaultOnNull")]
    pub build_id: String,
    #[serde(rename = "Title")]
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde(rename = "Maintainers")]
    #[serde_as(as = "DefaultOnNull")]
    pub maintainers: Vec<String>,
    #[serde(rename = "Log")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub log: Vec<u8>,
    #[serde(rename = "Report")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub report: Vec<u8>,

    // filled only after a successful repro
    #[serde(rename = "ReproOpts")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub repro_opts: Vec<u8>,
    #[serde(rename = "ReproSyz")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub repro_syz: Vec<u8>,
    #[serde(rename = "ReproC")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub repro_c: Vec<u8>,
}

/// A failed repro attempt.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailedRepro {
    #[serde(rename = "Manager")]
    #[serde_as(as = "DefaultOnNull")]
    pub manager: String,
    #[serde(rename = "BuildID")]
    #[serde_as(as = "DefaultOnNull")]
    pub build_id: String,
    #[serde(rename = "Title")]
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    #[serde(rename = "Name")]
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde(rename = "Text")]
    #[serde_as(as = "DefaultOnNull")]
    pub text: String,
}

/// BugReport describes a single bug, as handed out to external reporting.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugReport {
    #[serde(rename = "Config")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub config: Vec<u8>,
    #[serde(rename = "ID")]
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde(rename = "Title")]
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde(rename = "Maintainers")]
    #[serde_as(as = "DefaultOnNull")]
    pub maintainers: Vec<String>,
    #[serde(rename = "CompilerID")]
    #[serde_as(as = "DefaultOnNull")]
    pub compiler_id: String,
    #[serde(rename = "KernelRepo")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_repo: String,
    #[serde(rename = "KernelBranch")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_branch: String,
    #[serde(rename = "KernelCommit")]
    #[serde_as(as = "DefaultOnNull")]
    pub kernel_commit: String,
    #[serde(rename = "Log")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub log: Vec<u8>,
    #[serde(rename = "Report")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub report: Vec<u8>,
    #[serde(rename = "KernelConfig")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub kernel_config: Vec<u8>,
    #[serde(rename = "ReproC")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub repro_c: Vec<u8>,
    #[serde(rename = "ReproSyz")]
    #[serde_as(as = "DefaultOnNull<Base64>")]
    pub repro_syz: Vec<u8>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugUpdate {
    #[serde(rename = "ID")]
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde(rename = "Status")]
    #[serde_as(as = "DefaultOnNull")]
    pub status: BugStatus,
    #[serde(rename = "ReproLevel")]
    #[serde_as(as = "DefaultOnNull")]
    pub repro_level: ReproLevel,
    /// ID of the bug this one duplicates, only meaningful with [`BugStatus::Dup`].
    #[serde(rename = "DupOf")]
    #[serde_as(as = "DefaultOnNull")]
    pub dup_of: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollRequest {
    #[serde(rename = "Type")]
    #[serde_as(as = "DefaultOnNull")]
    pub kind: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollResponse {
    #[serde(rename = "Reports")]
    #[serde_as(as = "DefaultOnNull")]
    pub reports: Vec<BugReport>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownOrdinal {
    pub kind: &'static str,
    pub value: u8,
}

// encoded on the wire as its ordinal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BugStatus {
    #[default]
    Open = 0,
    Upstream = 1,
    Invalid = 2,
    Dup = 3,
}

impl From<BugStatus> for u8 {
    fn from(status: BugStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for BugStatus {
    type Error = UnknownOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BugStatus::Open),
            1 => Ok(BugStatus::Upstream),
            2 => Ok(BugStatus::Invalid),
            3 => Ok(BugStatus::Dup),
            _ => Err(UnknownOrdinal {
                kind: "BugStatus",
                value,
            }),
        }
    }
}

/// Strength of the available reproducer. Ordered: `None < Syz < C`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReproLevel {
    #[default]
    None = 0,
    Syz = 1,
    C = 2,
}

impl From<ReproLevel> for u8 {
    fn from(level: ReproLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for ReproLevel {
    type Error = UnknownOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReproLevel::None),
            1 => Ok(ReproLevel::Syz),
            2 => Ok(ReproLevel::C),
            _ => Err(UnknownOrdinal {
                kind: "ReproLevel",
                value,
            }),
        }
    }
}
