//! Installer classification.
//!
//! Derives the runtime generation and target architecture of an installer
//! from its file name alone. Matching is plain substring search on the
//! lower-cased name: version tokens are tried in release order and the
//! first one found wins, so a name mentioning both `2015` and `2017`
//! classifies as `2015`.

use std::fmt;

/// Runtime generation of an installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionTag {
    V2005,
    V2008,
    V2010,
    V2012,
    V2013,
    V2015,
    V2017,
    V2019,
    V2022,
}

impl VersionTag {
    /// All tags in match order.
    pub const ALL: [VersionTag; 9] = [
        VersionTag::V2005,
        VersionTag::V2008,
        VersionTag::V2010,
        VersionTag::V2012,
        VersionTag::V2013,
        VersionTag::V2015,
        VersionTag::V2017,
        VersionTag::V2019,
        VersionTag::V2022,
    ];

    /// The token searched for in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionTag::V2005 => "2005",
            VersionTag::V2008 => "2008",
            VersionTag::V2010 => "2010",
            VersionTag::V2012 => "2012",
            VersionTag::V2013 => "2013",
            VersionTag::V2015 => "2015",
            VersionTag::V2017 => "2017",
            VersionTag::V2019 => "2019",
            VersionTag::V2022 => "2022",
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target architecture of an installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version and architecture derived from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `None` when no known token occurs in the name.
    pub version: Option<VersionTag>,
    pub arch: Architecture,
}

/// Classify an installer by its file name.
pub fn classify(file_name: &str) -> Classification {
    let lower = file_name.to_lowercase();

    let version = VersionTag::ALL
        .into_iter()
        .find(|tag| lower.contains(tag.as_str()));

    let arch = if lower.contains("x64") {
        Architecture::X64
    } else {
        Architecture::X86
    };

    Classification { version, arch }
}
