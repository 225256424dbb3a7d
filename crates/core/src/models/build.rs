use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::BuildParseError;

/// Pattern every build artifact name must contain. The first match anywhere in
/// the name is used, so leading text before the version is tolerated.
static BUILD_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9.]+)-([0-9A-Za-z_]+)-(\d{8})-(\d{4})\.jar")
        .expect("invalid build filename regex")
});

const SIZE_UNITS: &str = "BKMGTP";

/// Download URLs generated for a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLinks {
    /// Absolute URL of the raw artifact.
    pub direct: String,
    /// Absolute URL of the counting redirect.
    pub grab: String,
}

/// Accessors shared by parsed builds and the synthesised latest entry.
pub trait Build {
    /// Name of the owning application.
    fn application(&self) -> &str;
    /// Exact artifact file name.
    fn file_name(&self) -> &str;
    /// Size in bytes.
    fn byte_size(&self) -> u64;
    /// Direct download URL.
    fn direct_link(&self) -> &str;
    /// Counting redirect URL.
    fn grab_link(&self) -> &str;
    /// Number of recorded grabs.
    fn download_counter(&self) -> u64;

    /// Size formatted by [`human_size`].
    fn human_size(&self) -> String {
        human_size(self.byte_size())
    }

    /// Whether this entry is the synthesised latest alias.
    fn is_latest(&self) -> bool {
        false
    }
}

/// A build artifact whose metadata was parsed from its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRecord {
    application: String,
    file_name: String,
    size: u64,
    links: BuildLinks,
    version: String,
    build_hash: String,
    build_date: DateTime<Utc>,
    download_counter: u64,
}

impl BuildRecord {
    /// Parse `file_name` and assemble a record.
    ///
    /// Fails without producing a partial record when the name does not
    /// contain the build pattern or its date is not a real instant.
    pub fn parse(
        application: impl Into<String>,
        file_name: impl Into<String>,
        size: u64,
        links: BuildLinks,
        download_counter: u64,
    ) -> Result<Self, BuildParseError> {
        let file_name = file_name.into();
        let (version, build_hash, build_date) = parse_file_name(&file_name)?;

        Ok(Self {
            application: application.into(),
            file_name,
            size,
            links,
            version,
            build_hash,
            build_date,
            download_counter,
        })
    }

    /// Fails unless `file_name` would parse as a build.
    pub fn check_file_name(file_name: &str) -> Result<(), BuildParseError> {
        parse_file_name(file_name).map(|_| ())
    }

    /// Target version embedded in the file name.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build identifier embedded in the file name.
    pub fn build_hash(&self) -> &str {
        &self.build_hash
    }

    /// Build timestamp (UTC, minute precision).
    pub fn build_date(&self) -> DateTime<Utc> {
        self.build_date
    }

    /// Build date as `Month DD, YYYY`.
    pub fn human_date(&self) -> String {
        self.build_date.format("%B %d, %Y").to_string()
    }

    /// Build date as seconds since the Unix epoch.
    pub fn epoch_date(&self) -> i64 {
        self.build_date.timestamp()
    }

    /// Both download URLs.
    pub fn links(&self) -> &BuildLinks {
        &self.links
    }
}

impl Build for BuildRecord {
    fn application(&self) -> &str {
        &self.application
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn byte_size(&self) -> u64 {
        self.size
    }

    fn direct_link(&self) -> &str {
        &self.links.direct
    }

    fn grab_link(&self) -> &str {
        &self.links.grab
    }

    fn download_counter(&self) -> u64 {
        self.download_counter
    }
}

/// Alias of the highest ranked build, bound to the requesting application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestBuildRecord {
    application: String,
    file_name: String,
    size: u64,
    links: BuildLinks,
    download_counter: u64,
}

impl LatestBuildRecord {
    /// Copy the download-facing fields of `build`.
    pub fn from_build(application: impl Into<String>, build: &BuildRecord) -> Self {
        Self {
            application: application.into(),
            file_name: build.file_name.clone(),
            size: build.size,
            links: build.links.clone(),
            download_counter: build.download_counter,
        }
    }
}

impl Build for LatestBuildRecord {
    fn application(&self) -> &str {
        &self.application
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn byte_size(&self) -> u64 {
        self.size
    }

    fn direct_link(&self) -> &str {
        &self.links.direct
    }

    fn grab_link(&self) -> &str {
        &self.links.grab
    }

    fn download_counter(&self) -> u64 {
        self.download_counter
    }

    fn is_latest(&self) -> bool {
        true
    }
}

/// Either a parsed build or the latest alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEntry {
    /// A build parsed from its file name.
    Build(BuildRecord),
    /// The synthesised latest entry.
    Latest(LatestBuildRecord),
}

impl BuildEntry {
    /// Parsed metadata, absent for the latest alias.
    pub fn record(&self) -> Option<&BuildRecord> {
        match self {
            Self::Build(record) => Some(record),
            Self::Latest(_) => None,
        }
    }

    fn as_build(&self) -> &dyn Build {
        match self {
            Self::Build(record) => record,
            Self::Latest(latest) => latest,
        }
    }
}

impl Build for BuildEntry {
    fn application(&self) -> &str {
        self.as_build().application()
    }

    fn file_name(&self) -> &str {
        self.as_build().file_name()
    }

    fn byte_size(&self) -> u64 {
        self.as_build().byte_size()
    }

    fn direct_link(&self) -> &str {
        self.as_build().direct_link()
    }

    fn grab_link(&self) -> &str {
        self.as_build().grab_link()
    }

    fn download_counter(&self) -> u64 {
        self.as_build().download_counter()
    }

    fn is_latest(&self) -> bool {
        self.as_build().is_latest()
    }
}

/// Format a byte count using a unit picked from its decimal digit count.
///
/// The unit index is `(digits - 1) / 3` while the divisor is `1024^index`,
/// so `1_000_000` renders as `0.95M` rather than `976.56K`.
pub fn human_size(bytes: u64) -> String {
    let digits = bytes.to_string().len();
    let factor = (digits - 1) / 3;
    let value = bytes as f64 / 1024f64.powi(factor as i32);
    let unit = SIZE_UNITS.get(factor..factor + 1).unwrap_or("");
    format!("{value:.2}{unit}")
}

fn parse_file_name(file_name: &str) -> Result<(String, String, DateTime<Utc>), BuildParseError> {
    let caps = BUILD_NAME_RE
        .captures(file_name)
        .ok_or_else(|| BuildParseError::Malformed {
            file_name: file_name.to_string(),
        })?;

    let version = caps[1].to_string();
    let build_hash = caps[2].to_string();
    let stamp = format!("{}-{}", &caps[3], &caps[4]);

    let naive = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d-%H%M").map_err(|_| {
        BuildParseError::InvalidDate {
            file_name: file_name.to_string(),
            value: stamp.clone(),
        }
    })?;

    Ok((version, build_hash, Utc.from_utc_datetime(&naive)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> BuildLinks {
        BuildLinks {
            direct: "http://localhost/files/App/x.jar".to_string(),
            grab: "http://localhost/grab/App/x.jar".to_string(),
        }
    }

    #[test]
    fn parses_metadata_from_file_name() -> Result<(), BuildParseError> {
        let build = BuildRecord::parse("App", "1.16.5-a1b2c3-20210304-1530.jar", 2048, links(), 7)?;

        assert_eq!(build.application(), "App");
        assert_eq!(build.version(), "1.16.5");
        assert_eq!(build.build_hash(), "a1b2c3");
        assert_eq!(build.human_date(), "March 04, 2021");
        assert_eq!(build.epoch_date(), 1_614_871_800);
        assert_eq!(build.download_counter(), 7);
        assert_eq!(build.byte_size(), 2048);
        assert!(!build.is_latest());
        Ok(())
    }

    #[test]
    fn parsing_is_deterministic() -> Result<(), BuildParseError> {
        let name = "1.17-deadbeef-20211224-0001.jar";
        let first = BuildRecord::parse("App", name, 1, links(), 0)?;
        let second = BuildRecord::parse("App", name, 1, links(), 0)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn tolerates_leading_text() -> Result<(), BuildParseError> {
        let build = BuildRecord::parse("App", "App-1.12.2-42-20200101-0000.jar", 1, links(), 0)?;
        assert_eq!(build.version(), "1.12.2");
        assert_eq!(build.build_hash(), "42");
        Ok(())
    }

    #[test]
    fn rejects_names_without_pattern() {
        let err = BuildRecord::parse("App", "readme.txt", 1, links(), 0).unwrap_err();
        assert_eq!(
            err,
            BuildParseError::Malformed {
                file_name: "readme.txt".to_string()
            }
        );

        let err = BuildRecord::parse("App", "1.16.5-abc-20210304-1530.zip", 1, links(), 0)
            .unwrap_err();
        assert!(matches!(err, BuildParseError::Malformed { .. }));
    }

    #[test]
    fn checks_names_without_building() {
        assert!(BuildRecord::check_file_name("1.17-abc-20210304-1530.jar").is_ok());
        assert!(BuildRecord::check_file_name("notes.txt").is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        let err = BuildRecord::parse("App", "1.16.5-abc-20211332-1530.jar", 1, links(), 0)
            .unwrap_err();
        assert!(matches!(err, BuildParseError::InvalidDate { ref value, .. } if value == "20211332-1530"));

        let err = BuildRecord::parse("App", "1.16.5-abc-20210304-2561.jar", 1, links(), 0)
            .unwrap_err();
        assert!(matches!(err, BuildParseError::InvalidDate { .. }));
    }

    #[test]
    fn human_size_uses_digit_count_factor() {
        assert_eq!(human_size(0), "0.00B");
        assert_eq!(human_size(999), "999.00B");
        // Four digits selects K even though 1000 < 1024.
        assert_eq!(human_size(1000), "0.98K");
        assert_eq!(human_size(1024), "1.00K");
        assert_eq!(human_size(1_000_000), "0.95M");
        assert_eq!(human_size(5_242_880), "5.00M");
        assert_eq!(human_size(u64::MAX), "16.00");
    }

    #[test]
    fn latest_copies_download_fields() -> Result<(), BuildParseError> {
        let build = BuildRecord::parse("App", "1.16.5-abc-20210304-1530.jar", 10, links(), 3)?;
        let latest = LatestBuildRecord::from_build("App", &build);

        assert!(latest.is_latest());
        assert_eq!(latest.file_name(), build.file_name());
        assert_eq!(latest.byte_size(), build.byte_size());
        assert_eq!(latest.direct_link(), build.direct_link());
        assert_eq!(latest.grab_link(), build.grab_link());
        assert_eq!(latest.download_counter(), 3);
        Ok(())
    }
}
