//! Storage-location newtype with validation.

use url::Url;

/// An opaque URI or path identifying where a table's or partition's data
/// resides.
///
/// Two shapes are accepted:
/// - absolute URLs with any scheme, e.g. `hdfs://namenode/warehouse/sales`
///   or `s3://bucket/sales`, validated via [`Url`];
/// - absolute filesystem paths, e.g. `/data/orders`.
///
/// Blank and relative inputs are rejected with [`InvalidLocationError`]. The
/// original input string is preserved verbatim; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocation(String);

impl StorageLocation {
    /// Returns the location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for StorageLocation {
    type Err = InvalidLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLocationError::Empty);
        }
        match Url::parse(trimmed) {
            Ok(_) => Ok(Self(trimmed.to_owned())),
            // Scheme-less locations are valid as long as they are absolute
            // paths, e.g. `/data/orders`.
            Err(url::ParseError::RelativeUrlWithoutBase) if trimmed.starts_with('/') => {
                Ok(Self(trimmed.to_owned()))
            }
            Err(source) => Err(InvalidLocationError::Malformed {
                location: trimmed.to_owned(),
                source,
            }),
        }
    }
}

impl std::ops::Deref for StorageLocation {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for StorageLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for StorageLocation {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors that can occur when parsing a string as a [`StorageLocation`].
#[derive(Debug, thiserror::Error)]
pub enum InvalidLocationError {
    /// The input was empty or whitespace-only.
    #[error("storage location must not be blank")]
    Empty,

    /// The input is neither a valid URL nor an absolute path.
    #[error("invalid storage location {location:?}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_scheme_urls() {
        let location: StorageLocation = "hdfs://namenode:8020/warehouse/sales"
            .parse()
            .expect("Failed to parse hdfs URL");
        assert_eq!(location.as_str(), "hdfs://namenode:8020/warehouse/sales");

        let location: StorageLocation = "s3://bucket/prefix/table"
            .parse()
            .expect("Failed to parse s3 URL");
        assert_eq!(location.as_str(), "s3://bucket/prefix/table");
    }

    #[test]
    fn accepts_absolute_paths() {
        let location: StorageLocation = "/data/orders".parse().expect("Failed to parse path");
        assert_eq!(location.as_str(), "/data/orders");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let location: StorageLocation = "  /data/orders  "
            .parse()
            .expect("Failed to parse padded path");
        assert_eq!(location.as_str(), "/data/orders");
    }

    #[test]
    fn rejects_blank_input() {
        let err = "   ".parse::<StorageLocation>().unwrap_err();
        assert!(matches!(err, InvalidLocationError::Empty));
    }

    #[test]
    fn rejects_relative_paths() {
        let err = "data/orders".parse::<StorageLocation>().unwrap_err();
        assert!(matches!(err, InvalidLocationError::Malformed { .. }));
    }
}
