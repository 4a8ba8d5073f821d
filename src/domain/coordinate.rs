//! Maven artifact coordinates as printed by `mvn dependency:tree`.

use std::fmt;

use crate::domain::error::DomainError;

/// Field delimiter of a coordinate string.
pub const DELIMITER: char = ':';

/// Extension of descriptor (metadata) files.
pub const POM_EXTENSION: &str = "pom";

/// One resolved artifact: `group:artifact:packaging[:classifier]:version:scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub packaging: String,
    pub classifier: Option<String>,
    pub version: String,
    /// Dependency scope (`compile`, `runtime`, ...), informational only
    pub scope: String,
    raw: String,
}

impl Coordinate {
    /// Parse a coordinate string.
    ///
    /// Exactly 5 fields means no classifier, exactly 6 fields carries one.
    /// Any other arity is rejected with [`DomainError::MalformedCoordinate`].
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let fields: Vec<&str> = raw.split(DELIMITER).collect();
        let (group_id, artifact_id, packaging, classifier, version, scope) = match fields[..] {
            [group, artifact, packaging, version, scope] => {
                (group, artifact, packaging, None, version, scope)
            }
            [group, artifact, packaging, classifier, version, scope] => {
                (group, artifact, packaging, Some(classifier), version, scope)
            }
            _ => {
                return Err(DomainError::MalformedCoordinate {
                    coordinate: raw.to_string(),
                    fields: fields.len(),
                })
            }
        };

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            packaging: packaging.to_string(),
            classifier: classifier.map(str::to_string),
            version: version.to_string(),
            scope: scope.to_string(),
            raw: raw.to_string(),
        })
    }

    /// The coordinate string this was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// File name of the packaged artifact, e.g. `maven-core-3.8.1.jar`.
    pub fn lib_name(&self) -> String {
        match &self.classifier {
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.packaging),
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, self.packaging
            ),
        }
    }

    /// File name of the descriptor, e.g. `maven-core-3.8.1.pom`.
    ///
    /// Descriptors never carry the classifier.
    pub fn pom_name(&self) -> String {
        format!("{}-{}.{}", self.artifact_id, self.version, POM_EXTENSION)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
