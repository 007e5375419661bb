use thiserror::Error;

use crate::models::ExerciseId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("UI error: {0}")]
    Ui(#[from] eframe::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Validation errors are raised before the program is touched; everything
    /// else comes from storage, after the in-memory change went through.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Rejected edits. The program is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Day name cannot be empty")]
    EmptyDayName,

    #[error("Focus cannot be empty")]
    EmptyFocus,

    #[error("Day already exists: {0}")]
    DuplicateDay(String),

    #[error("Day not found: {0}")]
    UnknownDay(String),

    #[error("No day selected")]
    NoDaySelected,

    #[error("Exercise name cannot be empty")]
    EmptyExerciseName,

    #[error("Sets must be a whole number above zero")]
    InvalidSets,

    #[error("Reps cannot be empty")]
    EmptyReps,

    #[error("Choose a category")]
    MissingCategory,

    #[error("No exercise at position {index} in {day} ({len} exercises)")]
    ExerciseOutOfRange {
        day: String,
        index: usize,
        len: usize,
    },

    #[error("Exercise not found: {0}")]
    ExerciseNotFound(ExerciseId),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", Error::NoHomeDir), "No home directory");
        assert_eq!(
            format!("{}", Error::from(ValidationError::EmptyFocus)),
            "Focus cannot be empty"
        );
        assert_eq!(
            format!(
                "{}",
                ValidationError::ExerciseOutOfRange {
                    day: "Day 1: Push".to_string(),
                    index: 7,
                    len: 3,
                }
            ),
            "No exercise at position 7 in Day 1: Push (3 exercises)"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::from(ValidationError::EmptyReps).is_validation());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert!(!Error::from(io).is_validation());
    }
}
