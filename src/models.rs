//models.rs
use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(Uuid);

impl ExerciseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExerciseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Compound,
    Isolation,
    Bodyweight,
    Machine,
    #[serde(rename = "Free Weights")]
    FreeWeights,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Compound,
        Category::Isolation,
        Category::Bodyweight,
        Category::Machine,
        Category::FreeWeights,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Compound => "Compound",
            Category::Isolation => "Isolation",
            Category::Bodyweight => "Bodyweight",
            Category::Machine => "Machine",
            Category::FreeWeights => "Free Weights",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(ValidationError::MissingCategory)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_sets")]
    pub sets: u32,
    pub reps: String,
    pub category: Category,
    #[serde(default)]
    pub id: ExerciseId,
}

impl Exercise {
    pub fn new(name: &str, sets: u32, reps: &str, category: Category) -> Self {
        Exercise {
            name: name.to_string(),
            sets,
            reps: reps.to_string(),
            category,
            id: ExerciseId::new(),
        }
    }

    pub fn summary(&self) -> String {
        format!("{} sets × {} reps", self.sets, self.reps)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    pub fn new(focus: &str) -> Self {
        WorkoutDay {
            focus: focus.to_string(),
            exercises: Vec::new(),
        }
    }

    pub fn position_of(&self, id: ExerciseId) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == id)
    }
}

/// Day label to day, in display order.
///
/// Serialized as a JSON object whose key order is the insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    days: Vec<(String, WorkoutDay)>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(label, _)| label)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WorkoutDay)> {
        self.days.iter().map(|(label, day)| (label.as_str(), day))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn get(&self, label: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|(l, _)| l == label).map(|(_, d)| d)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut WorkoutDay> {
        self.days
            .iter_mut()
            .find(|(l, _)| l == label)
            .map(|(_, d)| d)
    }

    /// Appends a day, or replaces the value in place when the label exists.
    pub fn insert(&mut self, label: String, day: WorkoutDay) {
        match self.get_mut(&label) {
            Some(existing) => *existing = day,
            None => self.days.push((label, day)),
        }
    }

    pub fn remove(&mut self, label: &str) -> Option<WorkoutDay> {
        let pos = self.days.iter().position(|(l, _)| l == label)?;
        Some(self.days.remove(pos).1)
    }
}

impl Serialize for Program {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (label, day) in &self.days {
            map.serialize_entry(label, day)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Program {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProgramVisitor;

        impl<'de> Visitor<'de> for ProgramVisitor {
            type Value = Program;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of day labels to workout days")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Program, A::Error> {
                let mut program = Program::new();
                while let Some((label, day)) = access.next_entry::<String, WorkoutDay>()? {
                    program.insert(label, day);
                }
                Ok(program)
            }
        }

        deserializer.deserialize_map(ProgramVisitor)
    }
}

/// Text before the first colon, e.g. "Day 1" for "Day 1: Upper Body Push".
pub fn tab_title(label: &str) -> &str {
    label.split(':').next().unwrap_or(label)
}

/// Integer coercion matching `parseInt`: leading digits after optional
/// whitespace and a `+`, rest ignored. Negative and digit-less input is None.
pub fn parse_sets(input: &str) -> Option<u32> {
    let s = input.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u64>().map_or(u32::MAX, |n| n.min(u32::MAX as u64) as u32))
}

fn lenient_sets<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_sets(&s).unwrap_or(0),
        _ => 0,
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayDraft {
    pub name: String,
    pub focus: String,
}

/// The add-exercise row as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub category: Option<Category>,
}

#[cfg(test)]
impl ExerciseDraft {
    pub fn new(name: &str, sets: &str, reps: &str, category: Option<Category>) -> Self {
        ExerciseDraft {
            name: name.to_string(),
            sets: sets.to_string(),
            reps: reps.to_string(),
            category,
        }
    }
}

impl ExerciseDraft {
    pub fn to_exercise(&self) -> Result<Exercise, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyExerciseName);
        }
        let sets = match parse_sets(&self.sets) {
            Some(0) | None => return Err(ValidationError::InvalidSets),
            Some(n) => n,
        };
        if self.reps.trim().is_empty() {
            return Err(ValidationError::EmptyReps);
        }
        let category = self.category.ok_or(ValidationError::MissingCategory)?;
        Ok(Exercise::new(&self.name, sets, &self.reps, category))
    }
}

/// Fields to overwrite on an existing exercise. The id always survives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub category: Option<Category>,
}

impl ExercisePatch {
    pub fn apply(&self, exercise: &Exercise) -> Exercise {
        Exercise {
            name: self.name.clone().unwrap_or_else(|| exercise.name.clone()),
            sets: self.sets.unwrap_or(exercise.sets),
            reps: self.reps.clone().unwrap_or_else(|| exercise.reps.clone()),
            category: self.category.unwrap_or(exercise.category),
            id: exercise.id,
        }
    }
}
