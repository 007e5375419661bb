use crate::models::{Category, Exercise, Program, WorkoutDay};

/// The program a first run starts with.
pub fn default_program() -> Program {
    use Category::*;

    let mut program = Program::new();
    program.insert(
        "Day 1: Upper Body Push".to_string(),
        day(
            "Chest, Shoulders, Triceps",
            &[
                ("Bench Press", 4, "6-8", Compound),
                ("Incline Dumbbell Press", 3, "8-10", Compound),
                ("Overhead Shoulder Press", 3, "8-10", Compound),
                ("Lateral Raises", 3, "12", Isolation),
                ("Tricep Dips", 3, "10", Compound),
                ("Tricep Pushdowns", 3, "12", Isolation),
            ],
        ),
    );
    program.insert(
        "Day 2: Lower Body".to_string(),
        day(
            "Quads, Hamstrings, Calves",
            &[
                ("Squats", 4, "6-8", Compound),
                ("Leg Press", 3, "10", Machine),
                ("Leg Curls", 3, "12", Machine),
                ("Calf Raises", 3, "15", Isolation),
                ("Lunges", 3, "10 per leg", Compound),
            ],
        ),
    );
    program.insert(
        "Day 3: Upper Body Pull".to_string(),
        day(
            "Back, Biceps",
            &[
                ("Deadlifts", 4, "6-8", Compound),
                ("Pull-Ups or Lat Pulldowns", 3, "8-10", Compound),
                ("Bent Over Rows", 3, "8-10", Compound),
                ("Face Pulls", 3, "12", Isolation),
                ("Bicep Curls", 3, "12", Isolation),
                ("Hammer Curls", 3, "12", Isolation),
            ],
        ),
    );
    program.insert(
        "Day 4: Lower Body".to_string(),
        day(
            "Quads, Hamstrings, Calves",
            &[
                ("Deadlifts", 4, "6-8", Compound),
                ("Leg Extensions", 3, "12", Machine),
                ("Leg Curls", 3, "12", Machine),
                ("Calf Raises", 3, "15", Isolation),
                ("Hip Thrusts", 3, "10", Compound),
            ],
        ),
    );
    program
}

fn day(focus: &str, exercises: &[(&str, u32, &str, Category)]) -> WorkoutDay {
    WorkoutDay {
        focus: focus.to_string(),
        exercises: exercises
            .iter()
            .map(|&(name, sets, reps, category)| Exercise::new(name, sets, reps, category))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_shape() {
        let program = default_program();
        assert_eq!(
            program.labels().collect::<Vec<_>>(),
            vec![
                "Day 1: Upper Body Push",
                "Day 2: Lower Body",
                "Day 3: Upper Body Pull",
                "Day 4: Lower Body",
            ]
        );
        let counts: Vec<usize> = program.iter().map(|(_, d)| d.exercises.len()).collect();
        assert_eq!(counts, vec![6, 5, 6, 5]);
        assert_eq!(program.get("Day 3: Upper Body Pull").unwrap().focus, "Back, Biceps");
    }

    #[test]
    fn test_default_program_ids_are_unique() {
        let program = default_program();
        let mut ids: Vec<_> = program
            .iter()
            .flat_map(|(_, d)| d.exercises.iter().map(|e| e.id))
            .collect();
        let total = ids.len();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
