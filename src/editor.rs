//! View state for the program editor.
//!
//! Holds no GUI handles: the window lays out a frame from this state, collects
//! the user's [`Action`]s and hands them to [`Editor::dispatch`] afterwards.

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::error::{Result, ValidationError};
use crate::models::{parse_sets, DayDraft, Exercise, ExerciseDraft, ExerciseId, ExercisePatch, Program};
use crate::store::ProgramStore;

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// The row currently in inline-edit mode, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub id: ExerciseId,
    pub name: String,
    pub sets: String,
    pub reps: String,
}

impl EditBuffer {
    fn from_exercise(exercise: &Exercise) -> Self {
        EditBuffer {
            id: exercise.id,
            name: exercise.name.clone(),
            sets: exercise.sets.to_string(),
            reps: exercise.reps.clone(),
        }
    }

    /// Name and reps go through as typed; sets that don't parse are left alone.
    fn to_patch(&self) -> ExercisePatch {
        ExercisePatch {
            name: Some(self.name.clone()),
            sets: parse_sets(&self.sets),
            reps: Some(self.reps.clone()),
            category: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectDay(String),
    OpenAddDay,
    CloseAddDay,
    SubmitNewDay,
    DeleteDay(String),
    SubmitNewExercise,
    BeginEdit(ExerciseId),
    CancelEdit,
    SaveEdit,
    DeleteExercise(ExerciseId),
    DismissNotification,
}

pub struct Editor {
    store: ProgramStore,
    selected: Option<String>,
    notification: Option<Notification>,
    pub editing: Option<EditBuffer>,
    pub new_exercise: ExerciseDraft,
    pub new_day: DayDraft,
    pub add_day_open: bool,
}

impl Editor {
    pub fn new(store: ProgramStore) -> Self {
        let selected = store.program().first_label().map(str::to_owned);
        Self {
            store,
            selected,
            notification: None,
            editing: None,
            new_exercise: ExerciseDraft::default(),
            new_day: DayDraft::default(),
            add_day_open: false,
        }
    }

    pub fn program(&self) -> &Program {
        self.store.program()
    }

    pub fn selected_day(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.store.last_saved()
    }

    pub fn is_editing(&self, id: ExerciseId) -> bool {
        self.editing.as_ref().is_some_and(|e| e.id == id)
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SelectDay(label) => {
                if self.program().contains(&label) {
                    self.editing = None;
                    self.selected = Some(label);
                }
            }
            Action::OpenAddDay => self.add_day_open = true,
            Action::CloseAddDay => self.add_day_open = false,
            Action::SubmitNewDay => self.submit_new_day(),
            Action::DeleteDay(label) => self.delete_day(label),
            Action::SubmitNewExercise => self.submit_new_exercise(),
            Action::BeginEdit(id) => self.begin_edit(id),
            Action::CancelEdit => self.editing = None,
            Action::SaveEdit => self.save_edit(),
            Action::DeleteExercise(id) => self.delete_exercise(id),
            Action::DismissNotification => self.notification = None,
        }
    }

    fn submit_new_day(&mut self) {
        let result = self.store.add_day(&self.new_day.name, &self.new_day.focus);
        if self.report(&result) {
            self.new_day = DayDraft::default();
            self.add_day_open = false;
        }
        if let Ok(label) = result {
            self.notify_info(format!("Added {}", label));
        }
    }

    fn delete_day(&mut self, label: String) {
        let result = self.store.delete_day(&label);
        if self.report(&result) && self.selected.as_deref() == Some(label.as_str()) {
            self.editing = None;
            self.selected = self.program().first_label().map(str::to_owned);
        }
        if result.is_ok() {
            self.notify_info(format!("Deleted {}", label));
        }
    }

    fn submit_new_exercise(&mut self) {
        let Some(day) = self.selected.clone() else {
            self.notify_error(ValidationError::NoDaySelected.to_string());
            return;
        };
        let result = self.store.add_exercise(&day, &self.new_exercise);
        if self.report(&result) {
            let name = std::mem::take(&mut self.new_exercise).name;
            if result.is_ok() {
                self.notify_info(format!("Added {} to {}", name, day));
            }
        }
    }

    fn begin_edit(&mut self, id: ExerciseId) {
        let found = self
            .selected
            .as_deref()
            .and_then(|day| self.program().get(day))
            .and_then(|day| day.exercises.iter().find(|e| e.id == id))
            .map(EditBuffer::from_exercise);
        match found {
            Some(buffer) => self.editing = Some(buffer),
            None => self.notify_error(ValidationError::ExerciseNotFound(id).to_string()),
        }
    }

    fn save_edit(&mut self) {
        let Some(buffer) = self.editing.take() else {
            return;
        };
        let Some(day) = self.selected.clone() else {
            self.notify_error(ValidationError::NoDaySelected.to_string());
            return;
        };
        let result = self
            .store
            .update_exercise_by_id(&day, buffer.id, &buffer.to_patch());
        if !self.report(&result) {
            warn!("Dropped edit of {} in {}", buffer.id, day);
        }
    }

    fn delete_exercise(&mut self, id: ExerciseId) {
        let Some(day) = self.selected.clone() else {
            self.notify_error(ValidationError::NoDaySelected.to_string());
            return;
        };
        if self.is_editing(id) {
            self.editing = None;
        }
        let result = self.store.delete_exercise_by_id(&day, id);
        self.report(&result);
        if let Ok(removed) = result {
            self.notify_info(format!("Removed {}", removed.name));
        }
    }

    /// Surfaces an error and returns whether the program changed.
    fn report<T>(&mut self, result: &Result<T>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) if e.is_validation() => {
                info!("Rejected: {}", e);
                self.notify_error(e.to_string());
                false
            }
            Err(e) => {
                error!("Failed to save program: {}", e);
                self.notify_error(format!("Changed but not saved: {}", e));
                true
            }
        }
    }

    fn notify_info(&mut self, message: String) {
        self.notification = Some(Notification {
            level: NotificationLevel::Info,
            message,
        });
    }

    fn notify_error(&mut self, message: String) {
        self.notification = Some(Notification {
            level: NotificationLevel::Error,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::store::MemoryStore;

    fn editor() -> Editor {
        Editor::new(ProgramStore::open(Box::new(MemoryStore::default())).unwrap())
    }

    fn first_id(editor: &Editor, day: &str) -> ExerciseId {
        editor.program().get(day).unwrap().exercises[0].id
    }

    fn last_level(editor: &Editor) -> Option<NotificationLevel> {
        editor.notification().map(|n| n.level)
    }

    #[test]
    fn test_initial_selection_is_first_day() {
        let editor = editor();
        assert_eq!(editor.selected_day(), Some("Day 1: Upper Body Push"));
        assert!(editor.editing.is_none());
        assert!(!editor.add_day_open);
    }

    #[test]
    fn test_select_unknown_day_is_ignored() {
        let mut editor = editor();
        editor.dispatch(Action::SelectDay("Day 9: Nope".to_string()));
        assert_eq!(editor.selected_day(), Some("Day 1: Upper Body Push"));
    }

    #[test]
    fn test_delete_selected_day_moves_to_first_remaining() {
        let mut editor = editor();
        editor.dispatch(Action::SelectDay("Day 3: Upper Body Pull".to_string()));
        editor.dispatch(Action::DeleteDay("Day 3: Upper Body Pull".to_string()));
        assert_eq!(editor.selected_day(), Some("Day 1: Upper Body Push"));
        assert_eq!(editor.program().len(), 3);
        assert_eq!(last_level(&editor), Some(NotificationLevel::Info));
    }

    #[test]
    fn test_delete_other_day_keeps_selection() {
        let mut editor = editor();
        editor.dispatch(Action::SelectDay("Day 3: Upper Body Pull".to_string()));
        editor.dispatch(Action::DeleteDay("Day 1: Upper Body Push".to_string()));
        assert_eq!(editor.selected_day(), Some("Day 3: Upper Body Pull"));
    }

    #[test]
    fn test_delete_last_day_clears_selection() {
        let mut editor = editor();
        let labels: Vec<String> = editor.program().labels().map(str::to_owned).collect();
        for label in labels {
            editor.dispatch(Action::DeleteDay(label));
        }
        assert!(editor.program().is_empty());
        assert_eq!(editor.selected_day(), None);

        editor.new_exercise = ExerciseDraft::new("Plank", "3", "60s", Some(Category::Bodyweight));
        editor.dispatch(Action::SubmitNewExercise);
        assert_eq!(
            editor.notification().unwrap().message,
            ValidationError::NoDaySelected.to_string()
        );
    }

    #[test]
    fn test_add_day_closes_dialog_and_clears_draft() {
        let mut editor = editor();
        editor.dispatch(Action::OpenAddDay);
        editor.new_day.name = "Core".to_string();
        editor.new_day.focus = "Abs".to_string();
        editor.dispatch(Action::SubmitNewDay);
        assert!(!editor.add_day_open);
        assert_eq!(editor.new_day, DayDraft::default());
        assert_eq!(editor.program().labels().last(), Some("Day 5: Core"));
        assert_eq!(editor.notification().unwrap().message, "Added Day 5: Core");
        // selection stays where it was
        assert_eq!(editor.selected_day(), Some("Day 1: Upper Body Push"));
    }

    #[test]
    fn test_rejected_day_keeps_dialog_and_draft() {
        let mut editor = editor();
        editor.dispatch(Action::OpenAddDay);
        editor.new_day.name = "Core".to_string();
        editor.dispatch(Action::SubmitNewDay);
        assert!(editor.add_day_open);
        assert_eq!(editor.new_day.name, "Core");
        assert_eq!(editor.program().len(), 4);
        assert_eq!(
            editor.notification().unwrap().message,
            "Focus cannot be empty"
        );
        editor.dispatch(Action::DismissNotification);
        assert!(editor.notification().is_none());
    }

    #[test]
    fn test_add_exercise_clears_draft() {
        let mut editor = editor();
        editor.new_exercise = ExerciseDraft::new("Plank", "3", "60s", Some(Category::Bodyweight));
        editor.dispatch(Action::SubmitNewExercise);
        assert_eq!(editor.new_exercise, ExerciseDraft::default());
        let day = editor.program().get("Day 1: Upper Body Push").unwrap();
        assert_eq!(day.exercises.len(), 7);
        assert_eq!(day.exercises[6].name, "Plank");
    }

    #[test]
    fn test_rejected_exercise_keeps_draft() {
        let mut editor = editor();
        editor.new_exercise = ExerciseDraft::new("Plank", "3", "60s", None);
        editor.dispatch(Action::SubmitNewExercise);
        assert_eq!(editor.new_exercise.name, "Plank");
        assert_eq!(last_level(&editor), Some(NotificationLevel::Error));
        assert_eq!(
            editor.program().get("Day 1: Upper Body Push").unwrap().exercises.len(),
            6
        );
    }

    #[test]
    fn test_edit_and_save() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 1: Upper Body Push");
        editor.dispatch(Action::BeginEdit(id));
        assert!(editor.is_editing(id));
        let buffer = editor.editing.as_mut().unwrap();
        assert_eq!(buffer.name, "Bench Press");
        buffer.name = "Paused Bench".to_string();
        buffer.sets = "5".to_string();
        editor.dispatch(Action::SaveEdit);
        assert!(editor.editing.is_none());
        let bench = &editor.program().get("Day 1: Upper Body Push").unwrap().exercises[0];
        assert_eq!(bench.name, "Paused Bench");
        assert_eq!(bench.sets, 5);
        assert_eq!(bench.reps, "6-8");
        assert_eq!(bench.id, id);
    }

    #[test]
    fn test_edit_with_bad_sets_keeps_old_sets() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 2: Lower Body");
        editor.dispatch(Action::SelectDay("Day 2: Lower Body".to_string()));
        editor.dispatch(Action::BeginEdit(id));
        editor.editing.as_mut().unwrap().sets = String::new();
        editor.dispatch(Action::SaveEdit);
        let squats = &editor.program().get("Day 2: Lower Body").unwrap().exercises[0];
        assert_eq!(squats.sets, 4);
    }

    #[test]
    fn test_cancel_edit_changes_nothing() {
        let mut editor = editor();
        let before = editor.program().clone();
        let id = first_id(&editor, "Day 1: Upper Body Push");
        editor.dispatch(Action::BeginEdit(id));
        editor.editing.as_mut().unwrap().name = "Changed".to_string();
        editor.dispatch(Action::CancelEdit);
        assert!(editor.editing.is_none());
        assert_eq!(*editor.program(), before);
    }

    #[test]
    fn test_switching_day_exits_edit_mode() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 1: Upper Body Push");
        editor.dispatch(Action::BeginEdit(id));
        editor.dispatch(Action::SelectDay("Day 2: Lower Body".to_string()));
        assert!(editor.editing.is_none());
        editor.dispatch(Action::SaveEdit);
        assert_eq!(
            editor.program().get("Day 1: Upper Body Push").unwrap().exercises[0].name,
            "Bench Press"
        );
    }

    #[test]
    fn test_begin_edit_outside_selected_day_is_rejected() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 2: Lower Body");
        editor.dispatch(Action::BeginEdit(id));
        assert!(editor.editing.is_none());
        assert_eq!(last_level(&editor), Some(NotificationLevel::Error));
    }

    #[test]
    fn test_delete_exercise_being_edited() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 1: Upper Body Push");
        editor.dispatch(Action::BeginEdit(id));
        editor.dispatch(Action::DeleteExercise(id));
        assert!(editor.editing.is_none());
        let day = editor.program().get("Day 1: Upper Body Push").unwrap();
        assert_eq!(day.exercises.len(), 5);
        assert_eq!(day.exercises[0].name, "Incline Dumbbell Press");
        assert_eq!(editor.notification().unwrap().message, "Removed Bench Press");
    }

    #[test]
    fn test_stale_delete_is_noop() {
        let mut editor = editor();
        let id = first_id(&editor, "Day 1: Upper Body Push");
        editor.dispatch(Action::DeleteExercise(id));
        let before = editor.program().clone();
        editor.dispatch(Action::DeleteExercise(id));
        assert_eq!(*editor.program(), before);
        assert_eq!(last_level(&editor), Some(NotificationLevel::Error));
    }
}
