use nudge::models::*;
use nudge::store::Store;
use speculate2::speculate;
use tempfile::TempDir;
use uuid::Uuid;

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(dir.path().to_path_buf()).expect("Failed to open store");
    }

    describe "tasks" {
        describe "create_task" {
            it "creates an incomplete task with a fresh id" {
                let task = store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "buy milk".to_string(),
                }).expect("Failed to create task");

                assert_eq!(task.email, "a@x.com");
                assert_eq!(task.description, "buy milk");
                assert!(!task.completed);

                let other = store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "call mom".to_string(),
                }).expect("Failed to create task");
                assert_ne!(task.id, other.id);
            }

            it "preserves creation order across writes" {
                for description in ["first", "second", "third"] {
                    store.create_task(CreateTaskInput {
                        email: "a@x.com".to_string(),
                        description: description.to_string(),
                    }).expect("Failed to create task");
                }

                let tasks = store.read_tasks().expect("Failed to read tasks");
                let descriptions: Vec<&str> =
                    tasks.iter().map(|task| task.description.as_str()).collect();
                assert_eq!(descriptions, ["first", "second", "third"]);
            }
        }

        describe "read_tasks" {
            it "returns empty when the file does not exist" {
                let tasks = store.read_tasks().expect("Read failed");
                assert!(tasks.is_empty());
            }

            it "returns empty when the file is corrupt" {
                std::fs::write(dir.path().join("tasks.json"), "{not json").expect("write failed");

                let tasks = store.read_tasks().expect("Read failed");
                assert!(tasks.is_empty());
            }
        }

        describe "set_task_completed" {
            it "toggles completion and persists it" {
                let task = store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "buy milk".to_string(),
                }).expect("Failed to create task");

                let updated = store.set_task_completed(task.id, true)
                    .expect("Update failed")
                    .expect("Task should exist");
                assert!(updated.completed);

                let tasks = store.read_tasks().expect("Failed to read tasks");
                assert!(tasks[0].completed);
            }

            it "returns None for an unknown id" {
                let result = store.set_task_completed(Uuid::new_v4(), true).expect("Update failed");
                assert!(result.is_none());
            }
        }

        describe "delete_task" {
            it "removes only the matching task" {
                let keep = store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "keep me".to_string(),
                }).expect("Failed to create task");
                let doomed = store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "drop me".to_string(),
                }).expect("Failed to create task");

                assert!(store.delete_task(doomed.id).expect("Delete failed"));

                let tasks = store.read_tasks().expect("Failed to read tasks");
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].id, keep.id);
            }

            it "returns false for an unknown id" {
                assert!(!store.delete_task(Uuid::new_v4()).expect("Delete failed"));
            }
        }
    }

    describe "preferences" {
        describe "upsert_preference" {
            it "inserts a new record" {
                let pref = store.upsert_preference(SetPreferenceInput {
                    email: "a@x.com".to_string(),
                    notification_time: "09:00".to_string(),
                }).expect("Upsert failed");

                assert_eq!(pref.notification_time, "09:00");
                assert_eq!(store.read_preferences().expect("Read failed").len(), 1);
            }

            it "overwrites the existing record for the email" {
                store.upsert_preference(SetPreferenceInput {
                    email: "a@x.com".to_string(),
                    notification_time: "08:00".to_string(),
                }).expect("Upsert failed");
                store.upsert_preference(SetPreferenceInput {
                    email: "a@x.com".to_string(),
                    notification_time: "09:15".to_string(),
                }).expect("Upsert failed");

                let preferences = store.read_preferences().expect("Read failed");
                assert_eq!(preferences.len(), 1);
                assert_eq!(preferences[0].notification_time, "09:15");
            }

            it "keeps records for other emails intact" {
                store.upsert_preference(SetPreferenceInput {
                    email: "a@x.com".to_string(),
                    notification_time: "08:00".to_string(),
                }).expect("Upsert failed");
                store.upsert_preference(SetPreferenceInput {
                    email: "b@x.com".to_string(),
                    notification_time: "09:00".to_string(),
                }).expect("Upsert failed");

                let found = store.get_preference("a@x.com").expect("Read failed")
                    .expect("Preference should exist");
                assert_eq!(found.notification_time, "08:00");
            }
        }

        describe "get_preference" {
            it "returns None for an unknown email" {
                let result = store.get_preference("nobody@x.com").expect("Read failed");
                assert!(result.is_none());
            }
        }

        describe "snapshot" {
            it "pairs the current tasks and preferences" {
                store.create_task(CreateTaskInput {
                    email: "a@x.com".to_string(),
                    description: "buy milk".to_string(),
                }).expect("Failed to create task");
                store.upsert_preference(SetPreferenceInput {
                    email: "a@x.com".to_string(),
                    notification_time: "09:00".to_string(),
                }).expect("Upsert failed");

                let snapshot = store.snapshot().expect("Snapshot failed");
                assert_eq!(snapshot.tasks.len(), 1);
                assert_eq!(snapshot.preferences.len(), 1);
            }

            it "is empty when no files exist yet" {
                let snapshot = store.snapshot().expect("Snapshot failed");
                assert!(snapshot.tasks.is_empty());
                assert!(snapshot.preferences.is_empty());
            }
        }
    }

}

mod time_normalization {
    use super::*;

    #[test]
    fn accepts_zero_padded_times_unchanged() {
        assert_eq!(normalize_notification_time("09:00").as_deref(), Some("09:00"));
        assert_eq!(normalize_notification_time("23:59").as_deref(), Some("23:59"));
    }

    #[test]
    fn canonicalizes_unpadded_hours() {
        assert_eq!(normalize_notification_time("9:05").as_deref(), Some("09:05"));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(normalize_notification_time("25:00").is_none());
        assert!(normalize_notification_time("09:60").is_none());
        assert!(normalize_notification_time("soon").is_none());
        assert!(normalize_notification_time("09:00:30").is_none());
    }
}
