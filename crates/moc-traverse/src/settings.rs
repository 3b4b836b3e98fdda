//! Traversal settings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraverseError};
use crate::schedule::Schedule;

/// Scheduling parameters for sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraverseSettings {
    /// Worker count for [`build_pool`](Self::build_pool). `None` uses
    /// rayon's default.
    pub num_threads: Option<usize>,
    /// Split of each half-angle in an unordered sweep.
    pub sweep_schedule: Schedule,
    /// Split of each parallel group in a grouped sweep.
    pub group_schedule: Schedule,
    /// Smallest number of tracks handed to one task.
    pub min_tracks_per_task: usize,
}

impl Default for TraverseSettings {
    fn default() -> Self {
        Self {
            num_threads: None,
            sweep_schedule: Schedule::Static,
            group_schedule: Schedule::Guided,
            min_tracks_per_task: 1,
        }
    }
}

impl TraverseSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(TraverseError::InvalidSettings(
                "num_threads must be at least 1".into(),
            ));
        }
        if self.min_tracks_per_task == 0 {
            return Err(TraverseError::InvalidSettings(
                "min_tracks_per_task must be at least 1".into(),
            ));
        }
        for schedule in [self.sweep_schedule, self.group_schedule] {
            if schedule == (Schedule::Dynamic { chunk: 0 }) {
                return Err(TraverseError::InvalidSettings(
                    "dynamic chunk size must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }

    /// Build a dedicated worker pool. Sweeps run on it through
    /// [`rayon::ThreadPool::install`].
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        self.validate()?;
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("moc-sweep-{i}"));
        if let Some(n) = self.num_threads {
            builder = builder.num_threads(n);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let settings = TraverseSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sweep_schedule, Schedule::Static);
        assert_eq!(settings.group_schedule, Schedule::Guided);
    }

    #[test]
    fn test_invalid_settings() {
        let zero_threads = TraverseSettings {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(zero_threads.validate().is_err());

        let zero_min = TraverseSettings {
            min_tracks_per_task: 0,
            ..Default::default()
        };
        assert!(zero_min.validate().is_err());

        let zero_chunk = TraverseSettings {
            group_schedule: Schedule::Dynamic { chunk: 0 },
            ..Default::default()
        };
        assert!(matches!(
            zero_chunk.build_pool(),
            Err(TraverseError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_settings_from_json() {
        let settings: TraverseSettings = serde_json::from_str(
            r#"{ "num_threads": 3, "group_schedule": { "Dynamic": { "chunk": 8 } } }"#,
        )
        .unwrap();
        assert_eq!(settings.num_threads, Some(3));
        assert_eq!(settings.sweep_schedule, Schedule::Static);
        assert_eq!(settings.group_schedule, Schedule::Dynamic { chunk: 8 });
        assert_eq!(settings.min_tracks_per_task, 1);

        let pool = settings.build_pool().unwrap();
        assert_eq!(pool.current_num_threads(), 3);
    }
}
