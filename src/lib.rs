pub mod artifacts;
pub mod categorize;
pub mod config;
pub mod delivery;
pub mod migration;
pub mod persistence;
pub mod render;
pub mod schedule;

pub use artifacts::{ArtifactPaths, write_artifacts};
pub use categorize::{Category, categorize, group_by_category};
pub use config::{EmailSettings, StoreLayout};
pub use migration::{LegacyDayRecord, RawRecord, migrate};
pub use persistence::{
    FileScheduleStore, LoadReport, RecordIssue, ScheduleStore, StoreError, StoreResult,
};
pub use render::{Artifacts, RenderError, RenderOptions, render_all};
pub use schedule::{Day, Plan, Schedule, WEEK, day_name, parse_day_name};
