use crate::config::StoreLayout;
use crate::persistence::file::{atomic_write, ensure_private_dir};
use crate::persistence::{StoreError, StoreResult};
use crate::render::{Artifacts, RenderOptions, render_all};
use crate::schedule::Schedule;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub text: PathBuf,
    pub reminders: PathBuf,
    pub html: PathBuf,
}

impl ArtifactPaths {
    pub fn all(&self) -> [&PathBuf; 3] {
        [&self.text, &self.reminders, &self.html]
    }
}

/// Renders the week and writes the three artifacts under `layout`.
pub fn write_artifacts(
    layout: &StoreLayout,
    schedule: &Schedule,
    options: &RenderOptions,
) -> StoreResult<ArtifactPaths> {
    let artifacts = render_all(schedule, options);
    write_rendered(layout, &artifacts)
}

pub fn write_rendered(layout: &StoreLayout, artifacts: &Artifacts) -> StoreResult<ArtifactPaths> {
    ensure_private_dir(layout.root())?;
    ensure_private_dir(&layout.artifacts_dir())?;

    let paths = ArtifactPaths {
        text: layout.text_file(),
        reminders: layout.reminders_file(),
        html: layout.html_file(),
    };
    for (path, content) in [
        (&paths.text, &artifacts.text),
        (&paths.reminders, &artifacts.reminders),
        (&paths.html, &artifacts.html),
    ] {
        atomic_write(path, content).map_err(|source| StoreError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote artifact");
    }
    Ok(paths)
}
