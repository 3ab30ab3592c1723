#[cfg(test)]
#[path = "drafts_test.rs"]
mod tests;

use std::path;
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppError;
use crate::domain::models::DraftData;
use crate::domain::models::DraftMetadata;

const DRAFT_KEY_PREFIX: &str = "template_draft_";
const DRAFT_METADATA_KEY: &str = "template_draft_metadata";

/// Local persistence for in-progress edits, keyed by template id (or "new"
/// while creating). At most one live draft exists per key; the last write
/// wins. Read/write failures degrade to "no draft available" and never block
/// editing.
pub struct Drafts {
    pub cache_dir: path::PathBuf,
    template_id: Option<String>,
    save_timer: Option<task::JoinHandle<()>>,
}

impl Drafts {
    pub fn new(cache_dir: path::PathBuf, template_id: Option<&str>) -> Drafts {
        return Drafts {
            cache_dir,
            template_id: template_id.map(|id| return id.to_string()),
            save_timer: None,
        };
    }

    pub fn for_template(template_id: Option<&str>) -> Drafts {
        let mut dir = Config::get(ConfigKey::DraftDir);
        if dir.is_empty() {
            dir = dirs::cache_dir()
                .unwrap()
                .join("maildeck/drafts")
                .to_string_lossy()
                .to_string();
        }

        return Drafts::new(path::PathBuf::from(dir), template_id);
    }

    fn key(&self) -> &str {
        return self.template_id.as_deref().unwrap_or("new");
    }

    fn draft_path(&self) -> path::PathBuf {
        return self
            .cache_dir
            .join(format!("{DRAFT_KEY_PREFIX}{}.json", self.key()));
    }

    fn metadata_path(&self) -> path::PathBuf {
        return self.cache_dir.join(format!("{DRAFT_METADATA_KEY}.json"));
    }

    pub async fn save(&self, data: &DraftData) -> Result<(), AppError> {
        return Drafts::write(
            &self.cache_dir,
            self.key(),
            self.template_id.as_deref(),
            data,
        )
        .await;
    }

    /// Debounced save: each call resets the timer, and only the most recent
    /// payload within a window is written, exactly once, after `delay` of
    /// inactivity.
    pub fn auto_save(&mut self, data: DraftData, delay: Duration) {
        if let Some(timer) = self.save_timer.take() {
            timer.abort();
        }

        let cache_dir = self.cache_dir.clone();
        let template_id = self.template_id.clone();
        self.save_timer = Some(task::spawn(async move {
            time::sleep(delay).await;
            let key = template_id.as_deref().unwrap_or("new");
            if let Err(err) = Drafts::write(&cache_dir, key, template_id.as_deref(), &data).await {
                tracing::warn!(err = ?err, key = key, "Failed to auto-save draft");
            }
        }));
    }

    /// Drops any save still waiting on its debounce timer.
    pub fn cancel_pending(&mut self) {
        if let Some(timer) = self.save_timer.take() {
            timer.abort();
        }
    }

    /// Returns the stored draft, treating absent or corrupt data as no draft.
    pub async fn load(&self) -> Option<DraftData> {
        let payload = fs::read_to_string(self.draft_path()).await.ok()?;
        return serde_json::from_str::<DraftData>(&payload).ok();
    }

    pub async fn metadata(&self) -> Option<DraftMetadata> {
        let payload = fs::read_to_string(self.metadata_path()).await.ok()?;
        return serde_json::from_str::<DraftMetadata>(&payload).ok();
    }

    pub async fn has_draft(&self) -> bool {
        return self
            .load()
            .await
            .map(|draft| return !draft.is_empty())
            .unwrap_or(false);
    }

    /// Removes the draft payload and its metadata record. Clearing an absent
    /// draft is not an error.
    pub async fn clear(&mut self) -> Result<(), AppError> {
        self.cancel_pending();

        for file_path in [self.draft_path(), self.metadata_path()] {
            if !file_path.exists() {
                continue;
            }
            fs::remove_file(file_path)
                .await
                .map_err(|err| return AppError::Persistence(err.to_string()))?;
        }

        return Ok(());
    }

    /// Lists the keys of all stored drafts, used by the `drafts` subcommands.
    pub async fn list(cache_dir: &path::Path) -> Vec<String> {
        let mut keys: Vec<String> = vec![];
        let Ok(mut dir) = fs::read_dir(cache_dir).await else {
            return keys;
        };

        while let Ok(Some(file)) = dir.next_entry().await {
            let name = file.file_name().to_string_lossy().to_string();
            if let Some(key) = name
                .strip_prefix(DRAFT_KEY_PREFIX)
                .and_then(|rest| return rest.strip_suffix(".json"))
            {
                if key != "metadata" {
                    keys.push(key.to_string());
                }
            }
        }

        keys.sort();
        return keys;
    }

    async fn write(
        cache_dir: &path::Path,
        key: &str,
        template_id: Option<&str>,
        data: &DraftData,
    ) -> Result<(), AppError> {
        let persist = |err: std::io::Error| return AppError::Persistence(err.to_string());

        if !cache_dir.exists() {
            fs::create_dir_all(cache_dir).await.map_err(persist)?;
        }

        let payload = serde_json::to_string(data)
            .map_err(|err| return AppError::Persistence(err.to_string()))?;
        let mut file = fs::File::create(cache_dir.join(format!("{DRAFT_KEY_PREFIX}{key}.json")))
            .await
            .map_err(persist)?;
        file.write_all(payload.as_bytes()).await.map_err(persist)?;

        let metadata = serde_json::to_string(&DraftMetadata::new(template_id))
            .map_err(|err| return AppError::Persistence(err.to_string()))?;
        let mut file = fs::File::create(cache_dir.join(format!("{DRAFT_METADATA_KEY}.json")))
            .await
            .map_err(persist)?;
        file.write_all(metadata.as_bytes()).await.map_err(persist)?;

        tracing::debug!(key = key, "Draft saved");
        return Ok(());
    }
}

impl Drop for Drafts {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
