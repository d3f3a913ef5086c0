// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-slot handoff store.
//!
//! Persists the latest analysis (JSON record plus the normalized image) at
//! fixed well-known names so a separately launched consultation process can
//! pick it up. Deliberately a data bus, not a queue: the newest analysis
//! overwrites the previous one, there is no historical retention, and a
//! single writer is assumed per deployment. Both artifacts are written
//! before `persist` returns; a record with either file missing is treated
//! as absent.

use std::path::{Path, PathBuf};

use cropsight_config::model::StoreConfig;
use cropsight_core::{AnalysisResult, CropSuggestion, CropsightError, DiseaseSuggestion};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Well-known name of the JSON analysis record.
pub const ANALYSIS_FILE: &str = "latest_analysis.json";
/// Well-known name of the persisted image.
pub const IMAGE_FILE: &str = "latest_image.jpg";
/// Well-known name of the consultation summary handed to the chat process.
pub const CONSULTATION_FILE: &str = "crop_analysis_data.json";

/// The externally persisted form of an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffRecord {
    pub success: bool,
    pub crops: Vec<CropSuggestion>,
    pub diseases: Vec<DiseaseSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    /// Path of the persisted image, relative to the store directory.
    pub image: String,
    /// Verbatim identification-service response.
    pub raw_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
}

/// Consultation summary record consumed by the downstream chat process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub crop_summary: String,
    pub raw_data: serde_json::Value,
}

/// File-backed single-slot store.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.upload_dir),
        }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Persists an analysis and its image, overwriting the previous slot.
    ///
    /// Writes the JSON record first, then the image; the handoff only
    /// counts as present once both exist.
    pub async fn persist(
        &self,
        result: &AnalysisResult,
        image: &[u8],
    ) -> Result<HandoffRecord, CropsightError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(storage_err)?;

        let record = HandoffRecord {
            success: true,
            crops: result.crops.clone(),
            diseases: result.diseases.clone(),
            treatment: result.treatment.clone(),
            image: IMAGE_FILE.to_string(),
            raw_data: result.raw.clone(),
            image_filename: result.image_filename.clone(),
        };

        let json = serde_json::to_vec(&record).map_err(|e| CropsightError::Storage {
            source: Box::new(e),
        })?;
        tokio::fs::write(self.path(ANALYSIS_FILE), json)
            .await
            .map_err(storage_err)?;
        tokio::fs::write(self.path(IMAGE_FILE), image)
            .await
            .map_err(storage_err)?;

        debug!(dir = %self.dir.display(), image_bytes = image.len(), "persisted handoff record");
        Ok(record)
    }

    /// Loads the current slot, or `None` when either artifact is missing.
    pub async fn load_latest(&self) -> Result<Option<HandoffRecord>, CropsightError> {
        let analysis_path = self.path(ANALYSIS_FILE);
        let image_path = self.path(IMAGE_FILE);

        if !exists(&analysis_path).await || !exists(&image_path).await {
            return Ok(None);
        }

        let json = tokio::fs::read(&analysis_path).await.map_err(storage_err)?;
        let record = serde_json::from_slice(&json).map_err(|e| CropsightError::Storage {
            source: Box::new(e),
        })?;
        Ok(Some(record))
    }

    /// Reads the persisted image bytes for the current slot.
    pub async fn load_image(&self) -> Result<Option<Vec<u8>>, CropsightError> {
        let image_path = self.path(IMAGE_FILE);
        if !exists(&image_path).await {
            return Ok(None);
        }
        tokio::fs::read(&image_path)
            .await
            .map(Some)
            .map_err(storage_err)
    }

    /// Persists the formatted consultation summary for the chat process.
    pub async fn persist_consultation(
        &self,
        summary: &str,
        raw_data: &serde_json::Value,
    ) -> Result<(), CropsightError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(storage_err)?;

        let record = ConsultationRecord {
            crop_summary: summary.to_string(),
            raw_data: raw_data.clone(),
        };
        let json = serde_json::to_vec(&record).map_err(|e| CropsightError::Storage {
            source: Box::new(e),
        })?;
        tokio::fs::write(self.path(CONSULTATION_FILE), json)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn storage_err(e: std::io::Error) -> CropsightError {
    CropsightError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            crops: vec![CropSuggestion {
                name: "Tomato".into(),
                scientific_name: "Solanum lycopersicum".into(),
                confidence: 91.0,
            }],
            diseases: vec![DiseaseSuggestion {
                name: "Early Blight".into(),
                confidence: 77.0,
            }],
            treatment: Some("Remove affected leaves.".into()),
            image_filename: Some("leaf.jpg".into()),
            raw: json!({"result": {"status": "COMPLETED"}}),
        }
    }

    #[tokio::test]
    async fn persist_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path());

        store.persist(&sample_result(), b"jpeg-bytes").await.unwrap();

        let loaded = store.load_latest().await.unwrap().expect("record present");
        assert!(loaded.success);
        assert_eq!(loaded.crops[0].name, "Tomato");
        assert_eq!(loaded.diseases[0].confidence, 77.0);
        assert_eq!(loaded.treatment.as_deref(), Some("Remove affected leaves."));
        assert_eq!(loaded.image, IMAGE_FILE);
        assert_eq!(loaded.raw_data["result"]["status"], "COMPLETED");

        let image = store.load_image().await.unwrap().expect("image present");
        assert_eq!(image, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn load_latest_absent_when_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path());
        assert!(store.load_latest().await.unwrap().is_none());
        assert!(store.load_image().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_latest_absent_when_image_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path());
        store.persist(&sample_result(), b"img").await.unwrap();
        tokio::fs::remove_file(dir.path().join(IMAGE_FILE)).await.unwrap();

        // Half a slot is no slot.
        assert!(store.load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn newest_analysis_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path());

        store.persist(&sample_result(), b"first").await.unwrap();

        let mut second = sample_result();
        second.crops[0].name = "Wheat".into();
        store.persist(&second, b"second").await.unwrap();

        let loaded = store.load_latest().await.unwrap().unwrap();
        assert_eq!(loaded.crops[0].name, "Wheat");
        assert_eq!(store.load_image().await.unwrap().unwrap(), b"second");
    }

    #[tokio::test]
    async fn consultation_record_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path());

        store
            .persist_consultation("Crop Analysis Results: ...", &json!({"k": "v"}))
            .await
            .unwrap();

        let json = tokio::fs::read(dir.path().join(CONSULTATION_FILE)).await.unwrap();
        let record: ConsultationRecord = serde_json::from_slice(&json).unwrap();
        assert!(record.crop_summary.starts_with("Crop Analysis Results"));
        assert_eq!(record.raw_data["k"], "v");
    }

    #[tokio::test]
    async fn store_creates_directory_on_first_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::with_dir(dir.path().join("nested/uploads"));
        store.persist(&sample_result(), b"img").await.unwrap();
        assert!(store.load_latest().await.unwrap().is_some());
    }
}
