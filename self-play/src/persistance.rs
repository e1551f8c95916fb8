use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Result;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid_b64::UuidB64;

use crate::training::{TrainingDataWriter, TrainingExample};

/// Writes finished games as gzip-compressed JSON, one file per game.
pub struct TrainingPersistance {
    games_dir: PathBuf,
}

impl TrainingPersistance {
    pub fn new(games_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&games_dir)?;

        Ok(Self { games_dir })
    }

    /// A writer collecting one game's examples; call
    /// [`GameFileWriter::finish`] to flush them to disk.
    pub fn game_writer<H>(&self) -> GameFileWriter<H> {
        GameFileWriter {
            examples: Vec::new(),
            path: self.games_dir.join(format!("game_{}.gz", UuidB64::new())),
        }
    }

    pub fn games(&self) -> Result<impl Iterator<Item = PathBuf>> {
        let res = fs::read_dir(&self.games_dir)?
            .flatten()
            .filter(|p| p.file_type().is_ok_and(|t| t.is_file()))
            .map(|p| p.path());

        Ok(res)
    }

    pub fn read<H: DeserializeOwned>(path: &Path) -> Result<Vec<TrainingExample<H>>> {
        let file = File::open(path)?;
        let content = GzDecoder::new(file);
        let examples = serde_json::from_reader(content)?;
        Ok(examples)
    }
}

pub struct GameFileWriter<H> {
    examples: Vec<TrainingExample<H>>,
    path: PathBuf,
}

impl<H: Serialize> GameFileWriter<H> {
    pub fn finish(self) -> Result<PathBuf> {
        let file = File::create(&self.path)?;
        let compressor = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(compressor, &self.examples)?;

        Ok(self.path)
    }
}

impl<H: Clone> TrainingDataWriter<H> for GameFileWriter<H> {
    fn write(&mut self, example: &TrainingExample<H>) -> Result<()> {
        self.examples.push(example.clone());
        Ok(())
    }
}
