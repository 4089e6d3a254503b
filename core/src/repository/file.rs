use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::data_dir;
use crate::error::EngineError;
use crate::repository::traits::{Record, Repository};

/// One pretty-printed JSON array per record type under the data directory.
pub struct FileRepository<T: Record> {
    file_path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Record> Clone for FileRepository<T> {
    fn clone(&self) -> Self {
        Self {
            file_path: self.file_path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> FileRepository<T> {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => data_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(T::FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<T>::new())?;
            writer.flush()?;
        }

        Ok(FileRepository {
            file_path: path,
            _record: PhantomData,
        })
    }

    fn read_records(&self) -> Result<Vec<T>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }

    fn write_records(&self, records: &[T]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    fn not_found(id: &Uuid) -> anyhow::Error {
        EngineError::NotFound(format!("{} {}", T::KIND, id)).into()
    }
}

impl<T: Record> Repository<T> for FileRepository<T> {
    // The write check and the write share one read of the file. Another
    // process writing between the two is not detected.
    fn create(&self, record: T) -> Result<T> {
        let mut records = self.read_records()?;
        if let Err(e) = record.check_write(&records) {
            warn!(kind = T::KIND, error = %e, "write rejected");
            return Err(e);
        }
        records.push(record.clone());
        self.write_records(&records)?;
        debug!(kind = T::KIND, id = %record.id(), "created");
        Ok(record)
    }

    fn get(&self, id: &Uuid) -> Result<T> {
        self.read_records()?
            .into_iter()
            .find(|r| r.id() == *id)
            .ok_or_else(|| Self::not_found(id))
    }

    fn list(&self) -> Result<Vec<T>> {
        self.read_records()
    }

    fn update(&self, record: &T) -> Result<()> {
        let mut records = self.read_records()?;
        let pos = records
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| Self::not_found(&record.id()))?;

        if let Err(e) = record.check_write(&records) {
            warn!(kind = T::KIND, error = %e, "write rejected");
            return Err(e);
        }
        records[pos] = record.clone();
        self.write_records(&records)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self.read_records()?;
        let initial_len = records.len();
        records.retain(|r| r.id() != *id);

        if records.len() == initial_len {
            return Err(Self::not_found(id));
        }

        self.write_records(&records)?;
        debug!(kind = T::KIND, %id, "deleted");
        Ok(())
    }
}
