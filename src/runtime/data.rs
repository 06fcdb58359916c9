use crate::error::LoadError;
use crate::runtime::model::Entity;
use crate::scon_data::folder::{RawFile, RawFolder};
use crate::scon_data::RawSpriterData;
use crate::shared_types::FileRef;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Sound,
}

#[derive(Clone, Debug)]
pub struct FileEntry {
    pub file_ref: FileRef,
    pub name: String,
    pub kind: FileKind,
    pub width: f32,
    pub height: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

#[derive(Clone, Debug)]
pub struct Folder {
    pub id: usize,
    pub name: String,
    pub files: Vec<FileEntry>,
}

impl Folder {
    fn from_raw(source: &RawFolder) -> Self {
        Self {
            id: source.id,
            name: source.name.clone(),
            files: source.files.iter().map(|it| FileEntry::from_raw(source.id, it)).collect(),
        }
    }
}

impl FileEntry {
    fn from_raw(folder: usize, source: &RawFile) -> Self {
        Self {
            file_ref: FileRef::new(folder, source.id),
            name: source.name.clone(),
            kind: if source.file_type == "sound" { FileKind::Sound } else { FileKind::Image },
            width: source.width,
            height: source.height,
            pivot_x: source.pivot_x,
            pivot_y: source.pivot_y,
        }
    }
}

pub(crate) fn lookup_file(folders: &[Folder], file_ref: FileRef) -> Result<&FileEntry, LoadError> {
    folders.iter()
        .find(|folder| folder.id == file_ref.folder)
        .and_then(|folder| folder.files.iter().find(|file| file.file_ref.file == file_ref.file))
        .ok_or(LoadError::MissingFile { folder: file_ref.folder, file: file_ref.file })
}

/// Immutable playback data for a whole SCON document. Load it once and lend
/// `&Entity` to as many animators as needed.
#[derive(Clone, Debug)]
pub struct SpriterData {
    pub folders: Vec<Folder>,
    pub entities: Vec<Entity>,
    pub tags: Vec<String>,
}

impl SpriterData {
    pub fn load(scon_file_bytes: &[u8]) -> Result<Self, LoadError> {
        let raw = RawSpriterData::parse(scon_file_bytes)?;
        Self::from_raw(&raw)
    }

    pub fn from_raw(raw: &RawSpriterData) -> Result<Self, LoadError> {
        let folders: Vec<Folder> = raw.folders.iter().map(Folder::from_raw).collect();
        let mut entities = Vec::with_capacity(raw.entities.len());
        for (index, raw_entity) in raw.entities.iter().enumerate() {
            let entity = Entity::extract(raw_entity, index, &folders, &raw.tag_list)?;
            log::debug!(
                "loaded entity '{}' with {} animations, pools {:?}",
                entity.name,
                entity.animations.len(),
                entity.pool_sizes
            );
            entities.push(entity);
        }
        Ok(Self {
            folders,
            entities,
            tags: raw.tag_list.iter().map(|it| it.name.clone()).collect(),
        })
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|it| it.name == name)
    }

    pub fn file(&self, file_ref: FileRef) -> Option<&FileEntry> {
        lookup_file(&self.folders, file_ref).ok()
    }

    pub fn file_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.folders.iter().flat_map(|folder| folder.files.iter())
    }
}
