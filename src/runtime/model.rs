use indextree::Arena;
use nalgebra::{Rotation2, Vector2};
use crate::error::LoadError;
use crate::runtime::curve::Curve;
use crate::runtime::data::Folder;
use crate::scon_data::animation::{RawAnimation, RawMainlineKey, RawRef};
use crate::scon_data::entity::{RawEntity, RawObjectInfo};
use crate::scon_data::timeline::RawTimeline;
use crate::scon_data::RawTagDefinition;
use crate::shared_types::FileRef;

/// Position, rotation (degrees), scale, alpha and pivot of a bone or object.
/// Used both for local key data and for composed world-space output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialInfo {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub alpha: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub file: Option<FileRef>,
}

impl Default for SpatialInfo {
    fn default() -> Self {
        Self::identity()
    }
}

impl SpatialInfo {
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            alpha: 1.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            file: None,
        }
    }

    /// Concatenates this local transform with its parent's world transform.
    pub fn apply_parent(&self, parent: &SpatialInfo) -> SpatialInfo {
        let local = Vector2::new(self.x * parent.scale_x, self.y * parent.scale_y);
        let world = Rotation2::new(parent.angle.to_radians()) * local
            + Vector2::new(parent.x, parent.y);
        let flip = (parent.scale_x * parent.scale_y).signum();
        SpatialInfo {
            x: world.x,
            y: world.y,
            angle: parent.angle + flip * self.angle,
            scale_x: self.scale_x * parent.scale_x,
            scale_y: self.scale_y * parent.scale_y,
            alpha: self.alpha * parent.alpha,
            ..*self
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Bone,
    Sprite,
    Box,
    Point,
    /// Sub-entities, variables and similar tracks this runtime does not play.
    Skipped,
}

impl ObjectKind {
    fn parse(object_type: &str) -> Result<Self, LoadError> {
        match object_type {
            "bone" => Ok(ObjectKind::Bone),
            "sprite" => Ok(ObjectKind::Sprite),
            "box" => Ok(ObjectKind::Box),
            "point" => Ok(ObjectKind::Point),
            "entity" | "variable" | "sound" => Ok(ObjectKind::Skipped),
            other => Err(LoadError::UnsupportedObjectType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: ObjectKind,
    pub width: f32,
    pub height: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

#[derive(Copy, Clone, Debug)]
pub struct Keyframe {
    pub time: f32,
    pub curve: Curve,
    pub spin: i32,
    pub transform: SpatialInfo,
}

#[derive(Clone, Debug)]
pub struct Timeline {
    pub name: String,
    pub kind: ObjectKind,
    pub object_info: Option<usize>,
    pub keys: Vec<Keyframe>,
}

#[derive(Copy, Clone, Debug)]
pub struct BoneRef {
    pub parent: Option<usize>,
    pub timeline: usize,
}

#[derive(Copy, Clone, Debug)]
pub struct ObjectRef {
    pub parent: Option<usize>,
    pub timeline: usize,
    pub z_index: i32,
}

#[derive(Clone, Debug)]
pub struct MainlineKey {
    pub time: f32,
    pub curve: Curve,
    pub bone_refs: Vec<BoneRef>,
    /// Sorted by ascending z index.
    pub object_refs: Vec<ObjectRef>,
    /// Bone ref indices with every parent ahead of its children.
    pub bone_order: Vec<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SoundKey {
    pub time: f32,
    pub file: FileRef,
    pub volume: f32,
    pub panning: f32,
}

#[derive(Clone, Debug)]
pub struct Soundline {
    pub name: String,
    pub keys: Vec<SoundKey>,
}

#[derive(Clone, Debug)]
pub struct Eventline {
    pub name: String,
    pub times: Vec<f32>,
}

#[derive(Clone, Debug)]
pub struct TagKey {
    pub time: f32,
    pub tags: Vec<String>,
}

/// Largest number of entries of each kind a single frame can produce.
/// Adapters size their node pools from this.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolSizes {
    pub sprites: usize,
    pub boxes: usize,
    pub points: usize,
}

impl PoolSizes {
    pub fn max(self, other: PoolSizes) -> PoolSizes {
        PoolSizes {
            sprites: self.sprites.max(other.sprites),
            boxes: self.boxes.max(other.boxes),
            points: self.points.max(other.points),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Animation {
    pub name: String,
    pub length: f32,
    pub looping: bool,
    pub mainline: Vec<MainlineKey>,
    pub timelines: Vec<Timeline>,
    pub soundlines: Vec<Soundline>,
    pub eventlines: Vec<Eventline>,
    pub taglines: Vec<TagKey>,
    pub pool_sizes: PoolSizes,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub name: String,
    pub index: usize,
    pub object_infos: Vec<ObjectInfo>,
    pub animations: Vec<Animation>,
    pub pool_sizes: PoolSizes,
}

impl Entity {
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|it| it.name == name)
    }

    pub fn animation_id(&self, name: &str) -> Option<usize> {
        (0..self.animations.len()).find(|&id| self.animations[id].name == name)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|it| it.name.as_str())
    }

    pub(crate) fn extract(
        raw: &RawEntity,
        index: usize,
        folders: &[Folder],
        tag_list: &[RawTagDefinition],
    ) -> Result<Self, LoadError> {
        let object_infos = raw.obj_info
            .iter()
            .map(ObjectInfo::extract)
            .collect::<Result<Vec<_>, _>>()?;

        let mut animations = Vec::with_capacity(raw.animations.len());
        let mut pool_sizes = PoolSizes::default();
        for raw_animation in raw.animations.iter() {
            let animation = Animation::extract(raw_animation, &raw.name, &object_infos, folders, tag_list)?;
            pool_sizes = pool_sizes.max(animation.pool_sizes);
            animations.push(animation);
        }

        Ok(Self {
            name: raw.name.clone(),
            index,
            object_infos,
            animations,
            pool_sizes,
        })
    }
}

impl ObjectInfo {
    fn extract(raw: &RawObjectInfo) -> Result<Self, LoadError> {
        Ok(Self {
            name: raw.name.clone(),
            kind: ObjectKind::parse(&raw.object_type)?,
            width: raw.w,
            height: raw.h,
            pivot_x: raw.pivot_x,
            pivot_y: raw.pivot_y,
        })
    }
}

impl Animation {
    fn extract(
        raw: &RawAnimation,
        entity_name: &str,
        object_infos: &[ObjectInfo],
        folders: &[Folder],
        tag_list: &[RawTagDefinition],
    ) -> Result<Self, LoadError> {
        if !(raw.length >= 0.0) {
            return Err(LoadError::InvalidLength { animation: raw.name.clone(), length: raw.length });
        }

        let timelines = raw.timelines
            .iter()
            .map(|it| Timeline::extract(it, &raw.name, entity_name, object_infos, folders))
            .collect::<Result<Vec<_>, _>>()?;

        let mut mainline = Vec::with_capacity(raw.mainline.keys.len());
        for (key_id, raw_key) in raw.mainline.keys.iter().enumerate() {
            if let Some(previous) = mainline.last().map(|it: &MainlineKey| it.time) {
                if raw_key.time <= previous {
                    return Err(LoadError::NonMonotonicMainline { animation: raw.name.clone() });
                }
            }
            mainline.push(MainlineKey::extract(raw_key, key_id, &raw.name, &timelines)?);
        }

        let mut pool_sizes = PoolSizes::default();
        for key in mainline.iter() {
            let mut counts = PoolSizes::default();
            for object_ref in key.object_refs.iter() {
                match timelines[object_ref.timeline].kind {
                    ObjectKind::Sprite => counts.sprites += 1,
                    ObjectKind::Box => counts.boxes += 1,
                    ObjectKind::Point => counts.points += 1,
                    ObjectKind::Bone | ObjectKind::Skipped => {}
                }
            }
            pool_sizes = pool_sizes.max(counts);
        }

        let mut soundlines = Vec::with_capacity(raw.soundlines.len());
        for raw_soundline in raw.soundlines.iter() {
            let mut keys = Vec::with_capacity(raw_soundline.keys.len());
            for raw_key in raw_soundline.keys.iter() {
                let file = FileRef::new(raw_key.object.folder, raw_key.object.file);
                crate::runtime::data::lookup_file(folders, file)?;
                keys.push(SoundKey {
                    time: raw_key.time,
                    file,
                    volume: raw_key.object.volume,
                    panning: raw_key.object.panning,
                });
            }
            soundlines.push(Soundline { name: raw_soundline.name.clone(), keys });
        }

        let eventlines = raw.eventlines
            .iter()
            .map(|it| Eventline {
                name: it.name.clone(),
                times: it.keys.iter().map(|key| key.time).collect(),
            })
            .collect();

        let mut taglines = Vec::new();
        if let Some(tagline) = raw.meta.as_ref().and_then(|meta| meta.tagline.as_ref()) {
            for raw_key in tagline.keys.iter() {
                let tags = raw_key.tags
                    .iter()
                    .map(|tag| {
                        tag_list.iter()
                            .find(|def| def.id == tag.t)
                            .map(|def| def.name.clone())
                            .ok_or(LoadError::UnknownTag(tag.t))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                taglines.push(TagKey { time: raw_key.time, tags });
            }
            taglines.sort_by(|lhs, rhs| lhs.time.total_cmp(&rhs.time));
        }

        Ok(Self {
            name: raw.name.clone(),
            length: raw.length,
            looping: raw.looping,
            mainline,
            timelines,
            soundlines,
            eventlines,
            taglines,
            pool_sizes,
        })
    }
}

impl Timeline {
    fn extract(
        raw: &RawTimeline,
        animation_name: &str,
        entity_name: &str,
        object_infos: &[ObjectInfo],
        folders: &[Folder],
    ) -> Result<Self, LoadError> {
        let kind = ObjectKind::parse(&raw.object_type)?;
        if let Some(index) = raw.obj_info {
            if kind != ObjectKind::Skipped && index >= object_infos.len() {
                return Err(LoadError::MissingObjectInfo { entity: entity_name.to_string(), index });
            }
        }
        let object_info = raw.obj_info.and_then(|id| object_infos.get(id));

        if kind != ObjectKind::Skipped && raw.keys.is_empty() {
            return Err(LoadError::EmptyTimeline {
                animation: animation_name.to_string(),
                timeline: raw.name.clone(),
            });
        }

        let mut keys: Vec<Keyframe> = Vec::with_capacity(raw.keys.len());
        for raw_key in raw.keys.iter() {
            if let Some(previous) = keys.last() {
                if raw_key.time <= previous.time {
                    return Err(LoadError::NonMonotonicKeys {
                        animation: animation_name.to_string(),
                        timeline: raw.name.clone(),
                        previous: previous.time,
                        next: raw_key.time,
                    });
                }
            }
            let curve_values = [raw_key.c1, raw_key.c2, raw_key.c3, raw_key.c4];
            let curve = Curve::parse(&raw_key.curve_type, curve_values)
                .ok_or_else(|| LoadError::UnknownCurve(raw_key.curve_type.clone()))?;
            let spatial = raw_key.bone.or(raw_key.object).unwrap_or_default();

            let mut transform = SpatialInfo {
                x: spatial.x,
                y: spatial.y,
                angle: spatial.angle,
                scale_x: spatial.scale_x,
                scale_y: spatial.scale_y,
                alpha: spatial.alpha,
                pivot_x: 0.0,
                pivot_y: 0.0,
                file: None,
            };
            match kind {
                ObjectKind::Sprite => {
                    let file_ref = FileRef::new(spatial.folder.unwrap_or(0), spatial.file.unwrap_or(0));
                    let file = crate::runtime::data::lookup_file(folders, file_ref)?;
                    transform.file = Some(file_ref);
                    transform.pivot_x = spatial.pivot_x.unwrap_or(file.pivot_x);
                    transform.pivot_y = spatial.pivot_y.unwrap_or(file.pivot_y);
                }
                ObjectKind::Box => {
                    transform.pivot_x = spatial.pivot_x.or(object_info.map(|it| it.pivot_x)).unwrap_or(0.0);
                    transform.pivot_y = spatial.pivot_y.or(object_info.map(|it| it.pivot_y)).unwrap_or(0.0);
                }
                ObjectKind::Bone | ObjectKind::Point | ObjectKind::Skipped => {}
            }

            keys.push(Keyframe {
                time: raw_key.time,
                curve,
                spin: raw_key.spin.signum(),
                transform,
            });
        }

        Ok(Self {
            name: raw.name.clone(),
            kind,
            object_info: raw.obj_info,
            keys,
        })
    }
}

impl MainlineKey {
    fn extract(
        raw: &RawMainlineKey,
        key_id: usize,
        animation_name: &str,
        timelines: &[Timeline],
    ) -> Result<Self, LoadError> {
        let curve = Curve::parse(&raw.curve_type, [raw.c1, raw.c2, raw.c3, raw.c4])
            .ok_or_else(|| LoadError::UnknownCurve(raw.curve_type.clone()))?;

        let bone_count = raw.bone_ref.len();
        let resolve_ref = |raw_ref: &RawRef, reference: usize| -> Result<Option<usize>, LoadError> {
            if raw_ref.timeline >= timelines.len() {
                return Err(LoadError::MissingTimeline {
                    animation: animation_name.to_string(),
                    timeline: raw_ref.timeline,
                });
            }
            match raw_ref.parent {
                parent if parent < 0 => Ok(None),
                parent if (parent as usize) < bone_count => Ok(Some(parent as usize)),
                parent => Err(LoadError::MissingParent {
                    animation: animation_name.to_string(),
                    reference,
                    parent,
                }),
            }
        };

        let mut bone_refs = Vec::with_capacity(bone_count);
        for (reference, raw_ref) in raw.bone_ref.iter().enumerate() {
            bone_refs.push(BoneRef {
                parent: resolve_ref(raw_ref, reference)?,
                timeline: raw_ref.timeline,
            });
        }

        let mut object_refs = Vec::with_capacity(raw.object_ref.len());
        for (reference, raw_ref) in raw.object_ref.iter().enumerate() {
            object_refs.push(ObjectRef {
                parent: resolve_ref(raw_ref, reference)?,
                timeline: raw_ref.timeline,
                z_index: raw_ref.z_index,
            });
        }
        // Stable, so equal z indices keep document order.
        object_refs.sort_by_key(|it| it.z_index);

        let bone_order = hierarchy_order(&bone_refs).ok_or_else(|| LoadError::CyclicHierarchy {
            animation: animation_name.to_string(),
            key: key_id,
        })?;

        Ok(Self {
            time: raw.time,
            curve,
            bone_refs,
            object_refs,
            bone_order,
        })
    }
}

/// Orders bone refs so that parents come before their children. Returns `None`
/// when the parent links form a cycle.
fn hierarchy_order(bone_refs: &[BoneRef]) -> Option<Vec<usize>> {
    let mut bone_tree = Arena::new();
    let tree_handles: Vec<indextree::NodeId> = (0..bone_refs.len())
        .map(|id| bone_tree.new_node(id))
        .collect();
    for (id, bone_ref) in bone_refs.iter().enumerate() {
        if let Some(pid) = bone_ref.parent {
            tree_handles[pid].checked_append(tree_handles[id], &mut bone_tree).ok()?;
        }
    }

    let mut order = Vec::with_capacity(bone_refs.len());
    for (id, bone_ref) in bone_refs.iter().enumerate() {
        if bone_ref.parent.is_none() {
            for node_id in tree_handles[id].descendants(&bone_tree) {
                order.push(*bone_tree[node_id].get());
            }
        }
    }
    if order.len() == bone_refs.len() { Some(order) } else { None }
}
