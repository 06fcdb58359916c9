pub mod scon_data;
pub mod shared_types;
pub mod error;
pub mod runtime;
pub mod adapters;
pub mod config;
pub mod import_settings;
pub mod instance;

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use crate::error::LoadError;
    use crate::runtime::data::{FileKind, SpriterData};
    use crate::scon_data::RawSpriterData;

    fn knight() -> Value {
        serde_json::from_slice(include_bytes!("test_assets/knight.scon")).unwrap()
    }

    fn load(document: &Value) -> Result<SpriterData, LoadError> {
        SpriterData::load(&serde_json::to_vec(document).unwrap())
    }

    #[test]
    fn test_deserialization_of_knight_file() {
        let raw = RawSpriterData::parse(include_bytes!("test_assets/knight.scon")).unwrap();
        assert_eq!(raw.entities.len(), 1);
        assert_eq!(raw.entities[0].animations.len(), 3);
        assert!(!raw.entities[0].animations[1].looping);
        assert!(raw.entities[0].animations[0].looping);

        let data = SpriterData::from_raw(&raw).unwrap();
        let entity = data.entity_by_name("knight").unwrap();
        assert_eq!(entity.animation_names().collect::<Vec<_>>(), vec!["walk", "attack", "Idle"]);
        assert_eq!(data.tags, vec!["attacking".to_string()]);
        assert_eq!(data.file_entries().filter(|it| it.kind == FileKind::Sound).count(), 2);
        let body = data.file(crate::shared_types::FileRef::new(0, 0)).unwrap();
        assert_eq!(body.pivot_y, 0.0);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(SpriterData::load(b"{ \"entity\": [ }"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_cyclic_hierarchy_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["mainline"]["key"][0]["bone_ref"][0]["parent"] = json!(1);
        assert!(matches!(
            load(&document),
            Err(LoadError::CyclicHierarchy { key: 0, .. })
        ));
    }

    #[test]
    fn test_dangling_parent_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["mainline"]["key"][0]["object_ref"][0]["parent"] = json!(7);
        assert!(matches!(load(&document), Err(LoadError::MissingParent { parent: 7, .. })));
    }

    #[test]
    fn test_unsorted_keys_are_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["timeline"][0]["key"][1]["time"] = json!(0);
        assert!(matches!(load(&document), Err(LoadError::NonMonotonicKeys { .. })));
    }

    #[test]
    fn test_unknown_curve_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][2]["timeline"][0]["key"][0]["curve_type"] = json!("wobbly");
        match load(&document) {
            Err(LoadError::UnknownCurve(name)) => assert_eq!(name, "wobbly"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["timeline"][2]["key"][0]["object"]["file"] = json!(9);
        assert!(matches!(load(&document), Err(LoadError::MissingFile { folder: 0, file: 9 })));
    }

    #[test]
    fn test_unsupported_object_type_is_rejected() {
        let mut document = knight();
        document["entity"][0]["obj_info"][1]["type"] = json!("mesh");
        assert!(matches!(load(&document), Err(LoadError::UnsupportedObjectType(_))));
    }

    #[test]
    fn test_unsorted_mainline_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][1]["mainline"]["key"][1]["time"] = json!(0);
        match load(&document) {
            Err(LoadError::NonMonotonicMainline { animation }) => assert_eq!(animation, "attack"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_timeline_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["timeline"][1]["key"] = json!([]);
        match load(&document) {
            Err(LoadError::EmptyTimeline { animation, timeline }) => {
                assert_eq!(animation, "walk");
                assert_eq!(timeline, "arm");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_timeline_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["mainline"]["key"][0]["bone_ref"][0]["timeline"] = json!(42);
        assert!(matches!(load(&document), Err(LoadError::MissingTimeline { timeline: 42, .. })));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][0]["meta"]["tagline"]["key"][0]["tag"][0]["t"] = json!(5);
        assert!(matches!(load(&document), Err(LoadError::UnknownTag(5))));
    }

    #[test]
    fn test_negative_length_is_rejected() {
        let mut document = knight();
        document["entity"][0]["animation"][2]["length"] = json!(-1);
        match load(&document) {
            Err(LoadError::InvalidLength { animation, length }) => {
                assert_eq!(animation, "Idle");
                assert_eq!(length, -1.0);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
