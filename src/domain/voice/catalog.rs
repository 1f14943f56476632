//! Voice Catalog - 当前引擎可用的音色列表

use serde::Serialize;

use super::{Engine, VoiceEntry, DEFAULT_VOICE_ID};

/// 音色列表
///
/// 不变量:
/// - 列表只对应 `engine` 一个引擎，切换引擎时整体替换，不保留旧条目
/// - 顺序与服务端返回顺序一致
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    engine: Option<Engine>,
    entries: Vec<VoiceEntry>,
}

impl VoiceCatalog {
    pub fn new(engine: Engine, entries: Vec<VoiceEntry>) -> Self {
        Self {
            engine: Some(engine),
            entries,
        }
    }

    /// 空列表（没有凭据或拉取失败时）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 整体替换为另一个引擎的列表
    pub fn replace(&mut self, engine: Engine, entries: Vec<VoiceEntry>) {
        self.engine = Some(engine);
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.engine = None;
        self.entries.clear();
    }

    pub fn engine(&self) -> Option<Engine> {
        self.engine
    }

    pub fn entries(&self) -> &[VoiceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|v| v.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|v| v.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&VoiceEntry> {
        self.entries.get(index)
    }

    /// 选择器显示用的名称
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|v| v.name.clone()).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|v| v.id.clone()).collect()
    }

    /// 解析音色标识，不在列表中时退回内置默认音色
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        if self.contains(id) {
            id
        } else {
            DEFAULT_VOICE_ID
        }
    }
}

/// 音色校验警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceWarning {
    pub voice_id: String,
    pub message: String,
}

/// 配置的音色不在当前列表中时返回警告
pub fn validate_voice(catalog: &VoiceCatalog, voice_id: &str) -> Option<VoiceWarning> {
    if catalog.contains(voice_id) {
        None
    } else {
        Some(VoiceWarning {
            voice_id: voice_id.to_string(),
            message: "Voice not supported on this engine".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neural() -> VoiceCatalog {
        VoiceCatalog::new(
            Engine::Neural,
            vec![
                VoiceEntry::new("Joanna", "Joanna"),
                VoiceEntry::new("Matthew", "Matthew"),
            ],
        )
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let catalog = neural();
        assert_eq!(catalog.resolve("Joanna"), "Joanna");
        assert_eq!(catalog.resolve("Hans"), DEFAULT_VOICE_ID);
        assert_eq!(VoiceCatalog::empty().resolve("Joanna"), DEFAULT_VOICE_ID);
    }

    #[test]
    fn test_replace_drops_previous_engine_entries() {
        let mut catalog = neural();
        catalog.replace(Engine::Standard, vec![VoiceEntry::new("Hans", "Hans")]);

        assert_eq!(catalog.engine(), Some(Engine::Standard));
        assert_eq!(catalog.ids(), vec!["Hans".to_string()]);
        assert!(!catalog.contains("Joanna"));
    }

    #[test]
    fn test_validate_voice_boundary() {
        let catalog = neural();
        assert!(validate_voice(&catalog, "Joanna").is_none());

        let warning = validate_voice(&catalog, "Hans").unwrap();
        assert_eq!(warning.voice_id, "Hans");
        assert_eq!(warning.message, "Voice not supported on this engine");
    }

    #[test]
    fn test_index_of() {
        let catalog = neural();
        assert_eq!(catalog.index_of("Matthew"), Some(1));
        assert_eq!(catalog.index_of("Hans"), None);
    }
}
