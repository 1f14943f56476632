//! Settings Form - 设置表单
//!
//! 每个用户操作对应一个 `SettingsEdit`，应用后立即持久化。
//! `render_settings` 是即时模式的绘制入口，`settings_view` 给非即时模式的宿主使用

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{AccessKeys, SettingsUi};
use crate::domain::{
    is_known_region, validate_voice, Engine, PollySettings, VoiceEntry, VoiceError, VoiceWarning,
    REGIONS,
};

use super::PollyBackend;

const CREDENTIALS_HINT: &str = "Credentials secured with the system credential manager";

/// 音色槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSlot {
    Default,
    Male,
    Female,
}

/// 一次设置修改
#[derive(Debug, Clone)]
pub enum SettingsEdit {
    SetRegion(String),
    SetAccessKey(String),
    SetSecretKey(String),
    /// 把缓冲中的凭据写入凭据存储并重建客户端
    SaveCredentials,
    SetEngine(Engine),
    SetVoice { slot: VoiceSlot, voice_id: String },
    SetUseGenderedVoicePresets(bool),
}

/// 三个音色槽位的校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoiceWarnings {
    pub voice: Option<VoiceWarning>,
    pub voice_male: Option<VoiceWarning>,
    pub voice_female: Option<VoiceWarning>,
}

impl VoiceWarnings {
    pub fn is_empty(&self) -> bool {
        self.voice.is_none() && self.voice_male.is_none() && self.voice_female.is_none()
    }
}

/// 设置快照
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub settings: PollySettings,
    pub regions: Vec<String>,
    pub engines: Vec<Engine>,
    pub voices: Vec<VoiceEntry>,
    pub has_client: bool,
    pub warnings: VoiceWarnings,
    pub last_error: Option<String>,
}

impl PollyBackend {
    /// 绘制一帧设置表单，用户的修改在同一帧内生效
    pub async fn render_settings(&mut self, ui: &mut dyn SettingsUi) {
        let regions: Vec<String> = REGIONS.iter().map(|r| r.to_string()).collect();
        let region_index = regions.iter().position(|r| *r == self.settings.region);
        if let Some(region) = ui
            .combo("region", "Region", region_index, &regions)
            .and_then(|index| regions.get(index))
        {
            self.apply_logged(SettingsEdit::SetRegion(region.clone()))
                .await;
        }

        ui.password_input("access_key", "Access key", &mut self.access_key_input);
        ui.password_input("secret_key", "Secret key", &mut self.secret_key_input);

        if ui.button("save_credentials", "Save") {
            self.apply_logged(SettingsEdit::SaveCredentials).await;
        }

        ui.hint(CREDENTIALS_HINT);

        let engines: Vec<String> = Engine::ALL.iter().map(|e| e.as_str().to_string()).collect();
        if let Some(engine) = ui
            .combo("engine", "Engine", Some(self.settings.engine.index()), &engines)
            .and_then(|index| Engine::ALL.get(index).copied())
        {
            self.apply_logged(SettingsEdit::SetEngine(engine)).await;
        }

        self.draw_voice_combo(ui, VoiceSlot::Default).await;

        let mut use_gendered = self.settings.use_gendered_voice_presets;
        if ui.checkbox("use_gendered_voices", "Use gendered voices", &mut use_gendered) {
            self.apply_logged(SettingsEdit::SetUseGenderedVoicePresets(use_gendered))
                .await;
        }

        if use_gendered {
            self.draw_voice_combo(ui, VoiceSlot::Male).await;
            self.draw_voice_combo(ui, VoiceSlot::Female).await;
        }

        if let Some(error) = &self.last_error {
            ui.warning(error);
        }
    }

    async fn draw_voice_combo(&mut self, ui: &mut dyn SettingsUi, slot: VoiceSlot) {
        let (id, label) = match slot {
            VoiceSlot::Default => ("voice", "Voice"),
            VoiceSlot::Male => ("voice_male", "Male voice"),
            VoiceSlot::Female => ("voice_female", "Female voice"),
        };

        let names = self.voices.names();
        let selected = self.voices.index_of(self.slot_voice(slot));
        if let Some(index) = ui.combo(id, label, selected, &names) {
            if let Some(entry) = self.voices.get(index) {
                let voice_id = entry.id.clone();
                self.apply_logged(SettingsEdit::SetVoice { slot, voice_id })
                    .await;
            }
        }

        if let Some(warning) = validate_voice(&self.voices, self.slot_voice(slot)) {
            ui.warning(&warning.message);
        }
    }

    /// 应用一次修改，失败时记录错误而不是向上传播
    async fn apply_logged(&mut self, edit: SettingsEdit) {
        if let Err(e) = self.apply_edit(edit).await {
            self.report("settings", &e);
        }
    }

    /// 应用一次设置修改
    pub async fn apply_edit(&mut self, edit: SettingsEdit) -> Result<(), ApplicationError> {
        match edit {
            SettingsEdit::SetRegion(region) => {
                if !is_known_region(&region) {
                    return Err(VoiceError::UnknownRegion(region).into());
                }
                if region == self.settings.region {
                    return Ok(());
                }
                self.switch_region(region)?;
                self.persist("region")?;

                if self.client.is_some() {
                    self.reload_voices().await?;
                }
            }
            SettingsEdit::SetAccessKey(value) => {
                self.access_key_input = value;
            }
            SettingsEdit::SetSecretKey(value) => {
                self.secret_key_input = value;
            }
            SettingsEdit::SaveCredentials => {
                self.save_credentials().await?;
            }
            SettingsEdit::SetEngine(engine) => {
                self.settings.engine = engine;
                self.persist("engine")?;
                if self.client.is_some() {
                    self.reload_voices().await?;
                } else {
                    self.voices.clear();
                }
            }
            SettingsEdit::SetVoice { slot, voice_id } => {
                if !self.voices.contains(&voice_id) {
                    return Err(ApplicationError::validation(format!(
                        "Voice {} is not available on engine {}",
                        voice_id, self.settings.engine
                    )));
                }
                match slot {
                    VoiceSlot::Default => self.settings.voice = voice_id,
                    VoiceSlot::Male => self.settings.voice_male = voice_id,
                    VoiceSlot::Female => self.settings.voice_female = voice_id,
                }
                self.persist("voice")?;
            }
            SettingsEdit::SetUseGenderedVoicePresets(enabled) => {
                self.settings.use_gendered_voice_presets = enabled;
                self.persist("use_gendered_voice_presets")?;
            }
        }

        self.last_error = None;
        Ok(())
    }

    /// 当前音色列表下各槽位的校验结果
    ///
    /// 性别槽位只在启用性别预设时校验
    pub fn voice_warnings(&self) -> VoiceWarnings {
        let gendered = self.settings.use_gendered_voice_presets;
        VoiceWarnings {
            voice: validate_voice(&self.voices, &self.settings.voice),
            voice_male: gendered
                .then(|| validate_voice(&self.voices, &self.settings.voice_male))
                .flatten(),
            voice_female: gendered
                .then(|| validate_voice(&self.voices, &self.settings.voice_female))
                .flatten(),
        }
    }

    pub fn settings_view(&self) -> SettingsView {
        SettingsView {
            settings: self.settings.clone(),
            regions: REGIONS.iter().map(|r| r.to_string()).collect(),
            engines: Engine::ALL.to_vec(),
            voices: self.voices.entries().to_vec(),
            has_client: self.client.is_some(),
            warnings: self.voice_warnings(),
            last_error: self.last_error.clone(),
        }
    }

    fn slot_voice(&self, slot: VoiceSlot) -> &str {
        match slot {
            VoiceSlot::Default => &self.settings.voice,
            VoiceSlot::Male => &self.settings.voice_male,
            VoiceSlot::Female => &self.settings.voice_female,
        }
    }

    fn persist(&self, field: &str) -> Result<(), ApplicationError> {
        self.ports.settings_store.save(&self.settings)?;
        tracing::info!(field = field, "Settings saved");
        Ok(())
    }

    async fn save_credentials(&mut self) -> Result<(), ApplicationError> {
        if self.access_key_input.is_empty() || self.secret_key_input.is_empty() {
            return Err(ApplicationError::validation(
                "Access key and secret key are required",
            ));
        }

        let keys = AccessKeys::new(self.access_key_input.clone(), self.secret_key_input.clone());
        self.ports
            .secret_store
            .save(&self.options.credentials_target, &keys)?;
        tracing::info!(
            target_name = %self.options.credentials_target,
            "Polly credentials saved"
        );
        self.ports.event_publisher.publish_credentials_saved();

        self.connect(&keys)?;
        self.reload_voices().await?;
        Ok(())
    }
}
