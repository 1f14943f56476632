//! JSON Form UI
//!
//! SettingsUi 的 HTTP 实现：一次请求绘制一帧，控件序列化为 JSON，
//! 请求中携带的交互在对应控件上回放

use serde::{Deserialize, Serialize};

use crate::application::SettingsUi;

/// 一个已声明的控件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormWidget {
    Combo {
        id: String,
        label: String,
        selected: Option<usize>,
        options: Vec<String>,
    },
    Password {
        id: String,
        hint: String,
        /// 不回显内容，只表示是否已填写
        filled: bool,
    },
    Button {
        id: String,
        label: String,
    },
    Checkbox {
        id: String,
        label: String,
        checked: bool,
    },
    Hint {
        text: String,
    },
    Warning {
        text: String,
    },
}

/// 用户在某个控件上的交互
///
/// - combo: `{"widget": "engine", "select": 1}`
/// - password: `{"widget": "access_key", "text": "..."}`
/// - button: `{"widget": "save_credentials"}`
/// - checkbox: `{"widget": "use_gendered_voices", "checked": true}`
#[derive(Debug, Clone, Deserialize)]
pub struct FormInput {
    pub widget: String,
    #[serde(default)]
    pub select: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
}

/// 一帧的绘制结果
#[derive(Debug, Clone, Serialize)]
pub struct RenderedForm {
    pub widgets: Vec<FormWidget>,
    /// 请求中的交互是否命中了某个控件
    pub applied: bool,
}

/// JSON 表单
#[derive(Debug, Default)]
pub struct JsonFormUi {
    input: Option<FormInput>,
    widgets: Vec<FormWidget>,
    applied: bool,
}

impl JsonFormUi {
    pub fn new(input: Option<FormInput>) -> Self {
        Self {
            input,
            widgets: Vec::new(),
            applied: false,
        }
    }

    /// 取出命中该控件的交互，每帧最多命中一次
    fn take_input(&mut self, id: &str) -> Option<FormInput> {
        if self.applied {
            return None;
        }
        match &self.input {
            Some(input) if input.widget == id => {
                self.applied = true;
                self.input.take()
            }
            _ => None,
        }
    }

    pub fn finish(self) -> RenderedForm {
        RenderedForm {
            widgets: self.widgets,
            applied: self.applied,
        }
    }
}

impl SettingsUi for JsonFormUi {
    fn combo(
        &mut self,
        id: &str,
        label: &str,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize> {
        let picked = self
            .take_input(id)
            .and_then(|input| input.select)
            .filter(|index| *index < options.len());

        self.widgets.push(FormWidget::Combo {
            id: id.to_string(),
            label: label.to_string(),
            selected: picked.or(selected),
            options: options.to_vec(),
        });
        picked
    }

    fn password_input(&mut self, id: &str, hint: &str, value: &mut String) -> bool {
        let changed = match self.take_input(id).and_then(|input| input.text) {
            Some(text) => {
                *value = text;
                true
            }
            None => false,
        };

        self.widgets.push(FormWidget::Password {
            id: id.to_string(),
            hint: hint.to_string(),
            filled: !value.is_empty(),
        });
        changed
    }

    fn button(&mut self, id: &str, label: &str) -> bool {
        let clicked = self.take_input(id).is_some();
        self.widgets.push(FormWidget::Button {
            id: id.to_string(),
            label: label.to_string(),
        });
        clicked
    }

    fn checkbox(&mut self, id: &str, label: &str, value: &mut bool) -> bool {
        let changed = match self.take_input(id).and_then(|input| input.checked) {
            Some(checked) if checked != *value => {
                *value = checked;
                true
            }
            _ => false,
        };

        self.widgets.push(FormWidget::Checkbox {
            id: id.to_string(),
            label: label.to_string(),
            checked: *value,
        });
        changed
    }

    fn hint(&mut self, text: &str) {
        self.widgets.push(FormWidget::Hint {
            text: text.to_string(),
        });
    }

    fn warning(&mut self, text: &str) {
        self.widgets.push(FormWidget::Warning {
            text: text.to_string(),
        });
    }
}
