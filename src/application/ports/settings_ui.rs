//! Settings UI Port - 即时模式表单绘制
//!
//! 每帧声明控件，同一帧读回用户的修改；控件本身不保存状态

/// Settings UI Port
pub trait SettingsUi: Send {
    /// 下拉选择框，用户选择了新选项时返回其索引
    fn combo(
        &mut self,
        id: &str,
        label: &str,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize>;

    /// 密码输入框，内容被修改时返回 true
    fn password_input(&mut self, id: &str, hint: &str, value: &mut String) -> bool;

    /// 按钮，本帧被点击时返回 true
    fn button(&mut self, id: &str, label: &str) -> bool;

    /// 复选框，状态被切换时返回 true
    fn checkbox(&mut self, id: &str, label: &str, value: &mut bool) -> bool;

    /// 灰色提示文本
    fn hint(&mut self, text: &str);

    /// 红色警告文本
    fn warning(&mut self, text: &str);
}
