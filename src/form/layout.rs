/*!
 * 下载表单布局
 *
 * 机器人在上下文中附带布局提示（可选格式、认证方式、分页、图片、封面），
 * 页面据此决定渲染哪些字段以及默认值。
 */

use serde::Serialize;
use serde_json::Value;

use crate::context::PageContext;

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// 下载表单提供的字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadLayout {
    /// 是否提供 start/end 分页输入
    pub paging: bool,
    /// 认证方式下拉框，空表示不渲染
    pub auth_options: Vec<SelectOption>,
    /// 图片复选框，Some(默认勾选) 表示渲染
    pub images: Option<bool>,
    /// 封面复选框，Some(默认勾选) 表示渲染
    pub cover: Option<bool>,
    pub formats: Vec<String>,
    /// 预选格式，仅当它在可选格式内
    pub selected_format: Option<String>,
}

/// 复选框勾选时提交的值
pub const CHECKBOX_ON: &str = "on";

impl DownloadLayout {
    pub fn from_context(ctx: &PageContext) -> Self {
        let flag = |key: &str| ctx.bool_value(key).unwrap_or(false);

        let formats: Vec<String> = ctx
            .get("formats")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let selected_format = ctx
            .str_value("format")
            .filter(|format| formats.iter().any(|f| f.as_str() == *format))
            .map(str::to_string);

        let auth_options = ctx
            .get("use_auth")
            .and_then(Value::as_object)
            .map(|options| {
                options
                    .iter()
                    .map(|(value, label)| SelectOption {
                        value: value.clone(),
                        label: label.as_str().unwrap_or(value.as_str()).to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            paging: flag("use_paging"),
            auth_options,
            images: (flag("use_images") && !flag("force_images")).then(|| flag("images")),
            cover: flag("use_cover").then(|| flag("cover")),
            formats,
            selected_format,
        }
    }

    /// 页面初次渲染时表单里已有的字段
    ///
    /// 下拉框没有预选项时取第一个选项；未勾选的复选框不出现。
    /// 分页输入没有默认值，由用户填写。
    pub fn initial_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();

        if let Some(format) = self
            .selected_format
            .as_ref()
            .or_else(|| self.formats.first())
        {
            fields.push(("format".to_string(), format.clone()));
        }
        if let Some(option) = self.auth_options.first() {
            fields.push(("auth".to_string(), option.value.clone()));
        }
        if self.images == Some(true) {
            fields.push(("images".to_string(), CHECKBOX_ON.to_string()));
        }
        if self.cover == Some(true) {
            fields.push(("cover".to_string(), CHECKBOX_ON.to_string()));
        }

        fields
    }
}
