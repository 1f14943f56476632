//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Gender;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Speech DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SayRequest {
    #[serde(default)]
    pub gender: Gender,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SayResponse {
    pub request_id: Uuid,
}
