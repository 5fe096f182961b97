use thiserror::Error;

use crate::cell::CellField;

/// 行序列化过程中的失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RowSerializeError {
    /// 写出目标返回 IO 错误。
    #[error("failed to write serialized row: {0}")]
    Io(#[from] std::io::Error),

    /// 单元格的偏移/长度越过底层字节数组。
    #[error("{field} slice [{offset}, +{length}) exceeds {available} available bytes")]
    SliceOutOfBounds {
        /// 出错的字段。
        field: CellField,
        /// 声明的起始偏移。
        offset: usize,
        /// 声明的长度。
        length: usize,
        /// 底层数组实际长度。
        available: usize,
    },

    /// 文本包含输出字符集无法表示的字符。
    #[error("text contains characters not representable in {charset}")]
    Unmappable {
        /// 输出字符集名称。
        charset: &'static str,
    },

    /// 输出字符集无法作为编码目标（例如 UTF-16 系列）。
    #[error("{charset} cannot be used as an output charset")]
    UnsupportedOutputCharset {
        /// 被拒绝的字符集名称。
        charset: &'static str,
    },

    /// JSON 字符串转义失败。
    #[error("failed to escape JSON string: {0}")]
    Json(#[from] serde_json::Error),
}
