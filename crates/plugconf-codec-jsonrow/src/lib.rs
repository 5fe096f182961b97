#![warn(missing_docs)]

//! `plugconf-codec-jsonrow` 将宽表扫描得到的一行单元格序列化为 JSON 对象。
//!
//! # 教案背景（Why）
//! - 数据接入组件在扫描宽表后需要把一行结果以文本形式交给下游；最常见的形态是
//!   “列限定符 → 值” 的扁平 JSON 对象；
//! - 源数据是任意字节，既可能是某种字符集的文本，也可能是二进制，因此支持按字符集解码，
//!   或对限定符与值整体做 base64。
//!
//! # 使用概览（How）
//! - 构造 [`ResultCell`] 序列，实例化 [`JsonQualifierAndValueRowSerializer`]，调用
//!   [`RowSerializer::serialize`] 写入任意 `std::io::Write`。
//!
//! # 合约说明（What）
//! - 输出形如 `{"q1":"v1", "q2":"v2"}`：键值对按单元格顺序排列，以 `", "` 分隔；
//! - 列族、行键与时间戳不会出现在输出中；
//! - 字符串按 JSON 规则转义，最终文本以输出字符集编码后写出。
//!
//! # 风险提示（Trade-offs）
//! - 重复的限定符会原样输出为重复键，是否去重由下游 JSON 解析器决定；
//! - 输出字符集只接受“编码即自身”的字符集：UTF-16 系列与 `replacement` 在构造时即被拒绝。

mod cell;
mod error;
mod json;

pub use crate::cell::{CellField, CellSlice, ResultCell};
pub use crate::error::RowSerializeError;
pub use crate::json::JsonQualifierAndValueRowSerializer;

/// 行序列化契约。
pub trait RowSerializer {
    /// 把一行单元格写入 `out`。
    ///
    /// - `row_key`：行键原始字节，具体实现可以选择是否输出；
    /// - `cells`：按输出顺序排列的单元格。
    fn serialize(
        &self,
        row_key: &[u8],
        cells: &[ResultCell],
        out: &mut dyn std::io::Write,
    ) -> Result<(), RowSerializeError>;
}
