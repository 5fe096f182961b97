use std::borrow::Cow;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encoding_rs::{Encoding, UTF_8};
use tracing::trace;

use crate::RowSerializer;
use crate::cell::ResultCell;
use crate::error::RowSerializeError;

/// 以 “限定符 → 值” JSON 对象输出一行单元格。
///
/// # 教案式说明
/// - **意图（Why）**：下游只关心列名与取值，列族与时间戳属于存储细节；
/// - **逻辑（How）**：
///   1. 对每个单元格取出限定符与值的字节切片；
///   2. `base64` 开启时直接对原始字节做标准 base64，否则按 `decode_charset` 解码为文本
///      （非法字节替换为 U+FFFD）；
///   3. 以 JSON 字符串转义后拼成 `"q":"v"`，相邻对以 `", "` 连接并包在 `{}` 中；
///   4. 整段文本按 `encode_charset` 编码后一次性写出。
/// - **契约（What）**：任一单元格切片越界时不写出任何字节并返回错误。
#[derive(Clone, Copy, Debug)]
pub struct JsonQualifierAndValueRowSerializer {
    decode_charset: &'static Encoding,
    encode_charset: &'static Encoding,
    base64: bool,
}

impl JsonQualifierAndValueRowSerializer {
    /// 以解码/编码字符集构造，不做 base64。
    pub fn new(
        decode_charset: &'static Encoding,
        encode_charset: &'static Encoding,
    ) -> Result<Self, RowSerializeError> {
        Self::with_base64(decode_charset, encode_charset, false)
    }

    /// 显式指定是否对限定符与值做 base64。
    pub fn with_base64(
        decode_charset: &'static Encoding,
        encode_charset: &'static Encoding,
        base64: bool,
    ) -> Result<Self, RowSerializeError> {
        if encode_charset.output_encoding() != encode_charset {
            return Err(RowSerializeError::UnsupportedOutputCharset {
                charset: encode_charset.name(),
            });
        }
        Ok(Self {
            decode_charset,
            encode_charset,
            base64,
        })
    }

    /// 输入输出均为 UTF-8 的常用配置。
    pub fn utf8() -> Self {
        Self {
            decode_charset: UTF_8,
            encode_charset: UTF_8,
            base64: false,
        }
    }

    /// 是否对限定符与值做 base64。
    pub fn is_base64(&self) -> bool {
        self.base64
    }

    fn field_text<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        if self.base64 {
            Cow::Owned(STANDARD.encode(bytes))
        } else {
            let (text, _had_errors) = self.decode_charset.decode_without_bom_handling(bytes);
            text
        }
    }

    fn render(&self, cells: &[ResultCell]) -> Result<String, RowSerializeError> {
        let mut json = String::from("{");
        for (index, cell) in cells.iter().enumerate() {
            if index > 0 {
                json.push_str(", ");
            }
            let qualifier = self.field_text(cell.qualifier()?);
            let value = self.field_text(cell.value()?);
            json.push_str(&serde_json::to_string(&*qualifier)?);
            json.push(':');
            json.push_str(&serde_json::to_string(&*value)?);
        }
        json.push('}');
        Ok(json)
    }
}

impl RowSerializer for JsonQualifierAndValueRowSerializer {
    fn serialize(
        &self,
        _row_key: &[u8],
        cells: &[ResultCell],
        out: &mut dyn Write,
    ) -> Result<(), RowSerializeError> {
        let json = self.render(cells)?;
        let (encoded, _, unmappable) = self.encode_charset.encode(&json);
        if unmappable {
            return Err(RowSerializeError::Unmappable {
                charset: self.encode_charset.name(),
            });
        }
        out.write_all(&encoded)?;
        trace!(
            cells = cells.len(),
            bytes = encoded.len(),
            base64 = self.base64,
            "row serialized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_16LE, WINDOWS_1252};

    use super::*;

    #[test]
    fn utf16_output_is_rejected_up_front() {
        let err = JsonQualifierAndValueRowSerializer::new(UTF_8, UTF_16LE).unwrap_err();
        assert!(matches!(
            err,
            RowSerializeError::UnsupportedOutputCharset { charset: "UTF-16LE" }
        ));
    }

    #[test]
    fn latin1_source_is_decoded() {
        let serializer = JsonQualifierAndValueRowSerializer::new(WINDOWS_1252, UTF_8).unwrap();
        let cell = ResultCell::new(&b"f"[..], &b"caf\xe9"[..], &b"ok"[..], 0);
        let mut out = Vec::new();
        serializer.serialize(b"row", &[cell], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"café\":\"ok\"}");
    }

    #[test]
    fn unmappable_output_is_an_error() {
        let serializer = JsonQualifierAndValueRowSerializer::new(UTF_8, WINDOWS_1252).unwrap();
        let cell = ResultCell::new(&b"f"[..], "名".as_bytes(), &b"v"[..], 0);
        let mut out = Vec::new();
        let err = serializer.serialize(b"row", &[cell], &mut out).unwrap_err();
        assert!(matches!(err, RowSerializeError::Unmappable { .. }));
        assert!(out.is_empty());
    }
}
