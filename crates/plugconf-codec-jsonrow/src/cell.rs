use std::fmt;

use bytes::Bytes;

use crate::error::RowSerializeError;

/// 单元格中的字段，用于诊断信息。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellField {
    /// 列族。
    Family,
    /// 列限定符。
    Qualifier,
    /// 值。
    Value,
}

impl fmt::Display for CellField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Family => "family",
            Self::Qualifier => "qualifier",
            Self::Value => "value",
        })
    }
}

/// 底层字节数组中的一段 `[offset, offset + length)`。
///
/// 扫描结果通常共享同一块大数组，每个字段只记录自己的偏移与长度；`Bytes` 让共享零拷贝。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CellSlice {
    array: Bytes,
    offset: usize,
    length: usize,
}

impl CellSlice {
    /// 以偏移与长度描述数组中的一段；越界在读取时报告。
    pub fn new(array: impl Into<Bytes>, offset: usize, length: usize) -> Self {
        Self {
            array: array.into(),
            offset,
            length,
        }
    }

    /// 覆盖整个数组的切片。
    pub fn whole(array: impl Into<Bytes>) -> Self {
        let array = array.into();
        let length = array.len();
        Self {
            array,
            offset: 0,
            length,
        }
    }

    /// 读取切片内容，越界时返回 [`RowSerializeError::SliceOutOfBounds`]。
    pub fn bytes(&self, field: CellField) -> Result<&[u8], RowSerializeError> {
        self.offset
            .checked_add(self.length)
            .and_then(|end| self.array.get(self.offset..end))
            .ok_or(RowSerializeError::SliceOutOfBounds {
                field,
                offset: self.offset,
                length: self.length,
                available: self.array.len(),
            })
    }
}

/// 宽表扫描得到的一个单元格。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultCell {
    family: CellSlice,
    qualifier: CellSlice,
    value: CellSlice,
    timestamp: i64,
}

impl ResultCell {
    /// 以三个完整数组构造单元格。
    pub fn new(
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
        timestamp: i64,
    ) -> Self {
        Self {
            family: CellSlice::whole(family),
            qualifier: CellSlice::whole(qualifier),
            value: CellSlice::whole(value),
            timestamp,
        }
    }

    /// 以显式切片构造单元格。
    pub fn from_slices(
        family: CellSlice,
        qualifier: CellSlice,
        value: CellSlice,
        timestamp: i64,
    ) -> Self {
        Self {
            family,
            qualifier,
            value,
            timestamp,
        }
    }

    /// 列族字节。
    pub fn family(&self) -> Result<&[u8], RowSerializeError> {
        self.family.bytes(CellField::Family)
    }

    /// 列限定符字节。
    pub fn qualifier(&self) -> Result<&[u8], RowSerializeError> {
        self.qualifier.bytes(CellField::Qualifier)
    }

    /// 值字节。
    pub fn value(&self) -> Result<&[u8], RowSerializeError> {
        self.value.bytes(CellField::Value)
    }

    /// 单元格时间戳（毫秒）。
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_share_backing_array() {
        let shared = Bytes::from_static(b"famqualval");
        let cell = ResultCell::from_slices(
            CellSlice::new(shared.clone(), 0, 3),
            CellSlice::new(shared.clone(), 3, 4),
            CellSlice::new(shared, 7, 3),
            42,
        );
        assert_eq!(cell.family().unwrap(), b"fam");
        assert_eq!(cell.qualifier().unwrap(), b"qual");
        assert_eq!(cell.value().unwrap(), b"val");
        assert_eq!(cell.timestamp(), 42);
    }

    #[test]
    fn out_of_range_slice_is_an_error() {
        let slice = CellSlice::new(Bytes::from_static(b"abc"), 2, 5);
        match slice.bytes(CellField::Value) {
            Err(RowSerializeError::SliceOutOfBounds {
                field,
                offset,
                length,
                available,
            }) => {
                assert_eq!((field, offset, length, available), (CellField::Value, 2, 5, 3));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let overflow = CellSlice::new(Bytes::from_static(b"abc"), usize::MAX, 2);
        assert!(overflow.bytes(CellField::Family).is_err());
    }
}
