/// フレーム上の読み取り位置。各デコーダはここから読み、成功したら次の層の先頭まで進める。
#[derive(Debug, Clone, Copy)]
pub struct FrameCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> FrameCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn frame_len(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// 現在位置から `len` バイトを覗き見る。足りなければ None。
    pub fn peek(&self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        self.data.get(self.offset..end)
    }

    /// `len` バイト進める。足りなければ位置は変えずに false を返す。
    pub fn advance(&mut self, len: usize) -> bool {
        if len > self.remaining() {
            return false;
        }
        self.offset += len;
        true
    }

    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.peek(N)?);
        self.offset += N;
        Some(out)
    }

    pub fn read_u16_be(&mut self) -> Option<u16> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }
}
