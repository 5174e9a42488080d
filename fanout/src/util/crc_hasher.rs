use crc::{Crc, CRC_64_ECMA_182};
use std::hash::Hasher;

const CRC_64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

/// A [`Hasher`] computing the CRC-64 of everything written to it.
///
/// Unlike the std `DefaultHasher` the result does not depend on a random seed, so the
/// same arguments select the same shard in every process. Integers are written
/// little-endian and `usize` as 8 bytes, so hosts of any endianness and pointer width
/// agree.
#[derive(Debug, Clone, Default)]
pub struct CrcHasher {
    bytes: Vec<u8>,
}

impl Hasher for CrcHasher {
    fn finish(&self) -> u64 {
        CRC_64.checksum(&self.bytes)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    fn write_i16(&mut self, i: i16) {
        self.write_u16(i as u16);
    }

    fn write_i32(&mut self, i: i32) {
        self.write_u32(i as u32);
    }

    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    fn write_i128(&mut self, i: i128) {
        self.write_u128(i as u128);
    }

    fn write_isize(&mut self, i: isize) {
        self.write_u64(i as i64 as u64);
    }
}

#[cfg(test)]
mod tests {
    use crate::util::CrcHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = CrcHasher::default();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn crc_of(bytes: &[u8]) -> u64 {
        let mut hasher = CrcHasher::default();
        hasher.write(bytes);
        hasher.finish()
    }

    #[test]
    fn test_same_input_same_hash() {
        let a = hash_of(&("get", "x"));
        let b = hash_of(&("get", "x"));
        assert_eq!(a, b);
        assert_ne!(a, hash_of(&("get", "y")));
    }

    #[test]
    fn test_crc_of_written_bytes() {
        let mut hasher = CrcHasher::default();
        hasher.write(b"1234");
        hasher.write(b"56789");
        // CRC-64/ECMA-182 check value
        assert_eq!(0x6c40df5f0b497347, hasher.finish());
    }

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(crc_of(&[1, 0, 0, 0]), hash_of(&1u32));
        assert_eq!(crc_of(&[0xfe, 0xff]), hash_of(&-2i16));
        assert_eq!(crc_of(&[7, 0, 0, 0, 0, 0, 0, 0]), hash_of(&7u64));
    }

    #[test]
    fn test_usize_is_eight_bytes() {
        assert_eq!(crc_of(&3u64.to_le_bytes()), hash_of(&3usize));
        assert_eq!(crc_of(&(-1i64).to_le_bytes()), hash_of(&-1isize));
    }

    #[test]
    fn test_empty() {
        let hasher = CrcHasher::default();
        assert_eq!(0, hasher.finish());
        let mut hasher = CrcHasher::default();
        ().hash(&mut hasher);
        assert_eq!(0, hasher.finish());
    }
}
