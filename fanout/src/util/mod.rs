mod crc_hasher;

pub use self::crc_hasher::CrcHasher;
