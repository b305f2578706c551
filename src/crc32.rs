/// CRC-32 checksum (IEEE / gzip polynomial), stored in the container
/// header to verify restored payloads.
const POLY: u32 = 0xEDB8_8320;

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 == 1 { POLY ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

static TABLE: [u32; 256] = make_table();

/// Running CRC-32 over data fed in pieces.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self { state: !0 }
    }
}

impl Crc32 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.state = data.iter().fold(self.state, |crc, &b| {
            TABLE[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8)
        });
    }

    pub fn finalize(&self) -> u32 {
        !self.state
    }
}

/// CRC-32 of a complete buffer.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = Crc32::new();
    c.update(data);
    c.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_split_updates_match_one_shot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut c = Crc32::new();
        for chunk in data.chunks(5) {
            c.update(chunk);
        }
        assert_eq!(c.finalize(), crc32(data));
        assert_eq!(c.finalize(), 0x414F_A339);
    }
}
