//! Zobrist key tables.
//!
//! The keys are derived from a fixed-seed xorshift32 stream, so every
//! engine instance hashes identically and test runs are reproducible.
//! Only the 64 playable squares ever receive keys; the guard ring is
//! never hashed.

use once_cell::sync::OnceCell;

use crate::board::tables::REAL_SQUARES;

const SEED: u32 = 1_804_289_383;

pub struct ZobristKeys {
    /// Indexed by piece code (`color * 6 + kind`) and mailbox square.
    pub pieces: [[u64; 120]; 12],
    /// Indexed by the en-passant target square.
    pub en_passant: [u64; 120],
    /// Indexed by the 4-bit castling rights mask.
    pub castling: [u64; 16],
    /// XOR-ed in when black is to move.
    pub side: u64,
}

struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// 64-bit key assembled from four 16-bit draws.
    fn next_u64(&mut self) -> u64 {
        let a = u64::from(self.next_u32() & 0xFFFF);
        let b = u64::from(self.next_u32() & 0xFFFF);
        let c = u64::from(self.next_u32() & 0xFFFF);
        let d = u64::from(self.next_u32() & 0xFFFF);
        a | (b << 16) | (c << 32) | (d << 48)
    }
}

pub(crate) fn generate(seed: u32) -> ZobristKeys {
    let mut rng = XorShift32 { state: seed };

    let mut keys = ZobristKeys {
        pieces: [[0; 120]; 12],
        en_passant: [0; 120],
        castling: [0; 16],
        side: 0,
    };

    for piece in 0..12 {
        for &sq in &REAL_SQUARES {
            keys.pieces[piece][sq] = rng.next_u64();
        }
    }

    for &sq in &REAL_SQUARES {
        keys.en_passant[sq] = rng.next_u64();
    }

    for rights in 0..16 {
        keys.castling[rights] = rng.next_u64();
    }

    keys.side = rng.next_u64();

    keys
}

/// Process-wide key tables, generated on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate(SEED))
}
