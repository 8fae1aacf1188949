//! Deterministic random number generation.
//!
//! The simulator and the tests are driven from a single seedable stream so
//! runs reproduce bit-for-bit. The tracker itself draws nothing.

/// Random number generator trait for deterministic simulation.
///
/// A minimal interface that can be implemented identically across ports,
/// enabling exact numerical equivalence between runs.
pub trait Rng {
    /// Generate the next u64 value
    fn next_u64(&mut self) -> u64;

    /// Generate a random f64 in [0, 1) with 53-bit precision
    fn uniform01(&mut self) -> f64 {
        let mant = self.next_u64() >> 11;
        mant as f64 * (1.0 / 9007199254740992.0) // 2^53
    }

    /// Generate a random f64 uniform on [lo, hi)
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.uniform01()
    }

    /// Generate a random f64 from the standard normal N(0, 1)
    /// using the Box-Muller transform
    fn normal01(&mut self) -> f64 {
        let mut u1 = self.uniform01();
        let u2 = self.uniform01();
        // Avoid log(0)
        if u1 < 1e-15 {
            u1 = 1e-15;
        }
        let r = (-2.0 * u1.ln()).sqrt();
        let th = 2.0 * std::f64::consts::PI * u2;
        r * th.cos()
    }

    /// Generate a random f64 from N(mean, stddev)
    fn normal(&mut self, mean: f64, stddev: f64) -> f64 {
        mean + stddev * self.normal01()
    }
}

/// Deterministic generator using xorshift64*.
///
/// Minimal, fast, and good enough quality for simulation. Identical seeds
/// produce identical streams on every platform.
pub struct Xorshift64Star {
    state: u64,
}

impl Xorshift64Star {
    /// Create a new generator with the given seed.
    /// A zero seed is replaced to avoid the degenerate all-zero state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }
}

impl Rng for Xorshift64Star {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(2685821657736338717)
    }
}

// Bridge to the rand ecosystem so the generator can drive rand_distr
// distributions in tests and benchmarks.
impl rand::RngCore for Xorshift64Star {
    fn next_u32(&mut self) -> u32 {
        Rng::next_u64(self) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        let len = dest.len();
        while i + 8 <= len {
            let bytes = Rng::next_u64(self).to_le_bytes();
            dest[i..i + 8].copy_from_slice(&bytes);
            i += 8;
        }
        if i < len {
            let bytes = Rng::next_u64(self).to_le_bytes();
            let remaining = len - i;
            dest[i..].copy_from_slice(&bytes[..remaining]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
