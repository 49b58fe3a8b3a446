//! The game's fixed placement functions for prime resources and lost city
//! rumors. Both are keyed by the save's `prime`/`lcr` salt nibbles; every
//! constant here has to match the game exactly or the editor's overlays drift
//! from what the game will show.

const PRIME_PERIOD: usize = 64;
const RUMOR_PERIOD: usize = 128;
const SUPPRESSED_SHIFT: usize = 60;
const BAND_SHIFT: usize = 12;

/// Residues (mod 64) that carry a prime resource, by `row % 4`.
pub const PRIME_PATTERN: [[usize; 8]; 4] = [
    [0, 10, 17, 27, 34, 40, 51, 57],
    [4, 14, 21, 31, 38, 44, 55, 61],
    [2, 8, 19, 25, 32, 42, 49, 59],
    [6, 12, 23, 29, 36, 46, 53, 63],
];

/// Residues (mod 128) that carry a rumor, by `row % 4`.
pub const RUMOR_PATTERN: [[usize; 4]; 4] = [
    [2, 19, 96, 113],
    [36, 53, 70, 87],
    [10, 27, 104, 121],
    [44, 61, 78, 95],
];

fn band_offset(row: usize) -> usize {
    (row / 4) * BAND_SHIFT
}

fn prime_residue(row: usize, col: usize, prime: u8) -> usize {
    col + 4 * prime as usize + band_offset(row)
}

pub fn matches_prime(row: usize, col: usize, prime: u8) -> bool {
    PRIME_PATTERN[row % 4].contains(&(prime_residue(row, col, prime) % PRIME_PERIOD))
}

/// The secondary prime slot the game suppresses: forest resources on open
/// land, or the highlight shown where one could appear.
pub fn matches_suppressed_prime(row: usize, col: usize, prime: u8) -> bool {
    PRIME_PATTERN[row % 4]
        .contains(&((prime_residue(row, col, prime) + SUPPRESSED_SHIFT) % PRIME_PERIOD))
}

pub fn matches_rumor(row: usize, col: usize, lcr: u8, prime: u8) -> bool {
    let residue = col + 64 * lcr as usize + 68 * prime as usize + band_offset(row);
    RUMOR_PATTERN[row % 4].contains(&(residue % RUMOR_PERIOD))
}
