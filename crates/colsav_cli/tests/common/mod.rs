#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

pub const WIDTH: usize = 12;
pub const HEIGHT: usize = 8;
pub const HEADER_LEN: usize = 0x186;
pub const COLONY_LEN: usize = 0xCA;
pub const POWER_LEN: usize = 0x13C;
pub const VILLAGE_LEN: usize = 0x12;
pub const TRIBE_BLOCK_LEN: usize = 0x547;

pub fn terrain_start() -> usize {
    HEADER_LEN + COLONY_LEN + 4 * POWER_LEN + VILLAGE_LEN + TRIBE_BLOCK_LEN
}

pub fn map_size() -> usize {
    WIDTH * HEIGHT
}

pub fn sea_route_start() -> usize {
    terrain_start() + 4 * map_size()
}

pub fn prime_lcr_offset() -> usize {
    terrain_start() + 4 * map_size() + 0x264
}

/// 12x8 ocean with a 3x3 island at rows 2..5, cols 2..5 carrying one
/// French colony and an Aztec village. Tile (2, 4) is depleted land.
pub fn fixture() -> Vec<u8> {
    let size = map_size();
    let mut terrain = vec![25u8; size];
    let mut mask = vec![0u8; size];
    let mut path = vec![1u8; size];
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let i = row * WIDTH + col;
            if row == 0 || col == 0 || row + 1 == HEIGHT || col + 1 == WIDTH {
                path[i] = 0;
            }
            if (2..5).contains(&row) && (2..5).contains(&col) {
                terrain[i] = 3;
                path[i] = 2;
            }
        }
    }
    mask[2 * WIDTH + 4] = 0x04;

    let mut out = vec![0u8; HEADER_LEN];
    out[0x0C..0x0E].copy_from_slice(&(WIDTH as u16).to_le_bytes());
    out[0x0E..0x10].copy_from_slice(&(HEIGHT as u16).to_le_bytes());
    out[0x2A] = 1;
    out[0x2E] = 1;

    let mut colony = vec![0u8; COLONY_LEN];
    colony[0] = 3;
    colony[1] = 3;
    colony[2..9].copy_from_slice(b"Quebec\0");
    colony[0x1A] = 1;
    colony[0x1F] = 4;
    colony[0x84] = 0x03;
    out.extend_from_slice(&colony);

    out.resize(out.len() + 4 * POWER_LEN, 0);

    let mut village = vec![0u8; VILLAGE_LEN];
    village[0] = 2;
    village[1] = 4;
    village[2] = 5;
    village[5] = 0xFF;
    out.extend_from_slice(&village);
    out.resize(out.len() + TRIBE_BLOCK_LEN, 0);

    out.extend_from_slice(&terrain);
    out.extend_from_slice(&mask);
    out.extend_from_slice(&path);
    out.resize(prime_lcr_offset(), 0);
    out.push(0x00);
    out.extend_from_slice(&[0x5A, 0xA5]);
    out
}

pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{ext}",
        std::process::id(),
        nanos
    ))
}

/// Write the fixture to a fresh temp file and return its path.
pub fn fixture_path(prefix: &str) -> PathBuf {
    let path = temp_path(prefix, "SAV");
    std::fs::write(&path, fixture()).expect("failed to write fixture");
    path
}

pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_colsav-edit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run colsav-edit CLI")
}
