#![allow(dead_code)]

//! In-memory `.SAV` assembly for tests. Everything not set explicitly is
//! zero, which the decoder accepts.

pub const OCEAN: u8 = 25;
pub const SEA_LANE: u8 = 26;
pub const GRASSLAND: u8 = 4;
pub const PLAINS: u8 = 2;

const HEADER_LEN: usize = 0x186;
const COLONY_LEN: usize = 0xCA;
const UNIT_LEN: usize = 0x1C;
const POWER_LEN: usize = 0x13C;
const VILLAGE_LEN: usize = 0x12;
const TRIBE_BLOCK_LEN: usize = 0x547;
const PRIME_LCR_DISTANCE: usize = 0x264;

#[derive(Debug, Clone)]
pub struct SaveBuilder {
    pub width: usize,
    pub height: usize,
    pub colonies: Vec<Vec<u8>>,
    pub units: usize,
    pub villages: Vec<Vec<u8>>,
    pub fathers: [u8; 4],
    pub terrain: Vec<u8>,
    pub mask: Vec<u8>,
    pub path: Vec<u8>,
    pub seen: Vec<u8>,
    pub prime_lcr: u8,
    pub tail: Vec<u8>,
}

impl SaveBuilder {
    /// All-ocean map: border region 0, interior region 1.
    pub fn ocean(width: usize, height: usize) -> Self {
        let size = width * height;
        let mut path = vec![1u8; size];
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row + 1 == height || col + 1 == width {
                    path[row * width + col] = 0;
                }
            }
        }
        Self {
            width,
            height,
            colonies: Vec::new(),
            units: 0,
            villages: Vec::new(),
            fathers: [0; 4],
            terrain: vec![OCEAN; size],
            mask: vec![0; size],
            path,
            seen: vec![0; size],
            prime_lcr: 0,
            tail: vec![0xAB, 0xCD],
        }
    }

    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn set_terrain(&mut self, row: usize, col: usize, terrain: u8) -> &mut Self {
        let i = self.idx(row, col);
        self.terrain[i] = terrain;
        self
    }

    pub fn set_mask(&mut self, row: usize, col: usize, mask: u8) -> &mut Self {
        let i = self.idx(row, col);
        self.mask[i] = mask;
        self
    }

    pub fn set_path(&mut self, row: usize, col: usize, path: u8) -> &mut Self {
        let i = self.idx(row, col);
        self.path[i] = path;
        self
    }

    /// Land tile with the given region in the low nibble of the path byte.
    pub fn land(&mut self, row: usize, col: usize, base: u8, region: u8) -> &mut Self {
        self.set_terrain(row, col, base);
        let i = self.idx(row, col);
        self.path[i] = (self.path[i] & 0xF0) | region;
        self
    }

    pub fn colony(
        &mut self,
        row: u8,
        col: u8,
        name: &str,
        power: u8,
        buildings: [u8; 6],
    ) -> &mut Self {
        let mut rec = vec![0u8; COLONY_LEN];
        rec[0] = col;
        rec[1] = row;
        rec[2..2 + name.len()].copy_from_slice(name.as_bytes());
        rec[0x1A] = power;
        rec[0x1F] = 3;
        rec[0x84..0x8A].copy_from_slice(&buildings);
        rec[0x92..0x94].copy_from_slice(&120u16.to_le_bytes());
        rec[0x9A..0x9C].copy_from_slice(&55u16.to_le_bytes());
        self.colonies.push(rec);
        self
    }

    pub fn village(
        &mut self,
        row: u8,
        col: u8,
        tribe: u8,
        flags: u8,
        mission: u8,
    ) -> &mut Self {
        let mut rec = vec![0u8; VILLAGE_LEN];
        rec[0] = col;
        rec[1] = row;
        rec[2] = tribe;
        rec[3] = flags;
        rec[5] = mission;
        self.villages.push(rec);
        self
    }

    pub fn terrain_start(&self) -> usize {
        HEADER_LEN
            + self.colonies.len() * COLONY_LEN
            + self.units * UNIT_LEN
            + 4 * POWER_LEN
            + self.villages.len() * VILLAGE_LEN
            + TRIBE_BLOCK_LEN
    }

    pub fn map_size(&self) -> usize {
        self.width * self.height
    }

    pub fn route_len(&self) -> usize {
        self.width.div_ceil(4) * self.height.div_ceil(4)
    }

    pub fn sea_route_start(&self) -> usize {
        self.terrain_start() + 4 * self.map_size()
    }

    pub fn land_route_start(&self) -> usize {
        self.sea_route_start() + self.route_len()
    }

    pub fn prime_lcr_offset(&self) -> usize {
        self.terrain_start() + 4 * self.map_size() + PRIME_LCR_DISTANCE
    }

    pub fn colony_offset(&self, index: usize) -> usize {
        HEADER_LEN + index * COLONY_LEN
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_LEN];
        out[0x0C..0x0E].copy_from_slice(&(self.width as u16).to_le_bytes());
        out[0x0E..0x10].copy_from_slice(&(self.height as u16).to_le_bytes());
        out[0x2A..0x2C].copy_from_slice(&(self.villages.len() as u16).to_le_bytes());
        out[0x2C..0x2E].copy_from_slice(&(self.units as u16).to_le_bytes());
        out[0x2E..0x30].copy_from_slice(&(self.colonies.len() as u16).to_le_bytes());

        for rec in &self.colonies {
            out.extend_from_slice(rec);
        }
        out.resize(out.len() + self.units * UNIT_LEN, 0);
        for &fathers in &self.fathers {
            let mut rec = vec![0u8; POWER_LEN];
            rec[7] = fathers;
            out.extend_from_slice(&rec);
        }
        for rec in &self.villages {
            out.extend_from_slice(rec);
        }
        out.resize(out.len() + TRIBE_BLOCK_LEN, 0);
        assert_eq!(out.len(), self.terrain_start());

        out.extend_from_slice(&self.terrain);
        out.extend_from_slice(&self.mask);
        out.extend_from_slice(&self.path);
        out.extend_from_slice(&self.seen);
        out.resize(self.prime_lcr_offset(), 0);
        out.push(self.prime_lcr);
        out.extend_from_slice(&self.tail);
        out
    }
}
