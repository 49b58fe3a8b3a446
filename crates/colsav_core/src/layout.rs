use serde::Serialize;

use crate::error::FormatError;
use crate::sav::header::SaveHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Header,
    Colonies,
    Units,
    Powers,
    Villages,
    Tribes,
    TerrainMap,
    MaskMap,
    PathMap,
    SeenMap,
    SeaRoutes,
    LandRoutes,
    Trailer,
    PrimeLcr,
    Tail,
}

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Header => "header",
            Self::Colonies => "colonies",
            Self::Units => "units",
            Self::Powers => "powers",
            Self::Villages => "villages",
            Self::Tribes => "tribes",
            Self::TerrainMap => "terrain_map",
            Self::MaskMap => "mask_map",
            Self::PathMap => "path_map",
            Self::SeenMap => "seen_map",
            Self::SeaRoutes => "sea_routes",
            Self::LandRoutes => "land_routes",
            Self::Trailer => "trailer",
            Self::PrimeLcr => "prime_lcr",
            Self::Tail => "tail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    /// Lay out every section implied by `header` over a file of `file_len`
    /// bytes. The result is not validated; call [`FileLayout::validate`].
    pub fn from_header(header: &SaveHeader, file_len: usize) -> Self {
        let bounds = [
            (SectionId::Header, 0, header.colony_table_start()),
            (
                SectionId::Colonies,
                header.colony_table_start(),
                header.unit_table_start(),
            ),
            (
                SectionId::Units,
                header.unit_table_start(),
                header.power_table_start(),
            ),
            (
                SectionId::Powers,
                header.power_table_start(),
                header.village_table_start(),
            ),
            (
                SectionId::Villages,
                header.village_table_start(),
                header.tribe_block_start(),
            ),
            (
                SectionId::Tribes,
                header.tribe_block_start(),
                header.terrain_map_start(),
            ),
            (
                SectionId::TerrainMap,
                header.terrain_map_start(),
                header.mask_map_start(),
            ),
            (
                SectionId::MaskMap,
                header.mask_map_start(),
                header.path_map_start(),
            ),
            (
                SectionId::PathMap,
                header.path_map_start(),
                header.seen_map_start(),
            ),
            (
                SectionId::SeenMap,
                header.seen_map_start(),
                header.map_layers_end(),
            ),
            (
                SectionId::SeaRoutes,
                header.sea_route_start(),
                header.land_route_start(),
            ),
            (
                SectionId::LandRoutes,
                header.land_route_start(),
                header.land_route_start() + header.route_table_len(),
            ),
            (
                SectionId::Trailer,
                header.land_route_start() + header.route_table_len(),
                header.prime_lcr_offset(),
            ),
            (
                SectionId::PrimeLcr,
                header.prime_lcr_offset(),
                header.prime_lcr_offset() + 1,
            ),
            (SectionId::Tail, header.prime_lcr_offset() + 1, file_len),
        ];

        let sections = bounds
            .into_iter()
            .map(|(id, start, end)| SectionLayout {
                id,
                range: ByteRange::new(start, end),
            })
            .collect();

        Self { file_len, sections }
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        let Some(first) = self.sections.first() else {
            return Err(invalid("file layout must contain at least one section"));
        };

        if first.range.start != 0 {
            return Err(invalid("layout does not start at byte 0"));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(invalid(format!(
                    "layout gap/overlap around section {}: expected start {}, got {}",
                    section.id.as_str(),
                    expected,
                    section.range.start
                )));
            }
            if section.range.end < section.range.start {
                return Err(invalid(format!(
                    "invalid section range {}: {}..{}",
                    section.id.as_str(),
                    section.range.start,
                    section.range.end
                )));
            }
            expected = section.range.end;
        }

        if expected != self.file_len {
            return Err(invalid(format!(
                "layout does not cover file: ended at {}, file length {}",
                expected, self.file_len
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> FormatError {
    FormatError::InvalidField {
        field: "layout",
        message: message.into(),
    }
}
